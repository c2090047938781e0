use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail, ensure};

use crate::bank::DataBank;
use crate::features::{self, Feature, FeatureCollection};
use crate::index::XsIndex;
use crate::manager::TransportResult;
use crate::material::MaterialDataArray;
use crate::settings::FittingSettings;

pub const SECONDS_PER_DAY: f64 = 86400.0;

// Power to deplete the whole problem with, in watts
#[derive(Debug, Clone, PartialEq)]
pub enum Power {
    Constant(f64),
    PerStep(Vec<f64>),
}

//=====================================================================
// Depletion manager. Owns the coarse step schedule and the bank of
// cross sections gathered from each transport solution, and serves
// projected cross sections and reaction rates to the depletion and
// reduced order stages in between.
//=====================================================================
#[derive(Debug, Clone)]
pub struct Manager {
    timesteps: Vec<f64>,
    power: Vec<f64>,
    num_preliminary: usize,
    bank: Option<DataBank>,
    atol: f64,
}

impl Manager {
    pub fn new(daysteps: &[f64], power: Power, num_preliminary: usize) -> Result<Self> {
        ensure!(!daysteps.is_empty(), "At least one depletion step is required");
        if let Some(step) = daysteps.iter().find(|step| !(step.is_finite() && **step > 0.0)) {
            bail!("Depletion step lengths must be positive, got {} days", step);
        }
        let timesteps: Vec<f64> = daysteps.iter().map(|days| days * SECONDS_PER_DAY).collect();

        let power = match power {
            Power::Constant(watts) => vec![watts; timesteps.len()],
            Power::PerStep(watts) => {
                ensure!(
                    watts.len() == timesteps.len(),
                    "Was given {} power values for {} depletion steps",
                    watts.len(),
                    timesteps.len()
                );
                watts
            }
        };
        if let Some(watts) = power.iter().find(|watts| !(watts.is_finite() && **watts > 0.0)) {
            bail!("Power must be positive, got {} W", watts);
        }

        ensure!(
            num_preliminary < timesteps.len(),
            "Number of preliminary steps {} must be less than the {} depletion steps",
            num_preliminary,
            timesteps.len()
        );

        Ok(Self { timesteps, power, num_preliminary, bank: None, atol: FittingSettings::default().atol })
    }

    /// Length of each coarse step in seconds
    pub fn timesteps(&self) -> &[f64] {
        &self.timesteps
    }

    pub fn power(&self) -> &[f64] {
        &self.power
    }

    pub fn num_preliminary(&self) -> usize {
        self.num_preliminary
    }

    // Calendar time in seconds at the start of each coarse step
    pub fn step_start_times(&self) -> Vec<f64> {
        self.timesteps
            .iter()
            .scan(0.0, |elapsed, step| {
                let start = *elapsed;
                *elapsed += step;
                Some(start)
            })
            .collect()
    }

    /// (seconds, watts) for the steps taken before coupling is engaged
    pub fn preliminary_steps(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let n = self.num_preliminary;
        self.timesteps[..n].iter().copied().zip(self.power[..n].iter().copied())
    }

    /// (seconds, watts) for the coupled steps after any preliminary ones
    pub fn active_steps(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let n = self.num_preliminary;
        self.timesteps[n..].iter().copied().zip(self.power[n..].iter().copied())
    }

    pub fn needs(&self) -> FeatureCollection {
        [Feature::MicroReactionXs].into_iter().collect()
    }

    // Make sure the transport solver can provide what depletion needs
    pub fn check_compatibility(&self, solver: &str, features: &FeatureCollection) -> Result<()> {
        features::check_compatibility(solver, features, "depletion manager", &self.needs())?;
        Ok(())
    }

    // Set up the cross section bank once the burnable materials and reaction index are known
    pub fn before_main(&mut self, index: Arc<XsIndex>, nmaterials: usize, settings: &FittingSettings) -> Result<()> {
        settings.validate().context("Invalid fitting settings")?;
        let bank = DataBank::from_settings(settings, nmaterials, index)
            .context("Failed to build the cross section bank")?;
        log::debug!(
            "Created cross section bank for {} materials, {} reactions, {} points, order {}",
            bank.nmaterials(),
            bank.nreactions(),
            bank.nsteps(),
            bank.order()
        );
        self.bank = Some(bank);
        self.atol = settings.atol;
        Ok(())
    }

    pub fn bank(&self) -> Option<&DataBank> {
        self.bank.as_ref()
    }

    fn require_bank(&self) -> Result<&DataBank> {
        self.bank
            .as_ref()
            .ok_or_else(|| anyhow!("Cross section bank is not set up, call before_main first"))
    }

    /// Store the cross sections of a transport solution at calendar time `time`
    pub fn push_results(&mut self, time: f64, result: &TransportResult) -> Result<()> {
        let bank = self
            .bank
            .as_mut()
            .ok_or_else(|| anyhow!("Cross section bank is not set up, call before_main first"))?;
        let micro_xs = result
            .micro_xs
            .as_ref()
            .ok_or_else(|| anyhow!("Transport result at t={} carries no microscopic cross sections", time))?;
        ensure!(
            result.flux.len() == bank.nmaterials(),
            "Transport result at t={} has {} fluxes for {} burnable materials",
            time,
            result.flux.len(),
            bank.nmaterials()
        );
        bank.push(time, micro_xs)
            .with_context(|| format!("Failed to store cross sections at t={}", time))
    }

    pub fn cross_sections_at(&self, time: f64) -> Result<MaterialDataArray> {
        let bank = self.require_bank()?;
        bank.at(time, self.atol)
            .with_context(|| format!("Failed to project cross sections to t={}", time))
    }

    pub fn reaction_rates_at(&self, time: f64, fluxes: &[f64]) -> Result<MaterialDataArray> {
        let bank = self.require_bank()?;
        bank.reaction_rates_at(time, fluxes, self.atol)
            .with_context(|| format!("Failed to compute reaction rates at t={}", time))
    }
}
