use std::sync::Arc;

use ndarray::{Axis, Ix2};

use crate::error::{XsError, XsResult};
use crate::index::XsIndex;
use crate::material::{MaterialDataArray, same_index};
use crate::settings::FittingSettings;
use crate::timetravel::TimeTraveler;

/// Default absolute tolerance when matching a requested time to a stored one
pub const DEFAULT_ATOL: f64 = 1e-12;

//=====================================================================
// Store and extrapolate cross sections for every burnable material.
//
// A DataBank is a TimeTraveler over (materials, reactions) arrays that
// remembers which XsIndex the reaction axis follows. Only arrays built
// on that index may be pushed, and every projection comes back as a
// MaterialDataArray on the same index.
//=====================================================================
#[derive(Debug, Clone)]
pub struct DataBank {
    traveler: TimeTraveler<Ix2>,
    index: Arc<XsIndex>,
}

impl DataBank {
    pub fn new(nsteps: usize, nmaterials: usize, index: Arc<XsIndex>, order: usize) -> XsResult<Self> {
        let traveler = TimeTraveler::new(nsteps, (nmaterials, index.len()), order)?;
        Ok(Self { traveler, index })
    }

    // Window length and fit order come straight from the fitting settings
    pub fn from_settings(settings: &FittingSettings, nmaterials: usize, index: Arc<XsIndex>) -> XsResult<Self> {
        Self::new(settings.points, nmaterials, index, settings.order)
    }

    pub fn reaction_index(&self) -> &Arc<XsIndex> {
        &self.index
    }

    /// Number of time points that can be stored
    pub fn nsteps(&self) -> usize {
        self.traveler.nsteps()
    }

    pub fn nmaterials(&self) -> usize {
        self.traveler.shape()[0]
    }

    pub fn nreactions(&self) -> usize {
        self.traveler.shape()[1]
    }

    pub fn order(&self) -> usize {
        self.traveler.order()
    }

    /// Number of time points currently stored
    pub fn len(&self) -> usize {
        self.traveler.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traveler.is_empty()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.traveler.times()
    }

    /// Store cross sections for all materials at time `t`
    pub fn push(&mut self, t: f64, material_data: &MaterialDataArray) -> XsResult<()> {
        if !same_index(material_data.index(), &self.index) {
            return Err(XsError::StructuralMismatch);
        }
        self.traveler.push(t, material_data.data().view())?;
        log::debug!("Stored cross sections at t={} ({} of {} points)", t, self.len(), self.nsteps());
        Ok(())
    }

    /// Cross sections projected to time `t`
    pub fn at(&self, t: f64, atol: f64) -> XsResult<MaterialDataArray> {
        let data = self.traveler.at(t, atol)?;
        MaterialDataArray::new(Arc::clone(&self.index), data)
    }

    /// Reaction rates at time `t`: projected cross sections in material `i`
    /// scaled by the one-group flux `fluxes[i]`
    pub fn reaction_rates_at(&self, t: f64, fluxes: &[f64], atol: f64) -> XsResult<MaterialDataArray> {
        if fluxes.len() != self.nmaterials() {
            return Err(XsError::ShapeMismatch {
                expected: vec![self.nmaterials()],
                found: vec![fluxes.len()],
            });
        }
        let mut rates = self.at(t, atol)?;

        // Column vector of fluxes, broadcast across the reaction axis
        let fluxes = ndarray::aview1(fluxes).insert_axis(Axis(1));
        *rates.data_mut() *= &fluxes;
        Ok(rates)
    }
}
