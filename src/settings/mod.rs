use std::collections::HashMap;

use anyhow::{Context, Result, anyhow, bail};

//=====================================================================
// Settings that control how cross sections are fit in time.
//
// These are built once by whatever reads the user's configuration and
// passed down to the DataBank, nothing looks them up by name later.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct FittingSettings {
    /// Maximum polynomial order for fitting cross sections in time
    pub order: usize,
    /// Number of time points kept for the fit
    pub points: usize,
    /// Absolute tolerance when matching a requested time to a stored one
    pub atol: f64,
}

impl Default for FittingSettings {
    fn default() -> Self {
        Self { order: 1, points: 3, atol: 1e-12 }
    }
}

impl FittingSettings {
    // Update from user supplied key-value options, e.g. a section of a config file.
    // Recognised keys are "fitting order" and "fitting points".
    pub fn update(&mut self, options: &HashMap<String, String>) -> Result<()> {
        let mut unknown: Vec<&str> = options
            .keys()
            .map(String::as_str)
            .filter(|key| !matches!(*key, "fitting order" | "fitting points"))
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            bail!(
                "The following options do not have a corresponding fitting setting: {}",
                unknown.join(", ")
            );
        }

        if let Some(value) = options.get("fitting order") {
            self.order = as_non_negative_int("fitting order", value)?;
        }
        if let Some(value) = options.get("fitting points") {
            self.points = as_positive_int("fitting points", value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.points == 0 {
            bail!("Number of fitting points must be positive");
        }
        if self.order > self.points {
            bail!(
                "Cannot produce a {} order polynomial fit with {} points",
                self.order,
                self.points
            );
        }
        if !(self.atol.is_finite() && self.atol >= 0.0) {
            bail!("Time tolerance must be a non-negative number, not {}", self.atol);
        }
        Ok(())
    }
}

// Coerce a string to an integer. Integral floats like "2.0" are accepted,
// booleans and fractional values are not.
fn as_int(key: &str, value: &str) -> Result<i64> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        bail!("Will not coerce {}={} from bool to integer", key, value);
    }
    if let Ok(integer) = value.parse::<i64>() {
        return Ok(integer);
    }
    let float: f64 = value
        .parse()
        .with_context(|| format!("Could not coerce {}={} to integer", key, value))?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Ok(float as i64)
    } else {
        Err(anyhow!("Could not coerce {}={} to integer", key, value))
    }
}

fn as_positive_int(key: &str, value: &str) -> Result<usize> {
    let candidate = as_int(key, value)?;
    if candidate > 0 {
        Ok(candidate as usize)
    } else {
        Err(anyhow!("{} must be positive integer: converted {} to {}", key, value, candidate))
    }
}

fn as_non_negative_int(key: &str, value: &str) -> Result<usize> {
    let candidate = as_int(key, value)?;
    usize::try_from(candidate).map_err(|_| anyhow!("{} cannot be negative, got {}", key, candidate))
}
