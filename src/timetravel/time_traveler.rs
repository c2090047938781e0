use ndarray::{Array, Array1, Array2, ArrayView, Dimension, IntoDimension};

use crate::error::{XsError, XsResult};
use crate::timetravel::polyfit;

//=====================================================================
// Rolling store of (time, array) samples that can be projected to new
// points in time.
//
// Up to `nsteps` samples of a fixed shape are kept in a preallocated
// buffer, one flattened sample per row. Once the buffer is full every
// push overwrites the oldest sample in place, so memory stays bounded
// however long the simulation runs.
//
// Projections first look for a stored sample within `atol` of the
// requested time and return it untouched. Otherwise a least-squares
// polynomial is fit through all stored samples, element by element,
// using order `min(order, samples - 1)`.
//=====================================================================
#[derive(Debug, Clone)]
pub struct TimeTraveler<D: Dimension> {
    times: Vec<f64>,
    data: Array2<f64>,
    shape: D,
    order: usize,
    count: usize,
    cursor: usize,
}

impl<D: Dimension> TimeTraveler<D> {
    pub fn new<S: IntoDimension<Dim = D>>(nsteps: usize, shape: S, order: usize) -> XsResult<Self> {
        if nsteps == 0 {
            return Err(XsError::InvalidCapacity(nsteps));
        }
        let shape = shape.into_dimension();
        let data = Array2::zeros((nsteps, shape.size()));
        Ok(Self {
            times: vec![f64::NAN; nsteps],
            data,
            shape,
            order,
            count: 0,
            cursor: 0,
        })
    }

    /// Maximum number of samples held at once
    pub fn nsteps(&self) -> usize {
        self.times.len()
    }

    /// Maximum polynomial order used in projections
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn shape(&self) -> &[usize] {
        self.shape.slice()
    }

    /// Number of samples currently stored
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.nsteps()
    }

    // Buffer rows holding samples, oldest first
    fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        let capacity = self.nsteps();
        let start = (self.cursor + capacity - self.count) % capacity;
        (0..self.count).map(move |offset| (start + offset) % capacity)
    }

    /// Stored times, oldest first
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.slots().map(|slot| self.times[slot])
    }

    pub fn latest_time(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.nsteps();
        Some(self.times[(self.cursor + capacity - 1) % capacity])
    }

    /// Store a new sample. Times must be pushed in strictly increasing order.
    pub fn push(&mut self, t: f64, array: ArrayView<'_, f64, D>) -> XsResult<()> {
        if array.raw_dim() != self.shape {
            return Err(XsError::ShapeMismatch {
                expected: self.shape.slice().to_vec(),
                found: array.shape().to_vec(),
            });
        }

        // Eviction always drops the oldest sample, which is only correct if the
        // buffer stays ordered in time
        let previous = self.latest_time();
        if !t.is_finite() || previous.is_some_and(|previous| t <= previous) {
            return Err(XsError::TimeNotIncreasing {
                previous: previous.unwrap_or(f64::NEG_INFINITY),
                pushed: t,
            });
        }

        let slot = self.cursor;
        if self.is_full() {
            log::trace!("Evicting sample at t={} to store t={}", self.times[slot], t);
        }
        self.times[slot] = t;
        for (stored, value) in self.data.row_mut(slot).iter_mut().zip(array.iter()) {
            *stored = *value;
        }
        self.cursor = (self.cursor + 1) % self.nsteps();
        self.count = (self.count + 1).min(self.nsteps());
        Ok(())
    }

    /// Project the stored samples to time `t`
    pub fn at(&self, t: f64, atol: f64) -> XsResult<Array<f64, D>> {
        if self.count == 0 {
            return Err(XsError::Uninitialized);
        }

        // Stored samples are returned exactly, without passing through the fit
        if let Some(slot) = self.slots().find(|&slot| (self.times[slot] - t).abs() <= atol) {
            return self.unflatten(self.data.row(slot).to_owned());
        }

        let order = self.order.min(self.count - 1);
        if order < self.order {
            log::debug!(
                "Reducing fit order from {} to {} with {} stored points",
                self.order, order, self.count
            );
        }

        let slots: Vec<usize> = self.slots().collect();
        let times: Vec<f64> = slots.iter().map(|&slot| self.times[slot]).collect();
        let weights = polyfit::fit_weights(&times, order, t)?;

        let mut projected = Array1::<f64>::zeros(self.data.ncols());
        for (&slot, &weight) in slots.iter().zip(weights.iter()) {
            projected.scaled_add(weight, &self.data.row(slot));
        }
        self.unflatten(projected)
    }

    fn unflatten(&self, flat: Array1<f64>) -> XsResult<Array<f64, D>> {
        let found = flat.shape().to_vec();
        flat.into_shape_with_order(self.shape.clone())
            .map_err(|_| XsError::ShapeMismatch { expected: self.shape.slice().to_vec(), found })
    }
}
