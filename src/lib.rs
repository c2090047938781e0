//! Storage and time extrapolation of microscopic cross sections for
//! coupled transport-depletion.
//!
//! A [`XsIndex`] fixes the order of every (isotope, reaction) pair.
//! [`MaterialDataArray`] holds cross sections for many materials on
//! that index, [`TimeTraveler`] keeps a short history of arrays and
//! projects them in time with a polynomial fit, and [`DataBank`] ties
//! the two together for the [`Manager`].

mod bank;
mod error;
mod features;
mod index;
mod manager;
mod material;
mod settings;
mod timetravel;

#[cfg(test)]
mod utils;

pub use bank::{DataBank, DEFAULT_ATOL};
pub use error::{XsError, XsResult};
pub use features::{Feature, FeatureCollection, check_compatibility};
pub use index::{ReactionType, XsIndex, XsIndexIter};
pub use manager::{Manager, Power, SECONDS_PER_DAY, TransportResult};
pub use material::{MaterialData, MaterialDataArray};
pub use settings::FittingSettings;
pub use timetravel::TimeTraveler;
