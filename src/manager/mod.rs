mod depletion;
mod transport_result;

pub use depletion::{Manager, Power, SECONDS_PER_DAY};
pub use transport_result::TransportResult;
