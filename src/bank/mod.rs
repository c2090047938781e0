mod data_bank;

pub use data_bank::{DataBank, DEFAULT_ATOL};
