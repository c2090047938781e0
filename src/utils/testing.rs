#![allow(dead_code)]

//=====================================================================
// Shared fixtures so every test builds cross sections on the same
// reaction index without repeating its layout
//=====================================================================

use std::sync::Arc;

use lazy_static::lazy_static;
use ndarray::Array2;

use crate::index::XsIndex;
use crate::material::MaterialDataArray;

lazy_static! {
    // O16 capture, U235 fission and capture, U238 capture and fission
    pub static ref TEST_INDEX: Arc<XsIndex> = Arc::new(
        XsIndex::new(
            vec![80160, 922350, 922380],
            vec![102, 18, 102, 102, 18],
            vec![0, 1, 3, 5],
        )
        .expect("Test index is well formed")
    );
}

pub fn test_index() -> Arc<XsIndex> {
    Arc::clone(&TEST_INDEX)
}

// Same isotopes and reaction count as TEST_INDEX, but U238 has (n,2n)
// in place of fission
pub fn other_index() -> Arc<XsIndex> {
    Arc::new(
        XsIndex::new(
            vec![80160, 922350, 922380],
            vec![102, 18, 102, 102, 16],
            vec![0, 1, 3, 5],
        )
        .expect("Other index is well formed"),
    )
}

// Cross sections on TEST_INDEX where material i, reaction j holds
// offset + 10 i + j
pub fn ramp_array(nmaterials: usize, offset: f64) -> MaterialDataArray {
    let index = test_index();
    let data = Array2::from_shape_fn((nmaterials, index.len()), |(i, j)| offset + (10 * i + j) as f64);
    MaterialDataArray::new(index, data).expect("Ramp matches the test index")
}
