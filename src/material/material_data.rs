use std::collections::HashMap;

use ndarray::ArrayView1;

use crate::error::{XsError, XsResult};
use crate::index::XsIndex;

//=====================================================================
// Cross sections or reaction rates for a single material. This is a
// borrowed view, usually handed out by a MaterialDataArray, so
// building one never copies the underlying data.
//=====================================================================
#[derive(Debug, Clone, Copy)]
pub struct MaterialData<'a> {
    index: &'a XsIndex,
    data: ArrayView1<'a, f64>,
}

impl<'a> MaterialData<'a> {
    pub fn new(index: &'a XsIndex, data: ArrayView1<'a, f64>) -> XsResult<Self> {
        if data.len() != index.len() {
            return Err(XsError::ShapeMismatch {
                expected: vec![index.len()],
                found: data.shape().to_vec(),
            });
        }
        Ok(Self { index, data })
    }

    // Rows of a MaterialDataArray always match the index they are stored with
    pub(crate) fn from_row(index: &'a XsIndex, data: ArrayView1<'a, f64>) -> Self {
        debug_assert_eq!(data.len(), index.len());
        Self { index, data }
    }

    pub fn index(&self) -> &'a XsIndex {
        self.index
    }

    pub fn data(&self) -> ArrayView1<'a, f64> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Value for one isotope and reaction
    pub fn get(&self, zai: usize, mt: usize) -> XsResult<f64> {
        let position = self.index.index_of(zai, mt)?;
        Ok(self.data[position])
    }

    /// Map of reaction MT to value for every reaction of `zai`, or `None`
    /// if the isotope is not part of the index
    pub fn reactions_for(&self, zai: usize) -> Option<HashMap<usize, f64>> {
        let reactions = self.index.reactions_of(zai).ok()?;
        Some(reactions.map(|(mt, position)| (mt, self.data[position])).collect())
    }

    pub fn reactions_for_or(&self, zai: usize, default: HashMap<usize, f64>) -> HashMap<usize, f64> {
        self.reactions_for(zai).unwrap_or(default)
    }
}
