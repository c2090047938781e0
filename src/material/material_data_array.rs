use std::ops::{Div, DivAssign, Mul, MulAssign};
use std::sync::Arc;

use ndarray::Array2;

use crate::error::{XsError, XsResult};
use crate::index::XsIndex;
use crate::material::MaterialData;

//=====================================================================
// Cross sections or reaction rates for several materials.
//
// `data[[i, j]]` is the value of reaction `index.locate(j)` in
// material `i`. The index is shared, the data is owned. Arithmetic
// between two arrays requires equal indices: equal shapes alone are
// not enough since the columns could mean different reactions.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDataArray {
    index: Arc<XsIndex>,
    data: Array2<f64>,
}

// Pointer comparison first, the full structural comparison only when the
// two indices were built separately
pub(crate) fn same_index(a: &Arc<XsIndex>, b: &Arc<XsIndex>) -> bool {
    Arc::ptr_eq(a, b) || **a == **b
}

impl MaterialDataArray {
    pub fn new(index: Arc<XsIndex>, data: Array2<f64>) -> XsResult<Self> {
        if data.ncols() != index.len() {
            return Err(XsError::ShapeMismatch {
                expected: vec![data.nrows(), index.len()],
                found: data.shape().to_vec(),
            });
        }
        Ok(Self { index, data })
    }

    pub fn zeros(index: Arc<XsIndex>, nmaterials: usize) -> Self {
        let data = Array2::zeros((nmaterials, index.len()));
        Self { index, data }
    }

    pub fn index(&self) -> &Arc<XsIndex> {
        &self.index
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array2<f64> {
        &mut self.data
    }

    pub fn into_data(self) -> Array2<f64> {
        self.data
    }

    /// Number of materials stored
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn nreactions(&self) -> usize {
        self.data.ncols()
    }

    /// View into one material's data, `None` past the last material
    pub fn get(&self, position: usize) -> Option<MaterialData<'_>> {
        if position >= self.len() {
            return None;
        }
        Some(MaterialData::from_row(&self.index, self.data.row(position)))
    }

    pub fn material(&self, position: usize) -> XsResult<MaterialData<'_>> {
        self.get(position).ok_or_else(|| {
            XsError::NotFound(format!("Material {} (array holds {} materials)", position, self.len()))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = MaterialData<'_>> + '_ {
        self.data
            .outer_iter()
            .map(move |row| MaterialData::from_row(&self.index, row))
    }

    // Index and shape must both agree before two arrays can be combined
    fn conforms(&self, other: &MaterialDataArray) -> XsResult<()> {
        if !same_index(&self.index, &other.index) {
            return Err(XsError::StructuralMismatch);
        }
        if self.data.dim() != other.data.dim() {
            return Err(XsError::ShapeMismatch {
                expected: self.data.shape().to_vec(),
                found: other.data.shape().to_vec(),
            });
        }
        Ok(())
    }

    /// `Z = X + Y`
    pub fn add(&self, other: &MaterialDataArray) -> XsResult<Self> {
        self.conforms(other)?;
        Ok(Self { index: Arc::clone(&self.index), data: &self.data + &other.data })
    }

    /// `X += Y`
    pub fn add_in_place(&mut self, other: &MaterialDataArray) -> XsResult<()> {
        self.conforms(other)?;
        self.data += &other.data;
        Ok(())
    }

    /// `Y = a * X`
    pub fn scale(&self, scalar: f64) -> Self {
        Self { index: Arc::clone(&self.index), data: &self.data * scalar }
    }

    pub fn scale_in_place(&mut self, scalar: f64) {
        self.data *= scalar;
    }

    /// `Y = X / a`
    pub fn divide(&self, scalar: f64) -> Self {
        Self { index: Arc::clone(&self.index), data: &self.data / scalar }
    }

    pub fn divide_in_place(&mut self, scalar: f64) {
        self.data /= scalar;
    }

    /// Weighted sum `M = sum_i w_i M_i` computed without building the
    /// intermediate scaled arrays. Every array must share the index of the
    /// first one, which the result is bound to.
    pub fn from_linear_combination<'a, I>(pairs: I) -> XsResult<Self>
    where
        I: IntoIterator<Item = (f64, &'a MaterialDataArray)>,
    {
        let mut pairs = pairs.into_iter();
        let (weight, first) = pairs.next().ok_or(XsError::EmptyCombination)?;
        let mut data = &first.data * weight;
        for (weight, array) in pairs {
            first.conforms(array)?;
            data.scaled_add(weight, &array.data);
        }
        Ok(Self { index: Arc::clone(&first.index), data })
    }
}

impl Mul<f64> for &MaterialDataArray {
    type Output = MaterialDataArray;

    fn mul(self, scalar: f64) -> MaterialDataArray {
        self.scale(scalar)
    }
}

impl Mul<f64> for MaterialDataArray {
    type Output = MaterialDataArray;

    fn mul(mut self, scalar: f64) -> MaterialDataArray {
        self.scale_in_place(scalar);
        self
    }
}

impl Mul<&MaterialDataArray> for f64 {
    type Output = MaterialDataArray;

    fn mul(self, array: &MaterialDataArray) -> MaterialDataArray {
        array.scale(self)
    }
}

impl MulAssign<f64> for MaterialDataArray {
    fn mul_assign(&mut self, scalar: f64) {
        self.scale_in_place(scalar);
    }
}

impl Div<f64> for &MaterialDataArray {
    type Output = MaterialDataArray;

    fn div(self, scalar: f64) -> MaterialDataArray {
        self.divide(scalar)
    }
}

impl DivAssign<f64> for MaterialDataArray {
    fn div_assign(&mut self, scalar: f64) {
        self.divide_in_place(scalar);
    }
}
