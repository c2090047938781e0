use ndarray::Array1;

use crate::material::MaterialDataArray;

//=====================================================================
// Results handed back by a transport solution: one-group flux in each
// burnable material, the multiplication factor and its uncertainty,
// and optionally microscopic cross sections for the DataBank.
//=====================================================================
#[derive(Debug, Clone)]
pub struct TransportResult {
    pub flux: Array1<f64>,
    pub keff: (f64, f64),
    pub run_time: Option<f64>,
    pub micro_xs: Option<MaterialDataArray>,
}

impl TransportResult {
    pub fn new(flux: Array1<f64>, keff: (f64, f64)) -> Self {
        Self { flux, keff, run_time: None, micro_xs: None }
    }

    pub fn with_run_time(mut self, run_time: f64) -> Self {
        self.run_time = Some(run_time);
        self
    }

    pub fn with_micro_xs(mut self, micro_xs: MaterialDataArray) -> Self {
        self.micro_xs = Some(micro_xs);
        self
    }
}
