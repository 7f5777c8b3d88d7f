use ndarray::{Array1, ArrayView1};

use super::LinearOperator;

/// The identity operator, used for pure denoising objectives.
#[derive(Debug)]
pub struct Identity {
    n: usize,
}

impl Identity {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl LinearOperator for Identity {
    fn domain_dim(&self) -> usize {
        self.n
    }

    fn range_dim(&self) -> usize {
        self.n
    }

    fn apply(&self, x: ArrayView1<f32>) -> Array1<f32> {
        debug_assert_eq!(x.len(), self.n);
        x.to_owned()
    }

    fn apply_adjoint(&self, y: ArrayView1<f32>) -> Array1<f32> {
        debug_assert_eq!(y.len(), self.n);
        y.to_owned()
    }
}
