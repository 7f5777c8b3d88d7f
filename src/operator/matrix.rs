use ndarray::{Array1, Array2, ArrayView1};

use super::LinearOperator;
use crate::error::{Result, TrainErr};

/// A dense system matrix acting as a forward operator.
#[derive(Debug)]
pub struct MatrixOperator {
    a: Array2<f32>,
}

impl MatrixOperator {
    /// Wraps an `(m, n)` system matrix mapping `n` unknowns to `m`
    /// observables.
    pub fn new(a: Array2<f32>) -> Self {
        Self { a }
    }

    /// Builds the operator from a flat row-major buffer.
    ///
    /// # Errors
    /// `ShapeMismatch` when the buffer does not hold `rows * cols` scalars.
    pub fn from_vec(data: Vec<f32>, rows: usize, cols: usize) -> Result<Self> {
        let got = data.len();
        let a = Array2::from_shape_vec((rows, cols), data).map_err(|_| {
            TrainErr::ShapeMismatch {
                what: "system matrix buffer",
                got,
                expected: rows * cols,
            }
        })?;

        Ok(Self::new(a))
    }
}

impl LinearOperator for MatrixOperator {
    fn domain_dim(&self) -> usize {
        self.a.ncols()
    }

    fn range_dim(&self) -> usize {
        self.a.nrows()
    }

    fn apply(&self, x: ArrayView1<f32>) -> Array1<f32> {
        debug_assert_eq!(x.len(), self.domain_dim());
        self.a.dot(&x)
    }

    fn apply_adjoint(&self, y: ArrayView1<f32>) -> Array1<f32> {
        debug_assert_eq!(y.len(), self.range_dim());
        self.a.t().dot(&y)
    }
}
