use ndarray::{linalg, prelude::*};

use crate::{
    arch::activations::ActFn,
    error::{Result, TrainErr},
};

/// An affine layer with an optional pointwise nonlinearity.
///
/// The layer owns no parameters. Its `(in, out)` weight block and `out` bias
/// block live in a caller-owned flat slice; the layer only views its window
/// of that slice during the forward and backward passes.
#[derive(Clone, Debug)]
pub struct Dense {
    dim: (usize, usize),
    act_fn: Option<ActFn>,
    size: usize,

    // Forward metadata
    x: Array2<f32>,
    z: Array2<f32>,
    a: Array2<f32>,

    // Backward metadata
    d: Array2<f32>,
}

impl Dense {
    /// Creates a new `Dense` mapping `dim.0` inputs to `dim.1` outputs.
    pub fn new(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        let zeros = Array2::zeros((0, 0));

        Self {
            dim,
            size: (dim.0 + 1) * dim.1,
            act_fn,
            x: zeros.clone(),
            z: zeros.clone(),
            a: zeros.clone(),
            d: zeros,
        }
    }

    /// Returns the amount of parameters this layer views.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn input_dim(&self) -> usize {
        self.dim.0
    }

    pub fn output_dim(&self) -> usize {
        self.dim.1
    }

    /// Computes `act(x W + b)` over a batch of row samples, caching the
    /// result for `output` and the following backward pass.
    ///
    /// # Errors
    /// `ShapeMismatch` when the batch width differs from the layer's input
    /// dimension.
    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<()> {
        if x.ncols() != self.dim.0 {
            return Err(TrainErr::ShapeMismatch {
                what: "batch columns",
                got: x.ncols(),
                expected: self.dim.0,
            });
        }

        let (w, b) = self.view_params(params);
        let shape = (x.nrows(), self.dim.1);

        self.z = Array2::zeros(shape);
        linalg::general_mat_mul(1.0, &x, &w, 0.0, &mut self.z);
        self.z += &b;

        self.x = x.to_owned();

        if let Some(ref act_fn) = self.act_fn {
            self.a = self.z.mapv(|z| act_fn.f(z));
        }

        Ok(())
    }

    /// The output cached by the last forward pass.
    pub fn output(&self) -> ArrayView2<'_, f32> {
        match self.act_fn {
            Some(_) => self.a.view(),
            None => self.z.view(),
        }
    }

    /// Backpropagates `d`, the loss gradient with respect to this layer's
    /// output, writing the parameter gradient and caching the delta for the
    /// previous layer.
    pub fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        mut d: ArrayViewMut2<f32>,
    ) -> Result<()> {
        if let Some(act_fn) = &self.act_fn {
            d.zip_mut_with(&self.z, |d, &z| *d *= act_fn.df(z));
        }

        let (mut dw, mut db) = self.view_grad(grad);
        linalg::general_mat_mul(1.0, &self.x.t(), &d, 0.0, &mut dw);
        db.assign(&d.sum_axis(Axis(0)));

        let (w, _) = self.view_params(params);
        self.d = Array2::zeros((d.nrows(), self.dim.0));
        linalg::general_mat_mul(1.0, &d, &w.t(), 0.0, &mut self.d);

        Ok(())
    }

    /// A mutable view of the previous-layer delta cached by `backward`.
    pub(crate) fn delta_mut(&mut self) -> ArrayViewMut2<'_, f32> {
        self.d.view_mut()
    }

    /// Gives a view of the raw gradient slice as this layer's delta weights
    /// and delta biases.
    fn view_grad<'a>(
        &self,
        grad: &'a mut [f32],
    ) -> (ArrayViewMut2<'a, f32>, ArrayViewMut1<'a, f32>) {
        let w_size = self.size - self.dim.1;
        let (dw_raw, db_raw) = grad.split_at_mut(w_size);
        let dw = ArrayViewMut2::from_shape(self.dim, dw_raw).unwrap();
        let db = ArrayViewMut1::from_shape(self.dim.1, db_raw).unwrap();
        (dw, db)
    }

    /// Gives a view of the raw parameter slice as this layer's weights and
    /// biases.
    fn view_params<'a>(&self, params: &'a [f32]) -> (ArrayView2<'a, f32>, ArrayView1<'a, f32>) {
        let w_size = self.size - self.dim.1;
        let weights = ArrayView2::from_shape(self.dim, &params[..w_size]).unwrap();
        let biases = ArrayView1::from_shape(self.dim.1, &params[w_size..]).unwrap();
        (weights, biases)
    }
}
