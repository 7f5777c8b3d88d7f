use ndarray::{ArrayView2, ArrayViewMut2};

use super::{layers::Dense, loss::LossFn, Model};
use crate::{
    error::{Result, TrainErr},
    optimization::Optimizer,
};

/// A sequential model: information flows forward through the layer stack when
/// computing an output and backward when computing layer deltas.
#[derive(Clone, Debug)]
pub struct Sequential {
    layers: Vec<Dense>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Errors
    /// `InvalidInput` when the layer stack is empty, `ShapeMismatch` when
    /// consecutive layer dimensions do not chain. A model that would fail at
    /// run time is never constructed.
    pub fn new<I>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Dense>,
    {
        let layers: Vec<Dense> = layers.into_iter().collect();
        if layers.is_empty() {
            return Err(TrainErr::InvalidInput("a sequential model needs at least one layer"));
        }

        for pair in layers.windows(2) {
            if pair[0].output_dim() != pair[1].input_dim() {
                return Err(TrainErr::ShapeMismatch {
                    what: "layer input",
                    got: pair[1].input_dim(),
                    expected: pair[0].output_dim(),
                });
            }
        }

        Ok(Self { layers })
    }

    /// The input dimension the first layer expects.
    pub fn input_dim(&self) -> usize {
        self.layers[0].input_dim()
    }

    /// Backpropagates one batch delta through the layer stack, writing the
    /// parameter gradient for every layer.
    ///
    /// The last layer consumes `d` directly; every earlier layer reads the
    /// delta its successor cached.
    pub(crate) fn backward_batch(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        d: ArrayViewMut2<f32>,
    ) -> Result<()> {
        let last = self.layers.len() - 1;
        let mut offset = params.len() - self.layers[last].size();
        self.layers[last].backward(&params[offset..], &mut grad[offset..], d)?;

        for i in (0..last).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            let size = head[i].size();
            offset -= size;
            head[i].backward(
                &params[offset..offset + size],
                &mut grad[offset..offset + size],
                tail[0].delta_mut(),
            )?;
        }

        Ok(())
    }
}

impl Model for Sequential {
    fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].output_dim()
    }

    fn forward<'s>(
        &'s mut self,
        params: &[f32],
        x: ArrayView2<f32>,
    ) -> Result<ArrayView2<'s, f32>> {
        if params.len() != self.size() {
            return Err(TrainErr::ShapeMismatch {
                what: "params",
                got: params.len(),
                expected: self.size(),
            });
        }

        let mut offset = self.layers[0].size();
        self.layers[0].forward(&params[..offset], x)?;

        // each later layer reads the output its predecessor cached
        for i in 1..self.layers.len() {
            let (head, tail) = self.layers.split_at_mut(i);
            let size = tail[0].size();
            tail[0].forward(&params[offset..offset + size], head[i - 1].output())?;
            offset += size;
        }

        Ok(self.layers[self.layers.len() - 1].output())
    }

    // The epoch loss is approximated by averaging the per-batch losses, each
    // measured at the parameters the batch saw.
    fn backprop<'a, L, O, I>(
        &mut self,
        params: &mut [f32],
        grad: &mut [f32],
        loss_fn: &L,
        optimizer: &mut O,
        batches: I,
    ) -> Result<f32>
    where
        L: LossFn,
        O: Optimizer,
        I: Iterator<Item = (ArrayView2<'a, f32>, ArrayView2<'a, f32>)>,
    {
        let mut total_loss = 0.0;
        let mut num_batches = 0;

        for (x, y) in batches {
            grad.fill(0.);

            let y_pred = self.forward(params, x)?;
            total_loss += loss_fn.loss(y_pred, y);
            num_batches += 1;

            let mut d = loss_fn.loss_prime(y_pred, y);
            self.backward_batch(params, grad, d.view_mut())?;

            optimizer.update_params(params, grad);
        }

        Ok(total_loss / num_batches.max(1) as f32)
    }
}
