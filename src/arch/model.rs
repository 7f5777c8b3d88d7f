use ndarray::ArrayView2;

use crate::{arch::loss::LossFn, error::Result, optimization::Optimizer};

/// A differentiable forward model over a flat, caller-owned parameter slice.
pub trait Model {
    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// The width of the output rows `forward` produces.
    fn output_dim(&self) -> usize;

    /// Computes the model output for a batch of row samples.
    ///
    /// Takes `&mut self` because layers cache forward metadata for the
    /// following backward pass; the parameters themselves are never written.
    /// The returned view borrows the model's own cache, not `x`.
    ///
    /// # Errors
    /// `ShapeMismatch` when `params` or the batch width disagree with the
    /// model's dimensions.
    fn forward<'s>(
        &'s mut self,
        params: &[f32],
        x: ArrayView2<f32>,
    ) -> Result<ArrayView2<'s, f32>>;

    /// Runs one epoch over `batches`: per batch, compute the loss gradient
    /// with respect to `params` into `grad` and let `optimizer` update
    /// `params` in place.
    ///
    /// # Returns
    /// The mean batch loss of the epoch, measured before each update.
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
        I: Iterator<Item = (ArrayView2<'a, f32>, ArrayView2<'a, f32>)>;
}
