use ndarray::{Array2, ArrayView2};

/// A data-fit discrepancy between predictions and targets.
///
/// `loss` must be deterministic and non-negative; `loss_prime` is its
/// gradient with respect to the prediction rows.
pub trait LossFn {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32;
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32>;
}
