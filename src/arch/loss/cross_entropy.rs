use ndarray::{Array2, ArrayView2};

use super::LossFn;

/// Softmax cross-entropy over rows of logits.
///
/// Targets are expected to be one-hot rows (or any distribution summing to
/// one). The softmax is folded into the loss so models emit raw logits from
/// their last layer.
#[derive(Default, Clone, Copy)]
pub struct CrossEntropy;

impl CrossEntropy {
    /// Returns a new `CrossEntropy`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for CrossEntropy {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        let mut total = 0.;

        for (logits, target) in y_pred.rows().into_iter().zip(y.rows()) {
            // log-sum-exp with the usual max shift
            let max = logits.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            let log_sum = logits.mapv(|v| (v - max).exp()).sum().ln() + max;

            total -= target
                .iter()
                .zip(logits)
                .map(|(&t, &l)| t * (l - log_sum))
                .sum::<f32>();
        }

        total / y_pred.nrows().max(1) as f32
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32> {
        let n = y_pred.nrows().max(1) as f32;
        let mut d = Array2::zeros(y_pred.raw_dim());

        for ((logits, target), mut out) in y_pred
            .rows()
            .into_iter()
            .zip(y.rows())
            .zip(d.rows_mut())
        {
            let max = logits.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            let exps = logits.mapv(|v| (v - max).exp());
            let sum = exps.sum();

            out.assign(&((exps / sum - &target) / n));
        }

        d
    }
}
