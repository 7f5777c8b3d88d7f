use std::fmt::{self, Display};

use ndarray::{ArrayView1, ArrayView2};

use crate::{arch::Model, error::Result};

/// A held-out quality metric.
#[derive(Clone, Copy, Debug)]
pub enum Metric {
    /// Fraction of rows whose predicted argmax matches the label argmax.
    Accuracy,
    /// Mean squared difference between prediction and label rows.
    MeanSquaredError,
}

impl Metric {
    /// Scores a prediction against its targets.
    pub fn score(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        match self {
            Metric::Accuracy => {
                let hits = y_pred
                    .rows()
                    .into_iter()
                    .zip(y.rows())
                    .filter(|(p, t)| argmax(*p) == argmax(*t))
                    .count();

                hits as f32 / y_pred.nrows().max(1) as f32
            }
            Metric::MeanSquaredError => (&y_pred - &y)
                .mapv(|v| v.powi(2))
                .mean()
                .unwrap_or_default(),
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Accuracy => write!(f, "accuracy"),
            Metric::MeanSquaredError => write!(f, "mse"),
        }
    }
}

/// Evaluates a model on a held-out batch.
///
/// Read-only with respect to `params` and idempotent: calling it twice with
/// the same arguments returns the same scalar.
pub fn evaluate<M: Model>(
    model: &mut M,
    params: &[f32],
    x: ArrayView2<f32>,
    y: ArrayView2<f32>,
    metric: Metric,
) -> Result<f32> {
    let y_pred = model.forward(params, x)?;
    Ok(metric.score(y_pred, y))
}

fn argmax(row: ArrayView1<f32>) -> usize {
    let mut best = 0;
    let mut best_val = f32::NEG_INFINITY;

    for (i, &v) in row.iter().enumerate() {
        if v > best_val {
            best = i;
            best_val = v;
        }
    }

    best
}
