use log::debug;
use ndarray::{Array1, ArrayView1};

use super::TvPenalty;
use crate::{
    error::{Result, TrainErr},
    operator::LinearOperator,
    optimization::Optimizer,
};

/// The variational reconstruction objective
/// `|| A x - y ||^2 + weight * TV(x)`.
///
/// The unknown `x` plays the role the parameter slice plays in model
/// training: a flat caller-owned buffer updated in place by an optimizer.
#[derive(Debug)]
pub struct TvObjective<Op: LinearOperator> {
    op: Op,
    observed: Array1<f32>,
    weight: f32,
    penalty: TvPenalty,
}

impl<Op: LinearOperator> TvObjective<Op> {
    /// Creates a new `TvObjective`.
    ///
    /// # Arguments
    /// * `op` - The forward operator mapping unknowns to observables.
    /// * `observed` - The measured (noisy) observation.
    /// * `weight` - The fixed regularization weight.
    /// * `penalty` - The TV penalty; its grid must cover the operator domain.
    ///
    /// # Errors
    /// `ShapeMismatch` when the observation or the penalty grid disagree
    /// with the operator's dimensions, `InvalidInput` for a negative weight.
    pub fn new(op: Op, observed: Array1<f32>, weight: f32, penalty: TvPenalty) -> Result<Self> {
        if observed.len() != op.range_dim() {
            return Err(TrainErr::ShapeMismatch {
                what: "observation",
                got: observed.len(),
                expected: op.range_dim(),
            });
        }

        if penalty.len() != op.domain_dim() {
            return Err(TrainErr::ShapeMismatch {
                what: "penalty grid",
                got: penalty.len(),
                expected: op.domain_dim(),
            });
        }

        if weight < 0. {
            return Err(TrainErr::InvalidInput("regularization weight must be non-negative"));
        }

        Ok(Self {
            op,
            observed,
            weight,
            penalty,
        })
    }

    /// Evaluates the objective at `x`. Deterministic and non-negative.
    pub fn value(&self, x: &[f32]) -> f32 {
        debug_assert_eq!(x.len(), self.op.domain_dim());

        let residual = self.op.apply(ArrayView1::from(x)) - &self.observed;
        let data_fit = residual.mapv(|v| v * v).sum();

        data_fit + self.weight * self.penalty.value(x)
    }

    /// Writes the objective gradient `2 A^T (A x - y) + weight * grad TV`
    /// into `grad`.
    pub fn gradient(&self, x: &[f32], grad: &mut [f32]) {
        debug_assert_eq!(x.len(), self.op.domain_dim());
        debug_assert_eq!(grad.len(), self.op.domain_dim());

        let residual = self.op.apply(ArrayView1::from(x)) - &self.observed;
        let data_grad = self.op.apply_adjoint(residual.view());

        for (g, &dg) in grad.iter_mut().zip(data_grad.iter()) {
            *g = 2. * dg;
        }

        self.penalty.accumulate_gradient(x, self.weight, grad);
    }

    /// Runs `iters` unconditional optimizer steps on `x` in place.
    ///
    /// # Returns
    /// The objective value at the final iterate.
    pub fn minimize<O: Optimizer>(
        &self,
        x: &mut [f32],
        optimizer: &mut O,
        iters: usize,
    ) -> Result<f32> {
        if x.len() != self.op.domain_dim() {
            return Err(TrainErr::ShapeMismatch {
                what: "reconstruction buffer",
                got: x.len(),
                expected: self.op.domain_dim(),
            });
        }

        let mut grad = vec![0.; x.len()];

        for iter in 0..iters {
            self.gradient(x, &mut grad);
            optimizer.update_params(x, &grad);

            if iter % 100 == 0 {
                debug!("iteration {iter}: objective {:.6}", self.value(x));
            }
        }

        Ok(self.value(x))
    }
}
