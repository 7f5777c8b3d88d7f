use std::num::NonZeroUsize;

use log::{debug, info};
use ndarray::Array2;
use rand::Rng;

use super::TrainConfig;
use crate::{
    arch::{loss::LossFn, Model},
    dataset::Dataset,
    error::{Result, TrainErr},
    evaluation::{evaluate, Metric},
    optimization::Optimizer,
};

/// A held-out batch evaluated at fixed epoch intervals.
pub struct Holdout {
    x: Array2<f32>,
    y: Array2<f32>,
    metric: Metric,
    every: usize,
}

impl Holdout {
    /// Creates a new `Holdout` scored with `metric` every `every` epochs.
    pub fn new(x: Array2<f32>, y: Array2<f32>, metric: Metric, every: usize) -> Self {
        Self {
            x,
            y,
            metric,
            every: every.max(1),
        }
    }
}

/// The training loop. Owns every component needed to run a model through a
/// fixed epoch budget: the model, the optimizer, the loss, the dataset, the
/// gradient buffer and an optional holdout.
///
/// The parameter slice itself stays with the caller and is mutated in place.
pub struct Trainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    model: M,
    optimizer: O,
    loss_fn: L,
    dataset: Dataset,
    grad: Vec<f32>,
    holdout: Option<Holdout>,

    epochs: usize,
    batch_size: NonZeroUsize,
    rng: R,
}

impl<M, O, L, R> Trainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `optimizer` - The update rule applied after every batch gradient.
    /// * `loss_fn` - The data-fit term minimized over the dataset.
    /// * `dataset` - The training samples.
    /// * `config` - The fixed epoch budget and batch size.
    /// * `rng` - The generator driving the per-epoch shuffle.
    pub fn new(
        model: M,
        optimizer: O,
        loss_fn: L,
        dataset: Dataset,
        config: &TrainConfig,
        rng: R,
    ) -> Self {
        Self {
            grad: vec![0.; model.size()],
            model,
            optimizer,
            loss_fn,
            dataset,
            holdout: None,
            epochs: config.epochs,
            batch_size: config.batch_size,
            rng,
        }
    }

    /// Attaches a held-out batch scored at fixed epoch intervals.
    pub fn with_holdout(mut self, holdout: Holdout) -> Self {
        self.holdout = Some(holdout);
        self
    }

    /// Runs the full epoch budget, mutating `params` in place.
    ///
    /// Each epoch shuffles the dataset, walks its batches through the
    /// model's backward pass and lets the optimizer update `params`. No
    /// early stopping, no divergence detection.
    ///
    /// # Returns
    /// The mean batch loss of every epoch, in order.
    ///
    /// # Errors
    /// `ShapeMismatch` when `params` does not hold exactly `model.size()`
    /// scalars, or when the dataset's (or holdout's) label width differs
    /// from the model's output dimension. Labels are never broadcast to fit.
    pub fn train(&mut self, params: &mut [f32]) -> Result<Vec<f32>> {
        if params.len() != self.model.size() {
            return Err(TrainErr::ShapeMismatch {
                what: "params",
                got: params.len(),
                expected: self.model.size(),
            });
        }

        if self.dataset.y_size() != self.model.output_dim() {
            return Err(TrainErr::ShapeMismatch {
                what: "label columns",
                got: self.dataset.y_size(),
                expected: self.model.output_dim(),
            });
        }

        if let Some(holdout) = &self.holdout {
            if holdout.y.ncols() != self.model.output_dim() {
                return Err(TrainErr::ShapeMismatch {
                    what: "holdout label columns",
                    got: holdout.y.ncols(),
                    expected: self.model.output_dim(),
                });
            }
        }

        let mut losses = Vec::with_capacity(self.epochs);

        for epoch in 0..self.epochs {
            self.dataset.shuffle(&mut self.rng);
            let batches = self.dataset.batches(self.batch_size);

            let loss = self.model.backprop(
                params,
                &mut self.grad,
                &self.loss_fn,
                &mut self.optimizer,
                batches,
            )?;

            debug!("epoch {epoch}: loss {loss:.6}");
            losses.push(loss);

            if let Some(holdout) = &self.holdout {
                if epoch % holdout.every == 0 {
                    let score = evaluate(
                        &mut self.model,
                        params,
                        holdout.x.view(),
                        holdout.y.view(),
                        holdout.metric,
                    )?;
                    info!("epoch {epoch}: holdout {} {score:.4}", holdout.metric);
                }
            }
        }

        Ok(losses)
    }
}
