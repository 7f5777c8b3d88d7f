use ndarray::{Array2, ArrayView2};

use super::{loss::LossFn, Model, Sequential};
use crate::{
    error::{Result, TrainErr},
    operator::LinearOperator,
    optimization::Optimizer,
};

/// A learned-reconstruction model: a fixed physics operator followed by a
/// trainable network.
///
/// The operator projects every input sample into observation space; only the
/// network carries parameters, so gradients never have to flow through the
/// operator itself.
#[derive(Debug)]
pub struct Composed<Op: LinearOperator> {
    op: Op,
    net: Sequential,

    // Forward metadata
    projected: Array2<f32>,
}

impl<Op: LinearOperator> Composed<Op> {
    /// Creates a new `Composed`.
    ///
    /// # Errors
    /// `ShapeMismatch` when the network's input dimension differs from the
    /// operator's range dimension.
    pub fn new(op: Op, net: Sequential) -> Result<Self> {
        if net.input_dim() != op.range_dim() {
            return Err(TrainErr::ShapeMismatch {
                what: "network input",
                got: net.input_dim(),
                expected: op.range_dim(),
            });
        }

        Ok(Self {
            op,
            net,
            projected: Array2::zeros((0, 0)),
        })
    }
}

impl<Op: LinearOperator> Model for Composed<Op> {
    fn size(&self) -> usize {
        self.net.size()
    }

    fn output_dim(&self) -> usize {
        self.net.output_dim()
    }

    fn forward<'s>(
        &'s mut self,
        params: &[f32],
        x: ArrayView2<f32>,
    ) -> Result<ArrayView2<'s, f32>> {
        if x.ncols() != self.op.domain_dim() {
            return Err(TrainErr::ShapeMismatch {
                what: "batch columns",
                got: x.ncols(),
                expected: self.op.domain_dim(),
            });
        }

        self.projected = Array2::zeros((x.nrows(), self.op.range_dim()));
        for (row, mut out) in x.rows().into_iter().zip(self.projected.rows_mut()) {
            out.assign(&self.op.apply(row));
        }

        self.net.forward(params, self.projected.view())
    }

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
            self.net.backward_batch(params, grad, d.view_mut())?;

            optimizer.update_params(params, grad);
        }

        Ok(total_loss / num_batches.max(1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arch::layers::Dense, operator::MatrixOperator};

    #[test]
    fn rejects_mismatched_operator_and_network() {
        let op = MatrixOperator::from_vec(vec![0.; 6], 3, 2).unwrap();
        let net = Sequential::new([Dense::new((2, 1), None)]).unwrap();

        let err = Composed::new(op, net).unwrap_err();
        assert!(matches!(
            err,
            TrainErr::ShapeMismatch { what: "network input", got: 2, expected: 3 }
        ));
    }

    #[test]
    fn forward_is_the_network_applied_to_the_projection() {
        // A doubles and swaps the two inputs, the network sums them
        let op = MatrixOperator::from_vec(vec![0., 2., 2., 0.], 2, 2).unwrap();
        let net = Sequential::new([Dense::new((2, 1), None)]).unwrap();
        let mut model = Composed::new(op, net).unwrap();

        let params = [1., 1., 0.];
        let x = ndarray::arr2(&[[1., 3.]]);

        let y = model.forward(&params, x.view()).unwrap();
        assert_eq!(y, ndarray::arr2(&[[8.]]));
    }
}
