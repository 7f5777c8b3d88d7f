use ndarray::{Array1, ArrayView1};

/// A fixed linear physics operator mapping unknowns to observables.
///
/// Operators carry no learnable parameters. Their dimensions are fixed at
/// construction; objectives and composed models check compatibility against
/// `domain_dim` / `range_dim` when they are built, so `apply` itself never
/// has to fail.
pub trait LinearOperator {
    /// Dimension of the unknowns the operator consumes.
    fn domain_dim(&self) -> usize;

    /// Dimension of the observables the operator produces.
    fn range_dim(&self) -> usize;

    /// Computes `A x`.
    fn apply(&self, x: ArrayView1<f32>) -> Array1<f32>;

    /// Computes `A^T y`.
    fn apply_adjoint(&self, y: ArrayView1<f32>) -> Array1<f32>;
}
