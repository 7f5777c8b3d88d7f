mod blur;
mod identity;
mod linear_op;
mod matrix;

pub use blur::Blur1d;
pub use identity::Identity;
pub use linear_op::LinearOperator;
pub use matrix::MatrixOperator;
