use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used across the whole crate.
pub type Result<T> = std::result::Result<T, TrainErr>;

/// The crate's error type.
///
/// Dimension problems are detected when a model, operator or objective is
/// constructed, never in the middle of an optimization run. Numeric
/// divergence (NaN or infinity) is deliberately not represented here.
#[derive(Debug)]
pub enum TrainErr {
    /// Two dimensions that must agree do not.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// An input is invalid for domain reasons rather than dimensional ones.
    InvalidInput(&'static str),
}

impl Display for TrainErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainErr::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            TrainErr::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl Error for TrainErr {}
