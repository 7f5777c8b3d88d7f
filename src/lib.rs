pub mod arch;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod operator;
pub mod optimization;
mod test;
pub mod training;
pub mod variational;

pub use error::{Result, TrainErr};
