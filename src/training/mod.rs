mod config;
mod trainer;

pub use config::TrainConfig;
pub use trainer::{Holdout, Trainer};
