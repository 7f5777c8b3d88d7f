mod objective;
mod tv;

pub use objective::TvObjective;
pub use tv::TvPenalty;
