pub mod activations;
pub mod layers;
pub mod loss;

mod composed;
mod model;
mod sequential;

pub use composed::Composed;
pub use model::Model;
pub use sequential::Sequential;
