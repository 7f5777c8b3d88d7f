use super::{Relu, Sigmoid};

/// A fixed pointwise nonlinearity applied after a layer's affine map.
#[derive(Clone, Debug)]
pub enum ActFn {
    Sigmoid(Sigmoid),
    Relu(Relu),
}

impl ActFn {
    pub fn sigmoid(amp: f32) -> Self {
        ActFn::Sigmoid(Sigmoid::new(amp))
    }

    pub fn relu() -> Self {
        ActFn::Relu(Relu::new())
    }

    pub fn f(&self, z: f32) -> f32 {
        match self {
            ActFn::Sigmoid(a) => a.f(z),
            ActFn::Relu(a) => a.f(z),
        }
    }

    pub fn df(&self, z: f32) -> f32 {
        match self {
            ActFn::Sigmoid(a) => a.df(z),
            ActFn::Relu(a) => a.df(z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_dispatch_to_the_wrapped_function() {
        let relu = ActFn::relu();
        assert_eq!(relu.f(-1.), 0.);
        assert_eq!(relu.f(2.), 2.);
        assert_eq!(relu.df(2.), 1.);

        let sigmoid = ActFn::sigmoid(2.);
        assert!((sigmoid.f(0.) - 1.).abs() < 1e-6);
        assert!(sigmoid.df(0.) > 0.);
    }
}
