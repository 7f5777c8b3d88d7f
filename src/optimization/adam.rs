use super::Optimizer;

/// Adaptive moment estimation.
///
/// Keeps exponential moving averages of the gradient and the squared
/// gradient over the flat parameter slice, bias-corrects both, and applies
/// them with a fixed base step size. All decay constants are fixed
/// configuration values; there is no tuning loop.
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,

    m: Vec<f32>,
    v: Vec<f32>,
    t: i32,
}

impl Adam {
    /// Returns a new `Adam` with the usual decay defaults
    /// (`beta1 = 0.9`, `beta2 = 0.999`, `eps = 1e-8`).
    pub fn new(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            m: Vec::new(),
            v: Vec::new(),
            t: 0,
        }
    }

    pub fn with_betas(mut self, beta1: f32, beta2: f32) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }
}

impl Optimizer for Adam {
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) {
        // moment buffers are sized on the first step
        if self.m.len() != params.len() {
            self.m = vec![0.; params.len()];
            self.v = vec![0.; params.len()];
            self.t = 0;
        }

        self.t += 1;
        let bias1 = 1. - self.beta1.powi(self.t);
        let bias2 = 1. - self.beta2.powi(self.t);

        for (i, (w, &g)) in params.iter_mut().zip(grad).enumerate() {
            let m = &mut self.m[i];
            let v = &mut self.v[i];

            *m = self.beta1 * *m + (1. - self.beta1) * g;
            *v = self.beta2 * *v + (1. - self.beta2) * g * g;

            let m_hat = *m / bias1;
            let v_hat = *v / bias2;

            *w -= self.learning_rate * m_hat / (v_hat.sqrt() + self.eps);
        }
    }
}
