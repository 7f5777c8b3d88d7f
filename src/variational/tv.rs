/// Smoothed total variation over a grid viewed from a flat slice.
///
/// The penalty sums `sqrt(d^2 + eps^2) - eps` over every horizontal and
/// vertical neighbor difference `d`, which keeps it differentiable at zero
/// and exactly zero on constant signals. One-dimensional signals are
/// `(1, n)` grids.
#[derive(Debug)]
pub struct TvPenalty {
    rows: usize,
    cols: usize,
    epsilon: f32,
}

const DEFAULT_EPSILON: f32 = 1e-2;

impl TvPenalty {
    /// A penalty over one-dimensional signals of length `n`.
    pub fn new_1d(n: usize) -> Self {
        Self::new_2d(1, n)
    }

    /// A penalty over `rows x cols` image grids.
    pub fn new_2d(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Overrides the smoothing constant.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// The number of grid cells the penalty expects.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evaluates the penalty. Non-negative, zero on constant signals.
    pub fn value(&self, x: &[f32]) -> f32 {
        debug_assert_eq!(x.len(), self.len());
        let eps = self.epsilon;
        let mut total = 0.;

        self.for_each_pair(|lo, hi| {
            let d = x[hi] - x[lo];
            total += (d * d + eps * eps).sqrt() - eps;
        });

        total
    }

    /// Adds `weight` times the penalty gradient to `grad`.
    pub fn accumulate_gradient(&self, x: &[f32], weight: f32, grad: &mut [f32]) {
        debug_assert_eq!(x.len(), self.len());
        debug_assert_eq!(grad.len(), self.len());
        let eps = self.epsilon;

        self.for_each_pair(|lo, hi| {
            let d = x[hi] - x[lo];
            let g = weight * d / (d * d + eps * eps).sqrt();
            grad[hi] += g;
            grad[lo] -= g;
        });
    }

    /// Visits every neighboring `(lo, hi)` flat-index pair of the grid.
    fn for_each_pair<F: FnMut(usize, usize)>(&self, mut f: F) {
        for r in 0..self.rows {
            for c in 0..self.cols {
                let i = r * self.cols + c;
                if c + 1 < self.cols {
                    f(i, i + 1);
                }
                if r + 1 < self.rows {
                    f(i, i + self.cols);
                }
            }
        }
    }
}
