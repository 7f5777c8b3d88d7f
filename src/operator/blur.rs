use ndarray::{Array1, ArrayView1};

use super::LinearOperator;
use crate::error::{Result, TrainErr};

/// One-dimensional convolution blur with zero boundary conditions.
pub struct Blur1d {
    kernel: Vec<f32>,
    n: usize,
}

impl Blur1d {
    /// Creates a blur over signals of length `n`.
    ///
    /// # Errors
    /// `InvalidInput` when the kernel length is even or zero; the kernel
    /// must have a well-defined center tap.
    pub fn new(kernel: Vec<f32>, n: usize) -> Result<Self> {
        if kernel.is_empty() || kernel.len() % 2 == 0 {
            return Err(TrainErr::InvalidInput("blur kernel must have odd length"));
        }

        Ok(Self { kernel, n })
    }

    /// A normalized Gaussian kernel with `2 * radius + 1` taps.
    pub fn gaussian(n: usize, radius: usize, sigma: f32) -> Result<Self> {
        if sigma <= 0. {
            return Err(TrainErr::InvalidInput("gaussian sigma must be positive"));
        }

        let taps: Vec<f32> = (-(radius as i64)..=radius as i64)
            .map(|k| (-(k * k) as f32 / (2. * sigma * sigma)).exp())
            .collect();
        let sum: f32 = taps.iter().sum();

        Self::new(taps.into_iter().map(|t| t / sum).collect(), n)
    }
}

impl LinearOperator for Blur1d {
    fn domain_dim(&self) -> usize {
        self.n
    }

    fn range_dim(&self) -> usize {
        self.n
    }

    fn apply(&self, x: ArrayView1<f32>) -> Array1<f32> {
        debug_assert_eq!(x.len(), self.n);
        let r = (self.kernel.len() / 2) as isize;
        let n = self.n as isize;
        let mut out = Array1::zeros(self.n);

        for i in 0..n {
            let mut acc = 0.;
            for (k, &w) in self.kernel.iter().enumerate() {
                let j = i + k as isize - r;
                if (0..n).contains(&j) {
                    acc += w * x[j as usize];
                }
            }
            out[i as usize] = acc;
        }

        out
    }

    fn apply_adjoint(&self, y: ArrayView1<f32>) -> Array1<f32> {
        debug_assert_eq!(y.len(), self.n);
        let r = (self.kernel.len() / 2) as isize;
        let n = self.n as isize;
        let mut out = Array1::zeros(self.n);

        for j in 0..n {
            let mut acc = 0.;
            for (k, &w) in self.kernel.iter().enumerate() {
                let i = j + r - k as isize;
                if (0..n).contains(&i) {
                    acc += w * y[i as usize];
                }
            }
            out[j as usize] = acc;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn rejects_even_kernels() {
        assert!(matches!(
            Blur1d::new(vec![0.5, 0.5], 8),
            Err(TrainErr::InvalidInput(_))
        ));
    }

    #[test]
    fn averaging_kernel_smooths_an_impulse() {
        let op = Blur1d::new(vec![0.25, 0.5, 0.25], 5).unwrap();
        let x = arr1(&[0., 0., 1., 0., 0.]);

        let y = op.apply(x.view());
        assert_eq!(y, arr1(&[0., 0.25, 0.5, 0.25, 0.]));
    }

    #[test]
    fn gaussian_kernel_sums_to_one() {
        let op = Blur1d::gaussian(16, 3, 1.2).unwrap();
        let sum: f32 = op.kernel.iter().sum();
        assert!((sum - 1.).abs() < 1e-6);
    }

    #[test]
    fn adjoint_satisfies_the_inner_product_identity() {
        // asymmetric kernel, so adjoint != apply
        let op = Blur1d::new(vec![0.7, 0.2, 0.1], 6).unwrap();
        let x = arr1(&[1., -2., 0.5, 3., 0., 1.]);
        let y = arr1(&[0.3, 1., -1., 0.25, 2., -0.5]);

        let lhs = op.apply(x.view()).dot(&y);
        let rhs = x.dot(&op.apply_adjoint(y.view()));

        assert!((lhs - rhs).abs() < 1e-5);
    }
}
