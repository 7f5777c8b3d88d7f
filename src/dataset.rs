use std::num::NonZeroUsize;

use ndarray::{ArrayView2, Axis};
use rand::Rng;

use crate::error::{Result, TrainErr};

/// An in-memory supervised dataset.
///
/// Samples are stored row-major in one flat buffer: each row holds `x_size`
/// input scalars followed by `y_size` label scalars. Batching hands out
/// column-split views into this buffer, so no sample is ever copied.
#[derive(Debug)]
pub struct Dataset {
    data: Vec<f32>,
    x_size: usize,
    y_size: usize,
    len: usize,
}

impl Dataset {
    /// Creates a new `Dataset` over a flat row-major buffer.
    ///
    /// # Arguments
    /// * `data` - The sample buffer, `x_size + y_size` scalars per row.
    /// * `x_size` - The number of input scalars per sample.
    /// * `y_size` - The number of label scalars per sample.
    ///
    /// # Errors
    /// `ShapeMismatch` when the buffer length is not a whole number of rows,
    /// `InvalidInput` when the row width is zero.
    pub fn new(data: Vec<f32>, x_size: usize, y_size: usize) -> Result<Self> {
        let row = x_size + y_size;
        if row == 0 {
            return Err(TrainErr::InvalidInput("dataset rows must hold at least one scalar"));
        }

        if data.len() % row != 0 {
            return Err(TrainErr::ShapeMismatch {
                what: "dataset buffer",
                got: data.len(),
                expected: data.len() - data.len() % row,
            });
        }

        let len = data.len() / row;
        Ok(Self {
            data,
            x_size,
            y_size,
            len,
        })
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.len
    }

    /// The number of input scalars per sample.
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    /// The number of label scalars per sample.
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Permutes the sample rows in place (Fisher-Yates), so that one pass over
    /// `batches` draws every sample exactly once in a fresh random order.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let row = self.x_size + self.y_size;

        for i in (1..self.len).rev() {
            let j = rng.random_range(0..=i);
            if i == j {
                continue;
            }

            for k in 0..row {
                self.data.swap(i * row + k, j * row + k);
            }
        }
    }

    /// Yields `(inputs, labels)` view pairs over consecutive row chunks.
    ///
    /// The final chunk may be shorter than `batch_size`; it is yielded too.
    pub fn batches(
        &self,
        batch_size: NonZeroUsize,
    ) -> impl Iterator<Item = (ArrayView2<'_, f32>, ArrayView2<'_, f32>)> {
        let row = self.x_size + self.y_size;

        self.data.chunks(batch_size.get() * row).map(move |chunk| {
            let rows = chunk.len() / row;
            let view = ArrayView2::from_shape((rows, row), chunk).unwrap();
            view.split_at(Axis(1), self.x_size)
        })
    }

    /// Returns one `(inputs, labels)` view pair over the whole dataset.
    pub fn split(&self) -> (ArrayView2<'_, f32>, ArrayView2<'_, f32>) {
        let row = self.x_size + self.y_size;
        let view = ArrayView2::from_shape((self.len, row), &self.data).unwrap();
        view.split_at(Axis(1), self.x_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn batch(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn rejects_ragged_buffers() {
        let err = Dataset::new(vec![0.; 7], 2, 1).unwrap_err();
        assert!(matches!(
            err,
            TrainErr::ShapeMismatch { what: "dataset buffer", got: 7, expected: 6 }
        ));
    }

    #[test]
    fn rejects_zero_width_rows() {
        assert!(matches!(
            Dataset::new(vec![], 0, 0),
            Err(TrainErr::InvalidInput(_))
        ));
    }

    #[test]
    fn batches_split_inputs_from_labels() {
        let data = vec![
            1., 2., 10., //
            3., 4., 20., //
            5., 6., 30., //
        ];
        let dataset = Dataset::new(data, 2, 1).unwrap();

        let batches: Vec<_> = dataset.batches(batch(2)).collect();
        assert_eq!(batches.len(), 2);

        let (x, y) = batches[0];
        assert_eq!(x.shape(), &[2, 2]);
        assert_eq!(y.shape(), &[2, 1]);
        assert_eq!(x[[1, 0]], 3.);
        assert_eq!(y[[1, 0]], 20.);

        // the short final batch is still yielded
        let (x, y) = batches[1];
        assert_eq!(x.shape(), &[1, 2]);
        assert_eq!(y[[0, 0]], 30.);
    }

    #[test]
    fn shuffle_keeps_rows_intact() {
        let data: Vec<f32> = (0..30).map(|v| v as f32).collect();
        let mut dataset = Dataset::new(data, 2, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        dataset.shuffle(&mut rng);

        // every original (x, y) row must still appear exactly once
        let (x, y) = dataset.split();
        let mut rows: Vec<[i64; 3]> = (0..dataset.len())
            .map(|i| [x[[i, 0]] as i64, x[[i, 1]] as i64, y[[i, 0]] as i64])
            .collect();
        rows.sort();

        let expected: Vec<[i64; 3]> = (0..10).map(|i| [3 * i, 3 * i + 1, 3 * i + 2]).collect();
        assert_eq!(rows, expected);
    }
}
