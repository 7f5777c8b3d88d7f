use std::num::NonZeroUsize;

use anyhow::Result;
use ndarray::Array1;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use invlearn::{
    arch::{activations::ActFn, layers::Dense, Model, Sequential},
    arch::loss::CrossEntropy,
    dataset::Dataset,
    evaluation::{evaluate, Metric},
    operator::Identity,
    optimization::{Adam, GradientDescent},
    training::{Holdout, TrainConfig, Trainer},
    variational::{TvObjective, TvPenalty},
};

fn main() -> Result<()> {
    env_logger::init();

    classification_demo()?;
    denoising_demo()?;

    Ok(())
}

/// Trains a small classifier on two noisy 2-D blobs and reports its
/// accuracy on the training set.
fn classification_demo() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let jitter = Normal::new(0.0f32, 0.15)?;

    let mut data = Vec::new();
    for _ in 0..40 {
        let class = rng.random_range(0..2);
        let (cx, cy) = if class == 0 { (0., 0.) } else { (1., 1.) };

        data.push(cx + jitter.sample(&mut rng));
        data.push(cy + jitter.sample(&mut rng));
        data.push(if class == 0 { 1. } else { 0. });
        data.push(if class == 0 { 0. } else { 1. });
    }

    let dataset = Dataset::new(data, 2, 2)?;
    let (x, y) = dataset.split();
    let (x, y) = (x.to_owned(), y.to_owned());

    let model = Sequential::new([
        Dense::new((2, 8), Some(ActFn::sigmoid(1.))),
        Dense::new((8, 2), None),
    ])?;
    let mut params: Vec<f32> = (0..model.size())
        .map(|_| (rng.random::<f32>() - 0.5) * 0.2)
        .collect();

    let config = TrainConfig::new(300, NonZeroUsize::new(8).expect("non-zero")).with_seed(7);
    let trainer_rng = config.rng();
    let mut trainer = Trainer::new(
        model,
        Adam::new(0.05),
        CrossEntropy,
        dataset,
        &config,
        trainer_rng,
    )
    .with_holdout(Holdout::new(x.clone(), y.clone(), Metric::Accuracy, 50));

    let losses = trainer.train(&mut params)?;

    let mut model = Sequential::new([
        Dense::new((2, 8), Some(ActFn::sigmoid(1.))),
        Dense::new((8, 2), None),
    ])?;
    let accuracy = evaluate(&mut model, &params, x.view(), y.view(), Metric::Accuracy)?;

    println!("classification: final loss {:.4}", losses[losses.len() - 1]);
    println!("classification: training accuracy {:.2}%", accuracy * 100.);

    Ok(())
}

/// Denoises a step signal with the TV-regularized objective and reports how
/// much closer to the clean signal the reconstruction lands.
fn denoising_demo() -> Result<()> {
    let n = 64;
    let mut rng = StdRng::seed_from_u64(1);
    let noise = Normal::new(0.0f32, 0.1)?;

    let clean: Vec<f32> = (0..n).map(|i| if i < n / 2 { 0. } else { 1. }).collect();
    let noisy: Vec<f32> = clean.iter().map(|&v| v + noise.sample(&mut rng)).collect();

    let objective = TvObjective::new(
        Identity::new(n),
        Array1::from_vec(noisy.clone()),
        0.4,
        TvPenalty::new_1d(n).with_epsilon(0.05),
    )?;

    let start = objective.value(&noisy);

    let mut x = noisy.clone();
    let mut optimizer = GradientDescent::new(0.01);
    let end = objective.minimize(&mut x, &mut optimizer, 2000)?;

    let mse = |a: &[f32]| -> f32 {
        a.iter()
            .zip(&clean)
            .map(|(v, c)| (v - c).powi(2))
            .sum::<f32>()
            / n as f32
    };

    println!("denoising: objective {start:.4} -> {end:.4}");
    println!(
        "denoising: mse to clean signal {:.5} -> {:.5}",
        mse(&noisy),
        mse(&x)
    );

    Ok(())
}
