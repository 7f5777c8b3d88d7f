#![cfg(test)]

use std::num::NonZeroUsize;

use ndarray::{arr1, arr2, Array1};

use crate::{
    arch::{activations::ActFn, layers::Dense, Composed, Model, Sequential},
    arch::loss::{CrossEntropy, Mse},
    dataset::Dataset,
    evaluation::{evaluate, Metric},
    operator::{Blur1d, Identity, LinearOperator},
    optimization::{Adam, GradientDescent},
    training::{Holdout, TrainConfig, Trainer},
    variational::{TvObjective, TvPenalty},
};

fn batch(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

#[test]
fn test_separable_two_class_problem_reaches_full_accuracy() {
    // two one-hot labeled samples on opposite axes
    let data = vec![
        1., 0., 1., 0., //
        0., 1., 0., 1., //
    ];
    let dataset = Dataset::new(data, 2, 2).unwrap();
    let (x, y) = dataset.split();
    let (x, y) = (x.to_owned(), y.to_owned());

    let model = Sequential::new([Dense::new((2, 2), None)]).unwrap();
    let mut params = vec![0.; model.size()];

    let config = TrainConfig::new(200, batch(2)).with_seed(3);
    let rng = config.rng();
    let mut trainer = Trainer::new(
        model,
        GradientDescent::new(1.),
        CrossEntropy,
        dataset,
        &config,
        rng,
    )
    .with_holdout(Holdout::new(x.clone(), y.clone(), Metric::Accuracy, 50));

    trainer.train(&mut params).unwrap();

    let mut model = Sequential::new([Dense::new((2, 2), None)]).unwrap();
    let accuracy =
        evaluate(&mut model, &params, x.view(), y.view(), Metric::Accuracy).unwrap();

    assert_eq!(accuracy, 1.);
}

#[test]
fn test_gradient_descent_never_increases_a_convex_objective() {
    // linear least squares: y = 2 x1 - x2 + 0.5, full-batch descent
    let data = vec![
        0., 0., 0.5, //
        1., 0., 2.5, //
        0., 1., -0.5, //
        1., 1., 1.5, //
        0.5, 0.5, 1., //
        -1., 0.5, -2., //
    ];
    let dataset = Dataset::new(data, 2, 1).unwrap();

    let model = Sequential::new([Dense::new((2, 1), None)]).unwrap();
    let mut params = vec![0.; model.size()];

    let config = TrainConfig::new(100, batch(6)).with_seed(11);
    let rng = config.rng();
    let mut trainer = Trainer::new(
        model,
        GradientDescent::new(0.05),
        Mse,
        dataset,
        &config,
        rng,
    );

    let losses = trainer.train(&mut params).unwrap();

    for pair in losses.windows(2) {
        assert!(
            pair[1] <= pair[0] + 1e-6,
            "loss increased: {} -> {}",
            pair[0],
            pair[1]
        );
    }
    assert!(losses[losses.len() - 1] < losses[0]);
}

#[test]
fn test_tv_objective_prefers_the_clean_step_signal() {
    let n = 32;
    let clean: Vec<f32> = (0..n).map(|i| if i < n / 2 { 0. } else { 1. }).collect();

    // fixed alternating noise roughens the signal without moving it far
    let noisy: Vec<f32> = clean
        .iter()
        .enumerate()
        .map(|(i, &v)| v + if i % 2 == 0 { 0.05 } else { -0.05 })
        .collect();

    let objective = TvObjective::new(
        Identity::new(n),
        Array1::from_vec(noisy.clone()),
        0.5,
        TvPenalty::new_1d(n),
    )
    .unwrap();

    assert!(objective.value(&clean) < objective.value(&noisy));
}

#[test]
fn test_tv_denoising_lowers_the_objective() {
    let n = 32;
    let clean: Vec<f32> = (0..n).map(|i| if i < n / 2 { 0. } else { 1. }).collect();
    let noisy: Vec<f32> = clean
        .iter()
        .enumerate()
        .map(|(i, &v)| v + if i % 3 == 0 { 0.1 } else { -0.05 })
        .collect();

    let objective = TvObjective::new(
        Identity::new(n),
        Array1::from_vec(noisy.clone()),
        0.3,
        TvPenalty::new_1d(n).with_epsilon(0.1),
    )
    .unwrap();

    let start = objective.value(&noisy);

    let mut x = noisy.clone();
    let mut opt = GradientDescent::new(0.01);
    let end = objective.minimize(&mut x, &mut opt, 500).unwrap();

    assert!(end < start, "objective did not decrease: {start} -> {end}");

    // the denoised signal sits closer to the clean one than the observation
    let err = |a: &[f32]| -> f32 {
        a.iter()
            .zip(&clean)
            .map(|(v, c)| (v - c).powi(2))
            .sum::<f32>()
    };
    assert!(err(&x) < err(&noisy));
}

#[test]
fn test_learned_reconstruction_loss_decreases() {
    // samples are signals, labels are the signals themselves: the network
    // learns to undo the blur the operator applies
    let n = 4;
    let signals = [
        [1., 0., 0., 0.],
        [0., 1., 0., 0.],
        [0., 0., 1., 0.],
        [0., 0., 0., 1.],
        [1., 1., 0., 0.],
        [0., 0., 1., 1.],
    ];

    let mut data = Vec::new();
    for s in &signals {
        data.extend_from_slice(s);
        data.extend_from_slice(s);
    }
    let dataset = Dataset::new(data, n, n).unwrap();

    let op = Blur1d::new(vec![0.25, 0.5, 0.25], n).unwrap();
    let net = Sequential::new([Dense::new((n, n), None)]).unwrap();
    let model = Composed::new(op, net).unwrap();
    let mut params = vec![0.; model.size()];

    let config = TrainConfig::new(300, batch(6)).with_seed(5);
    let rng = config.rng();
    let mut trainer = Trainer::new(model, Adam::new(0.05), Mse, dataset, &config, rng);

    let losses = trainer.train(&mut params).unwrap();

    assert!(
        losses[losses.len() - 1] < 0.5 * losses[0],
        "loss did not drop: {} -> {}",
        losses[0],
        losses[losses.len() - 1]
    );
}

#[test]
fn test_sigmoid_network_fits_a_conjunction() {
    let and2 = vec![
        0., 0., 0., //
        0., 1., 0., //
        1., 0., 0., //
        1., 1., 1., //
    ];
    let dataset = Dataset::new(and2.clone(), 2, 1).unwrap();

    let model = Sequential::new([
        Dense::new((2, 3), Some(ActFn::sigmoid(1.))),
        Dense::new((3, 1), Some(ActFn::sigmoid(1.))),
    ])
    .unwrap();
    let mut params = vec![0.; model.size()];

    let config = TrainConfig::new(4000, batch(4)).with_seed(17);
    let rng = config.rng();
    let mut trainer = Trainer::new(
        model,
        GradientDescent::new(5.),
        Mse,
        dataset,
        &config,
        rng,
    );
    trainer.train(&mut params).unwrap();

    let mut model = Sequential::new([
        Dense::new((2, 3), Some(ActFn::sigmoid(1.))),
        Dense::new((3, 1), Some(ActFn::sigmoid(1.))),
    ])
    .unwrap();
    let x = arr2(&[[0., 0.], [0., 1.], [1., 0.], [1., 1.]]);
    let y_pred = model.forward(&params, x.view()).unwrap();

    for (i, expected) in [0., 0., 0., 1.].iter().enumerate() {
        assert!(
            (y_pred[[i, 0]] - expected).abs() < 0.3,
            "sample {i}: predicted {}, wanted {expected}",
            y_pred[[i, 0]]
        );
    }
}

#[test]
fn test_blurred_observation_recovers_with_matrix_physics() {
    // small deconvolution with the adjoint available: TV reconstruction
    // through a non-trivial operator
    let n = 8;
    let clean = arr1(&[0., 0., 0., 1., 1., 1., 0., 0.]);
    let op = Blur1d::new(vec![0.25, 0.5, 0.25], n).unwrap();
    let observed = op.apply(clean.view());

    let objective = TvObjective::new(
        op,
        observed,
        0.05,
        TvPenalty::new_1d(n).with_epsilon(0.1),
    )
    .unwrap();

    let mut x = vec![0.; n];
    let start = objective.value(&x);
    let mut opt = GradientDescent::new(0.05);
    let end = objective.minimize(&mut x, &mut opt, 1000).unwrap();

    assert!(end < start);
    // the plateau should rise well above the background
    assert!(x[4] > 0.5);
    assert!(x[0] < 0.3);
}
