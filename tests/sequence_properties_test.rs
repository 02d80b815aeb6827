//! Ordering and Z properties of generated position lists.

use pos_list::sequence::{
    generate_pairs, NoiseType, PositionSequencer, SequenceOptions, TraversalMode, ZSpec,
    MIN_Z_SEPARATION,
};
use pos_list::{Advisory, PosListError};
use rand::rngs::StdRng;
use rand::SeedableRng;

const ALL_MODES: [TraversalMode; 4] = [
    TraversalMode::Standard,
    TraversalMode::Reversed,
    TraversalMode::Snake,
    TraversalMode::Random,
];

fn sorted(mut pairs: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    pairs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    pairs
}

fn options(mode: TraversalMode) -> SequenceOptions {
    SequenceOptions {
        mode,
        seed: Some(2024),
        ..Default::default()
    }
}

#[test]
fn test_every_mode_covers_the_cartesian_product() {
    let x = [-100.0, 0.0, 100.0, 250.0];
    let y = [3.0, 1.0, 2.0];
    let standard = sorted(generate_pairs(
        &x,
        &y,
        TraversalMode::Standard,
        &mut StdRng::seed_from_u64(0),
    ));

    for mode in ALL_MODES {
        let pairs = generate_pairs(&x, &y, mode, &mut StdRng::seed_from_u64(0));
        assert_eq!(pairs.len(), x.len() * y.len(), "{}", mode);
        assert_eq!(sorted(pairs), standard, "{}", mode);
    }
}

#[test]
fn test_snake_reverses_direction_on_odd_steps() {
    let x = [0.0, 1.0, 2.0, 3.0];
    let y = [5.0, 6.0];
    let pairs = generate_pairs(&x, &y, TraversalMode::Snake, &mut StdRng::seed_from_u64(0));
    assert_eq!(
        pairs,
        vec![
            (0.0, 5.0),
            (0.0, 6.0),
            (1.0, 6.0),
            (1.0, 5.0),
            (2.0, 5.0),
            (2.0, 6.0),
            (3.0, 6.0),
            (3.0, 5.0),
        ]
    );
}

#[test]
fn test_random_mode_differs_across_seeds_but_not_within() {
    let x: Vec<f64> = (0..10).map(f64::from).collect();
    let y: Vec<f64> = (0..10).map(f64::from).collect();

    let a = PositionSequencer::new(options(TraversalMode::Random))
        .generate(&x, &y, None)
        .unwrap();
    let b = PositionSequencer::new(options(TraversalMode::Random))
        .generate(&x, &y, None)
        .unwrap();
    assert_eq!(a, b);

    let mut other = options(TraversalMode::Random);
    other.seed = Some(7);
    let c = PositionSequencer::new(other).generate(&x, &y, None).unwrap();
    assert_ne!(a.positions, c.positions);

    let standard = generate_pairs(&x, &y, TraversalMode::Standard, &mut StdRng::seed_from_u64(0));
    let shuffled: Vec<(f64, f64)> = a.positions.iter().map(|p| (p.x, p.y)).collect();
    assert_ne!(shuffled, standard);
    assert_eq!(sorted(shuffled), sorted(standard));
}

#[test]
fn test_indices_are_contiguous_in_output_order() {
    for mode in ALL_MODES {
        let generation = PositionSequencer::new(options(mode))
            .generate(&[1.0, 2.0, 3.0], &[4.0, 5.0], Some(&ZSpec::Scalar(10.0)))
            .unwrap();
        let indices: Vec<usize> = generation.positions.iter().map(|p| p.index).collect();
        assert_eq!(indices, (0..6).collect::<Vec<_>>());
    }
}

#[test]
fn test_white_noise_never_repeats_adjacent_z() {
    for seed in 0..10 {
        let opts = SequenceOptions {
            mode: TraversalMode::Standard,
            noise_type: Some(NoiseType::White),
            noise_width: 0.001,
            seed: Some(seed),
            ..Default::default()
        };
        let x: Vec<f64> = (0..15).map(f64::from).collect();
        let generation = PositionSequencer::new(opts)
            .generate(&x, &x, Some(&ZSpec::Scalar(55.5)))
            .unwrap();
        for pair in generation.positions.windows(2) {
            let dz = (pair[0].z.unwrap() - pair[1].z.unwrap()).abs();
            assert!(dz >= MIN_Z_SEPARATION - 1e-9, "seed {}: dz = {}", seed, dz);
        }
        for p in &generation.positions {
            let z = p.z.unwrap();
            assert!((z - 55.5).abs() <= 0.0005 + MIN_Z_SEPARATION + 1e-9);
            assert!(((z * 1e4).round() - z * 1e4).abs() < 1e-6, "{} not rounded", z);
        }
    }
}

#[test]
fn test_oscil_noise_starts_at_base() {
    let opts = SequenceOptions {
        mode: TraversalMode::Standard,
        noise_type: Some(NoiseType::Oscil),
        noise_width: 0.5,
        ..Default::default()
    };
    let generation = PositionSequencer::new(opts)
        .generate(&[0.0, 1.0], &[0.0, 1.0], Some(&ZSpec::Scalar(20.0)))
        .unwrap();
    let zs: Vec<f64> = generation.positions.iter().filter_map(|p| p.z).collect();
    assert_eq!(zs, vec![20.0, 20.5, 20.0, 20.5]);
}

#[test]
fn test_z_stack_multiplies_positions() {
    let opts = SequenceOptions {
        mode: TraversalMode::Standard,
        z_stack: true,
        ..Default::default()
    };
    let planes = vec![-1.0, 0.0, 1.0, 2.0];
    let generation = PositionSequencer::new(opts)
        .generate(&[0.0, 10.0], &[0.0, 10.0, 20.0], Some(&ZSpec::Values(planes.clone())))
        .unwrap();

    assert_eq!(generation.positions.len(), 2 * 3 * planes.len());
    for (i, p) in generation.positions.iter().enumerate() {
        assert_eq!(p.index, i);
        assert_eq!(p.z, Some(planes[i % planes.len()]));
    }
    for group in generation.positions.chunks(planes.len()) {
        assert!(group.iter().all(|p| p.x == group[0].x && p.y == group[0].y));
    }
    assert!(generation.advisories.is_empty());
}

#[test]
fn test_z_stack_with_noise_warns_and_ignores_noise() {
    let base = SequenceOptions {
        mode: TraversalMode::Snake,
        z_stack: true,
        seed: Some(1),
        ..Default::default()
    };
    let noisy = SequenceOptions {
        noise_type: Some(NoiseType::White),
        noise_width: 3.0,
        ..base.clone()
    };
    let z = ZSpec::Values(vec![1.0, 2.0]);

    let quiet = PositionSequencer::new(base)
        .generate(&[0.0, 1.0], &[0.0, 1.0], Some(&z))
        .unwrap();
    let warned = PositionSequencer::new(noisy)
        .generate(&[0.0, 1.0], &[0.0, 1.0], Some(&z))
        .unwrap();

    assert_eq!(quiet.positions, warned.positions);
    assert_eq!(warned.advisories.len(), 1);
    assert!(matches!(warned.advisories[0], Advisory::IncompatibleOptions(_)));
}

#[test]
fn test_z_stack_without_sequence_fails() {
    let opts = SequenceOptions {
        z_stack: true,
        ..Default::default()
    };
    let err = PositionSequencer::new(opts)
        .generate(&[0.0], &[0.0], Some(&ZSpec::Scalar(3.0)))
        .unwrap_err();
    assert!(matches!(err, PosListError::MissingZForStack));
}

#[test]
fn test_mismatched_z_array_fails_whole_generation() {
    let err = PositionSequencer::new(SequenceOptions::default())
        .generate(&[0.0, 1.0], &[0.0, 1.0], Some(&ZSpec::Values(vec![1.0, 2.0, 3.0])))
        .unwrap_err();
    assert!(matches!(
        err,
        PosListError::DimensionMismatch {
            expected: 4,
            found: 3
        }
    ));
}

#[test]
fn test_empty_axis_is_degenerate_not_fatal() {
    let generation = PositionSequencer::new(SequenceOptions::default())
        .generate(&[], &[1.0, 2.0], Some(&ZSpec::Scalar(1.0)))
        .unwrap();
    assert!(generation.positions.is_empty());
    assert_eq!(
        pos_list::pos_file::render(&generation.positions),
        pos_list::pos_file::render(&[])
    );
}
