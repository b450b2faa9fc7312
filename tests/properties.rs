use approx::assert_relative_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use xyplot::directives::{Norm, SmoothSpec, Window};
use xyplot::transform::{gaussian_kde, jitter, linspace, normalize, smooth, window_weights};

fn any_window() -> impl Strategy<Value = Window> {
    prop_oneof![
        Just(Window::Flat),
        Just(Window::Hanning),
        Just(Window::Hamming),
        Just(Window::Bartlett),
        Just(Window::Blackman),
    ]
}

proptest! {
    #[test]
    fn smoothing_keeps_length(
        y in prop::collection::vec(-1e3f64..1e3, 3..200),
        len in 3usize..30,
        window in any_window(),
    ) {
        prop_assume!(len <= y.len());
        let out = smooth(&y, SmoothSpec { len, window }).unwrap();
        prop_assert_eq!(out.len(), y.len());
        prop_assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn smoothing_preserves_constants(
        c in -1e3f64..1e3,
        n in 5usize..100,
        len in 3usize..5,
        window in any_window(),
    ) {
        let y = vec![c; n];
        let out = smooth(&y, SmoothSpec { len, window }).unwrap();
        for v in out {
            assert_relative_eq!(v, c, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[test]
    fn smoothing_stays_within_data_range(
        y in prop::collection::vec(-1e3f64..1e3, 10..100),
        len in 3usize..10,
    ) {
        // flat weights are non-negative, so every output is a convex combination
        let out = smooth(&y, SmoothSpec { len, window: Window::Flat }).unwrap();
        let lo = y.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for v in out {
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
    }

    #[test]
    fn window_weights_are_normalized_and_symmetric(
        len in 3usize..64,
        window in any_window(),
    ) {
        let w = window_weights(window, len);
        prop_assert_eq!(w.len(), len);
        assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        for k in 0..len {
            assert_relative_eq!(w[k], w[len - 1 - k], epsilon = 1e-12);
        }
    }

    #[test]
    fn norm_max_hits_target(
        y in prop::collection::vec(1e-3f64..1e3, 1..100),
        target in 0.1f64..100.0,
    ) {
        let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
        let out = normalize(&x, &y, Norm::Max(target)).unwrap();
        let max = out.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(max, target, max_relative = 1e-12);
    }

    #[test]
    fn norm_sum_hits_target(
        y in prop::collection::vec(1e-3f64..1e3, 1..100),
        target in 0.1f64..100.0,
    ) {
        let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
        let out = normalize(&x, &y, Norm::Sum(target)).unwrap();
        assert_relative_eq!(out.iter().sum::<f64>(), target, max_relative = 1e-9);
    }

    #[test]
    fn density_norm_integrates_to_target(
        y in prop::collection::vec(1e-3f64..1e3, 2..100),
        dx in 0.01f64..10.0,
        target in 0.1f64..10.0,
    ) {
        // uniform spacing: sum(out * dx) == target
        let x: Vec<f64> = (0..y.len()).map(|i| i as f64 * dx).collect();
        let out = normalize(&x, &y, Norm::Density(target)).unwrap();
        let mass: f64 = out.iter().map(|v| v * dx).sum();
        assert_relative_eq!(mass, target, max_relative = 1e-9);
    }

    #[test]
    fn kde_integrates_to_one(
        samples in prop::collection::vec(-50f64..50.0, 2..40),
    ) {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let sd = (samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
        prop_assume!(sd > 1e-3);
        let bw = 0.25 * sd;
        let lo = samples.iter().copied().fold(f64::INFINITY, f64::min) - 10.0 * bw;
        let hi = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 10.0 * bw;
        let steps = 20_000;
        let grid = linspace(lo, hi, steps);
        let dens = gaussian_kde(&samples, &grid).unwrap();
        let h = (hi - lo) / (steps - 1) as f64;
        let area: f64 = dens.windows(2).map(|w| 0.5 * (w[0] + w[1]) * h).sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-3);
        prop_assert!(dens.iter().all(|d| *d >= 0.0));
    }

    #[test]
    fn linspace_hits_both_ends(lo in -1e3f64..1e3, span in 1e-3f64..1e3, n in 2usize..500) {
        let v = linspace(lo, lo + span, n);
        prop_assert_eq!(v.len(), n);
        assert_relative_eq!(v[0], lo);
        assert_relative_eq!(v[n - 1], lo + span, epsilon = 1e-9, max_relative = 1e-12);
        prop_assert!(v.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn jitter_stays_in_half_width(v in -1e3f64..1e3, width in 0.0f64..10.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let j = jitter(v, width, &mut rng);
        prop_assert!(j >= v - width / 2.0 - 1e-9);
        prop_assert!(j <= v + width / 2.0 + 1e-9);
    }
}

#[test]
fn smoothing_is_centered_on_a_spike() {
    let mut y = vec![0.0; 21];
    y[10] = 1.0;
    let out = smooth(&y, SmoothSpec { len: 5, window: Window::Flat }).unwrap();
    for (i, v) in out.iter().enumerate() {
        let expected = if (8..=12).contains(&i) { 0.2 } else { 0.0 };
        assert_relative_eq!(*v, expected, epsilon = 1e-12);
    }
}

#[test]
fn smoothing_edges_mirror_asymmetrically() {
    // head padding skips y[0]; tail padding starts with y[n - 1]
    let flat = SmoothSpec { len: 3, window: Window::Flat };
    let tail = smooth(&[0.0, 0.0, 0.0, 0.0, 3.0], flat).unwrap();
    assert_relative_eq!(tail[4], 2.0, epsilon = 1e-12);
    let head = smooth(&[3.0, 0.0, 0.0, 0.0, 0.0], flat).unwrap();
    assert_relative_eq!(head[0], 1.0, epsilon = 1e-12);
}

#[test]
fn short_windows_pass_data_through() {
    let y = [1.0, 5.0, 2.0];
    assert_eq!(smooth(&y, SmoothSpec { len: 2, window: Window::Hanning }).unwrap(), y.to_vec());
}

#[test]
fn window_longer_than_series_is_an_error() {
    let y = [1.0, 2.0, 3.0];
    assert!(smooth(&y, SmoothSpec { len: 5, window: Window::Flat }).is_err());
}

#[test]
fn zero_divisors_are_rejected() {
    let x = [0.0, 1.0];
    assert!(normalize(&x, &[0.0, 0.0], Norm::Max(1.0)).is_err());
    assert!(normalize(&x, &[1.0, -1.0], Norm::Sum(1.0)).is_err());
    assert!(normalize(&x, &[1.0, 2.0], Norm::By(0.0)).is_err());
    assert!(normalize(&[1.0, 1.0], &[1.0, 2.0], Norm::Density(1.0)).is_err());
}

#[test]
fn norm_by_divides() {
    let out = normalize(&[0.0, 1.0], &[10.0, 20.0], Norm::By(10.0)).unwrap();
    assert_eq!(out, vec![1.0, 2.0]);
}

#[test]
fn kde_rejects_single_sample() {
    assert!(gaussian_kde(&[1.0], &[0.0, 1.0]).is_err());
    assert!(gaussian_kde(&[2.0, 2.0, 2.0], &[0.0, 1.0]).is_err());
}

#[test]
fn zero_jitter_is_identity() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(jitter(3.25, 0.0, &mut rng), 3.25);
}
