//! Numeric transforms: jitter, smoothing, normalization and kernel density

use crate::data::DataSet;
use crate::directives::{Limits, Norm, SmoothSpec, Window};
use crate::error::{PlotError, Result};
use rand::Rng;
use std::f64::consts::PI;

/// Points on the density grid
pub const DENSITY_POINTS: usize = 50;

/// Kernel width as a fraction of the sample standard deviation
pub const KDE_COVARIANCE_FACTOR: f64 = 0.25;

/// Shifts `v` by a uniform draw from `[-width/2, width/2)`; zero width is a no-op
pub fn jitter<G: Rng>(v: f64, width: f64, rng: &mut G) -> f64 {
    if width == 0.0 {
        return v;
    }
    v + rng.gen::<f64>() * width - 0.5 * width
}

/// `n` evenly spaced values from `lo` to `hi`, both ends included
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}

/// Normalized window weights of length `len`
pub fn window_weights(window: Window, len: usize) -> Vec<f64> {
    let m = (len.max(2) - 1) as f64;
    let w: Vec<f64> = (0..len)
        .map(|k| {
            let k = k as f64;
            match window {
                Window::Flat => 1.0,
                Window::Hanning => 0.5 - 0.5 * (2.0 * PI * k / m).cos(),
                Window::Hamming => 0.54 - 0.46 * (2.0 * PI * k / m).cos(),
                Window::Bartlett => 1.0 - (2.0 * k / m - 1.0).abs(),
                Window::Blackman => {
                    0.42 - 0.5 * (2.0 * PI * k / m).cos() + 0.08 * (4.0 * PI * k / m).cos()
                }
            }
        })
        .collect();
    let total: f64 = w.iter().sum();
    w.into_iter().map(|v| v / total).collect()
}

/// Window smoothing with reflected ends.
///
/// The input is padded with `len - 1` mirrored samples on each side: the head
/// mirrors `y[1..len]` and leaves out `y[0]`, while the tail mirrors the last
/// `len - 1` samples starting with `y[n - 1]` itself. The padded signal is
/// convolved with the normalized window and cropped so that output `j` is
/// centered on input `j`.
pub fn smooth(y: &[f64], spec: SmoothSpec) -> Result<Vec<f64>> {
    let w = spec.len;
    if w < 3 {
        return Ok(y.to_vec());
    }
    let n = y.len();
    if n < w {
        return Err(PlotError::WindowTooLong { window: w, len: n });
    }
    let mut padded: Vec<f64> = Vec::with_capacity(n + 2 * (w - 1));
    padded.extend(y[1..w].iter().rev());
    padded.extend_from_slice(y);
    padded.extend(y[n - w + 1..].iter().rev());

    let weights = window_weights(spec.window, w);
    let start = (w - 1) / 2;
    Ok((start..start + n)
        .map(|k| {
            weights
                .iter()
                .rev()
                .zip(&padded[k..k + w])
                .map(|(a, b)| a * b)
                .sum::<f64>()
        })
        .collect())
}

/// Applies a `+norm` mode to `y`, using `x` for the density spacing
pub fn normalize(x: &[f64], y: &[f64], norm: Norm) -> Result<Vec<f64>> {
    if y.is_empty() {
        return Ok(Vec::new());
    }
    match norm {
        Norm::Max(v) => {
            let max = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max == 0.0 {
                return Err(PlotError::ZeroDivisor(format!("max={v}")));
            }
            Ok(y.iter().map(|a| v * a / max).collect())
        }
        Norm::By(v) => {
            if v == 0.0 {
                return Err(PlotError::ZeroDivisor(format!("by={v}")));
            }
            Ok(y.iter().map(|a| a / v).collect())
        }
        Norm::Sum(v) => {
            let sum: f64 = y.iter().sum();
            if sum == 0.0 {
                return Err(PlotError::ZeroDivisor(format!("sum={v}")));
            }
            Ok(y.iter().map(|a| v * a / sum).collect())
        }
        Norm::Density(v) => {
            let sum: f64 = y.iter().sum();
            if sum == 0.0 {
                return Err(PlotError::ZeroDivisor(format!("dnsity={v}")));
            }
            let mut out = Vec::with_capacity(y.len());
            let mut last_dx = 1.0;
            for j in 0..y.len() {
                let dx = match (x.get(j), x.get(j + 1)) {
                    (Some(a), Some(b)) => b - a,
                    _ => last_dx,
                };
                if dx == 0.0 {
                    return Err(PlotError::ZeroDivisor(format!("dnsity={v} (repeated x)")));
                }
                last_dx = dx;
                out.push(v * y[j] / sum / dx);
            }
            Ok(out)
        }
    }
}

/// Gaussian kernel density of `samples`, evaluated at `grid`.
///
/// Kernel width is [`KDE_COVARIANCE_FACTOR`] times the sample standard
/// deviation (n - 1 denominator).
pub fn gaussian_kde(samples: &[f64], grid: &[f64]) -> Result<Vec<f64>> {
    let n = samples.len();
    if n < 2 {
        return Err(PlotError::DegenerateDensity(n));
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    if var <= 0.0 || !var.is_finite() {
        return Err(PlotError::DegenerateDensity(n));
    }
    let bw = KDE_COVARIANCE_FACTOR * var.sqrt();
    let scale = 1.0 / (n as f64 * bw * (2.0 * PI).sqrt());
    Ok(grid
        .iter()
        .map(|&g| {
            samples
                .iter()
                .map(|&s| (-0.5 * ((g - s) / bw).powi(2)).exp())
                .sum::<f64>()
                * scale
        })
        .collect())
}

/// Replaces every set's samples by its density curve.
///
/// All sets share one grid spanning `xlim`; open ends take the extreme of
/// the pooled samples.
pub fn apply_density(sets: &mut [DataSet], xlim: Limits) -> Result<()> {
    let (lo, hi) = sets
        .iter()
        .flat_map(|s| s.x.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let lo = xlim.lo.unwrap_or(lo);
    let hi = xlim.hi.unwrap_or(hi);
    if !(lo.is_finite() && hi.is_finite()) {
        return Err(PlotError::DegenerateDensity(0));
    }
    let grid = linspace(lo, hi, DENSITY_POINTS);
    for set in sets.iter_mut() {
        set.y = gaussian_kde(&set.x, &grid)?;
        set.x = grid.clone();
    }
    Ok(())
}

/// Runs the post-read pipeline on all sets: density, then `+norm`, then `+smooth`
pub fn apply_all(
    sets: &mut [DataSet],
    density: Option<Limits>,
    norm: Option<Norm>,
    smoothing: Option<SmoothSpec>,
) -> Result<()> {
    if let Some(xlim) = density {
        apply_density(sets, xlim)?;
    }
    for set in sets.iter_mut() {
        if let Some(n) = norm {
            set.y = normalize(&set.x, &set.y, n)?;
        }
        if let Some(s) = smoothing {
            if !set.y.is_empty() {
                set.y = smooth(&set.y, s)?;
            }
        }
    }
    Ok(())
}
