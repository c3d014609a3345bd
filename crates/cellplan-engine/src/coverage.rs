//! Probabilistic coverage under log-normal shadowing.
//!
//! The outdoor loss models predict a median; real links scatter around it
//! with a normal distribution in dB whose spread depends on the clutter
//! class. Given the margin between predicted RSRP and the service threshold,
//! the probability of actually clearing the threshold is
//!
//! ```text
//! P = Q(-margin / sigma) = 0.5 * erfc(-margin / (sigma * sqrt(2)))
//! ```

use serde::Serialize;

/// Lower bound applied to the shadowing spread so a zero-sigma scenario
/// degenerates to a sharp step instead of a division by zero.
pub const SIGMA_FLOOR_DB: f64 = 0.1;

/// Number of points on the default shadowing density curve.
pub const DEFAULT_DENSITY_SAMPLES: usize = 1000;

/// Complementary error function, Abramowitz & Stegun 7.1.26.
///
/// Maximum absolute error 1.5e-7, far below the precision any coverage
/// figure is quoted at.
fn erfc(x: f64) -> f64 {
    if x < 0.0 {
        return 2.0 - erfc(-x);
    }
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    poly * (-x * x).exp()
}

/// Probability, in percent, that the actual RSRP clears the threshold given
/// a predicted margin and shadowing spread.
///
/// A zero or negative `sigma_db` is floored to [`SIGMA_FLOOR_DB`] rather
/// than rejected. The result is clamped to `[0, 100]`.
pub fn coverage_probability_pct(margin_db: f64, sigma_db: f64) -> f64 {
    let sigma = sigma_db.max(SIGMA_FLOOR_DB);
    let p = 0.5 * erfc(-margin_db / (std::f64::consts::SQRT_2 * sigma));
    p.clamp(0.0, 1.0) * 100.0
}

/// Margin in dB required on top of the median prediction to reach a target
/// coverage probability.
///
/// Uses a coarse z-score table for the usual planning targets; intermediate
/// percentages interpolate linearly below 50%.
pub fn required_margin_db(target_probability_pct: f64, sigma_db: f64) -> f64 {
    let z = if target_probability_pct >= 99.0 {
        2.33
    } else if target_probability_pct >= 95.0 {
        1.645
    } else if target_probability_pct >= 90.0 {
        1.28
    } else if target_probability_pct >= 75.0 {
        0.67
    } else if target_probability_pct >= 50.0 {
        0.0
    } else {
        -(50.0 - target_probability_pct) / 25.0
    };
    z * sigma_db.max(SIGMA_FLOOR_DB)
}

/// One point of the shadowing density curve.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DensityPoint {
    /// RSRP value in dBm.
    pub rsrp_dbm: f64,
    /// Gaussian probability density at that RSRP.
    pub density: f64,
}

/// Sample the Gaussian density of the shadowed RSRP over `mean ± 4 sigma`.
///
/// Intended for plotting. `samples` below 2 is raised to 2 so the span is
/// always covered.
pub fn shadowing_density_curve(
    mean_rsrp_dbm: f64,
    sigma_db: f64,
    samples: usize,
) -> Vec<DensityPoint> {
    let sigma = sigma_db.max(SIGMA_FLOOR_DB);
    let n = samples.max(2);
    let low = mean_rsrp_dbm - 4.0 * sigma;
    let high = mean_rsrp_dbm + 4.0 * sigma;
    let step = (high - low) / (n - 1) as f64;
    let norm = 1.0 / (sigma * (2.0 * std::f64::consts::PI).sqrt());

    (0..n)
        .map(|i| {
            let rsrp_dbm = low + step * i as f64;
            let z = (rsrp_dbm - mean_rsrp_dbm) / sigma;
            DensityPoint {
                rsrp_dbm,
                density: norm * (-0.5 * z * z).exp(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_margin_is_fifty_percent() {
        // erfc(0) = 1 within the approximation's 1.5e-7 bound.
        let p = coverage_probability_pct(0.0, 8.0);
        assert!((p - 50.0).abs() < 1e-4, "got {p}");
    }

    #[test]
    fn test_probability_monotone_in_margin() {
        let mut previous = -1.0;
        for margin in [-20.0, -10.0, -3.0, 0.0, 3.0, 10.0, 20.0] {
            let p = coverage_probability_pct(margin, 8.0);
            assert!(p > previous, "probability must grow with margin");
            assert!((0.0..=100.0).contains(&p));
            previous = p;
        }
    }

    #[test]
    fn test_large_margins_saturate() {
        assert!(coverage_probability_pct(40.0, 8.0) > 99.9);
        assert!(coverage_probability_pct(-40.0, 8.0) < 0.1);
    }

    #[test]
    fn test_sigma_floor_never_panics() {
        let p = coverage_probability_pct(5.0, 0.0);
        assert!(p > 99.9);
        let p = coverage_probability_pct(-5.0, -3.0);
        assert!(p < 0.1);
    }

    #[test]
    fn test_one_sigma_margin() {
        // P(margin = sigma) = Phi(1) = 84.13%.
        let p = coverage_probability_pct(8.0, 8.0);
        assert!((p - 84.134).abs() < 0.01, "got {p}");
    }

    #[test]
    fn test_required_margin_table() {
        assert!((required_margin_db(95.0, 8.0) - 13.16).abs() < 1e-9);
        assert!((required_margin_db(99.0, 8.0) - 18.64).abs() < 1e-9);
        assert_eq!(required_margin_db(50.0, 8.0), 0.0);
        assert!(required_margin_db(25.0, 8.0) < 0.0);
    }

    #[test]
    fn test_required_margin_non_decreasing() {
        let mut previous = f64::NEG_INFINITY;
        for target in [10.0, 30.0, 50.0, 75.0, 90.0, 95.0, 99.0] {
            let m = required_margin_db(target, 6.0);
            assert!(m >= previous);
            previous = m;
        }
    }

    #[test]
    fn test_density_curve_integrates_to_one() {
        let curve = shadowing_density_curve(-80.0, 8.0, DEFAULT_DENSITY_SAMPLES);
        assert_eq!(curve.len(), DEFAULT_DENSITY_SAMPLES);
        // Trapezoidal integral over ±4 sigma captures 99.99% of the mass.
        let mut integral = 0.0;
        for pair in curve.windows(2) {
            let dx = pair[1].rsrp_dbm - pair[0].rsrp_dbm;
            integral += 0.5 * (pair[0].density + pair[1].density) * dx;
        }
        assert!((integral - 1.0).abs() < 1e-3, "got {integral}");
    }

    #[test]
    fn test_density_curve_peak_at_mean() {
        let curve = shadowing_density_curve(-80.0, 4.0, 101);
        let peak = curve
            .iter()
            .max_by(|a, b| a.density.total_cmp(&b.density))
            .unwrap();
        assert!((peak.rsrp_dbm - (-80.0)).abs() < 0.5);
    }

    #[test]
    fn test_density_curve_minimum_samples() {
        assert_eq!(shadowing_density_curve(-80.0, 8.0, 0).len(), 2);
    }
}
