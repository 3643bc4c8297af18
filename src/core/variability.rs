// Random variation of nominal input values.

use crate::core::units::{Quantity, UnitError};
use nalgebra::{Matrix2, Vector2};
use rand::Rng;
use rand_distr::{Distribution, Normal, Triangular};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Triangular as TriangularCdf};
use thiserror::Error;

/// Probability mass below the lower and above the upper percentile input.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;
/// Standard deviation of normally varied values, as a fraction of the nominal value.
pub const NORMAL_STD_DEV_FRACTION: f64 = 0.1;

const MAX_ITERATIONS: usize = 100;
const RESIDUAL_TOLERANCE: f64 = 1e-10;
const ACCEPTED_RESIDUAL: f64 = 1e-5;
const PERCENTILE_CHECK_TOLERANCE: f64 = 1e-3;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum TriangularLimitsError {
    #[error("Percentile bounds must be finite with the lower one not above the upper one (got {p05} and {p95})")]
    InvalidBounds { p05: f64, p95: f64 },
    #[error("No triangular distribution with peak {peak} has percentile bounds [{p05}, {p95}]")]
    PeakOutsideBounds { p05: f64, p95: f64, peak: f64 },
    #[error("Significance must be between 0 and 0.5 exclusive, got {0}")]
    InvalidSignificance(f64),
    #[error("Solving for triangular distribution limits did not converge after {iterations} iterations (residual {residual})")]
    NotConverged { iterations: usize, residual: f64 },
    #[error("Triangular distribution with limits ({min}, {max}) and peak {peak} is invalid: {reason}")]
    InvalidDistribution {
        min: f64,
        max: f64,
        peak: f64,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum VariabilityError {
    #[error(transparent)]
    TriangularLimits(#[from] TriangularLimitsError),
    #[error(transparent)]
    Unit(#[from] UnitError),
    #[error("Cannot build a normal distribution around {nominal}: {reason}")]
    InvalidNormal { nominal: f64, reason: String },
}

/// Lower and upper bound (5th and 95th percentile equivalents) and most likely value of a
/// quantity, as given in base data.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct VariabilityTriple {
    pub min: Quantity,
    pub max: Quantity,
    pub peak: Quantity,
}

/// Find the limits of the triangular distribution with mode `peak` for which `p05` and `p95`
/// are the `significance` and `1 - significance` quantiles. Returns `(min, max)`.
pub fn triang_dist_limits(
    p05: f64,
    p95: f64,
    peak: f64,
    significance: f64,
) -> Result<(f64, f64), TriangularLimitsError> {
    if !(p05.is_finite() && p95.is_finite() && p05 <= p95) {
        return Err(TriangularLimitsError::InvalidBounds { p05, p95 });
    }
    if !(significance > 0. && significance < 0.5) {
        return Err(TriangularLimitsError::InvalidSignificance(significance));
    }
    if !(p05..=p95).contains(&peak) {
        return one_sided_limits(p05, p95, peak, significance);
    }
    if p05 == p95 {
        return Ok((peak, peak));
    }

    // Unknowns are the distances of the limits beyond the percentile bounds, which keeps the
    // iteration away from the spurious solution with limits inside the bounds.
    let residuals = |d: &Vector2<f64>| {
        let (min, max) = (p05 - d[0], p95 + d[1]);
        Vector2::new(
            d[0].powi(2) / ((max - min) * (peak - min)) - significance,
            d[1].powi(2) / ((max - min) * (max - peak)) - significance,
        )
    };

    let span = p95 - p05;
    let step = 1e-7 * span;
    let mut d = Vector2::new(0.1 * span, 0.1 * span);
    let mut f = residuals(&d);
    let mut iterations = 0;
    while f.amax() > RESIDUAL_TOLERANCE && iterations < MAX_ITERATIONS {
        iterations += 1;
        let f_d0 = residuals(&Vector2::new(d[0] + step, d[1]));
        let f_d1 = residuals(&Vector2::new(d[0], d[1] + step));
        let jacobian = Matrix2::from_columns(&[(f_d0 - f) / step, (f_d1 - f) / step]);
        let Some(inverse) = jacobian.try_inverse() else {
            break;
        };
        let delta = inverse * f;

        let mut damping = 1.;
        while (d[0] - damping * delta[0] <= 0. || d[1] - damping * delta[1] <= 0.)
            && damping > 1e-12
        {
            damping *= 0.5;
        }
        d -= damping * delta;
        f = residuals(&d);
    }

    let residual = f.amax();
    if !residual.is_finite() || residual > ACCEPTED_RESIDUAL {
        return Err(TriangularLimitsError::NotConverged {
            iterations,
            residual,
        });
    }
    let (min, max) = (p05 - d[0], p95 + d[1]);
    check_percentiles(min, max, peak, p05, p95, significance)?;

    Ok((min, max))
}

/// Limits for a peak beyond one of the bounds. Both bounds then lie on the same flank of the
/// triangle, where the ratio of their distances to the far limit is fixed by the significance.
fn one_sided_limits(
    p05: f64,
    p95: f64,
    peak: f64,
    significance: f64,
) -> Result<(f64, f64), TriangularLimitsError> {
    let ratio = ((1. - significance) / significance).sqrt();
    let (min, max) = if peak < p05 {
        let max = (ratio * p95 - p05) / (ratio - 1.);
        (max - (max - p95).powi(2) / (significance * (max - peak)), max)
    } else {
        let min = (ratio * p05 - p95) / (ratio - 1.);
        (min, min + (p05 - min).powi(2) / (significance * (peak - min)))
    };
    if !(min..=max).contains(&peak) {
        return Err(TriangularLimitsError::PeakOutsideBounds { p05, p95, peak });
    }
    check_percentiles(min, max, peak, p05, p95, significance)?;

    Ok((min, max))
}

fn check_percentiles(
    min: f64,
    max: f64,
    peak: f64,
    p05: f64,
    p95: f64,
    significance: f64,
) -> Result<(), TriangularLimitsError> {
    let invalid = |reason: String| TriangularLimitsError::InvalidDistribution {
        min,
        max,
        peak,
        reason,
    };
    let distribution = TriangularCdf::new(min, max, peak).map_err(|e| invalid(e.to_string()))?;
    let lower = distribution.cdf(p05);
    let upper = 1. - distribution.cdf(p95);
    if (lower - significance).abs() > PERCENTILE_CHECK_TOLERANCE * significance
        || (upper - significance).abs() > PERCENTILE_CHECK_TOLERANCE * significance
    {
        return Err(invalid(format!(
            "tail probabilities are {lower} and {upper} instead of {significance}"
        )));
    }
    Ok(())
}

/// One independent draw from Triangular(min, max, mode = peak).
pub fn sample_triangular<R: Rng + ?Sized>(
    min: f64,
    max: f64,
    peak: f64,
    rng: &mut R,
) -> Result<f64, TriangularLimitsError> {
    if min == max && min == peak {
        return Ok(peak);
    }
    let distribution =
        Triangular::new(min, max, peak).map_err(|e| TriangularLimitsError::InvalidDistribution {
            min,
            max,
            peak,
            reason: e.to_string(),
        })?;

    Ok(distribution.sample(rng))
}

/// Draw a value for a quantity given its percentile bounds and peak, calibrating the
/// triangular distribution first. The result is in the unit of the peak value.
pub fn sample_triangular_quantity<R: Rng + ?Sized>(
    triple: &VariabilityTriple,
    rng: &mut R,
) -> Result<Quantity, VariabilityError> {
    let unit = triple.peak.unit();
    let p05 = triple.min.magnitude_in(unit)?;
    let p95 = triple.max.magnitude_in(unit)?;
    let peak = triple.peak.magnitude();
    let (min, max) = triang_dist_limits(p05, p95, peak, DEFAULT_SIGNIFICANCE)?;

    Ok(Quantity::new(sample_triangular(min, max, peak, rng)?, unit))
}

/// Draw a value from a normal distribution centred on the nominal value with a standard
/// deviation of a tenth of it, floored at zero.
pub fn sample_normal_non_negative<R: Rng + ?Sized>(
    nominal: Quantity,
    rng: &mut R,
) -> Result<Quantity, VariabilityError> {
    let mean = nominal.magnitude();
    let distribution = Normal::new(mean, (mean * NORMAL_STD_DEV_FRACTION).abs()).map_err(|e| {
        VariabilityError::InvalidNormal {
            nominal: mean,
            reason: e.to_string(),
        }
    })?;

    Ok(Quantity::new(distribution.sample(rng).max(0.), nominal.unit()))
}
