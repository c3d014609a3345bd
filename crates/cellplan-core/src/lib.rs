//! # cellplan-core
//!
//! Common types for the cellplan coverage advisor.
//!
//! This crate provides:
//! - Error kinds ([`ValidationError`], [`DomainError`])
//! - Diagnostics reporting ([`DiagnosticsSink`], [`DiagnosticsBuffer`])
//! - Power/ratio unit conversions ([`units`])
//! - Geographic coordinates and distances ([`GeoCoord`])

pub mod diag;
pub mod units;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use diag::{DiagnosticsBuffer, DiagnosticsSink, LogSink};

// ============================================================================
// Error Types
// ============================================================================

/// A scenario or model input rejected by range validation.
///
/// Collects every violated field so the caller sees the full picture in one
/// failure instead of fixing fields one at a time. Always recoverable:
/// correct the input and retry.
#[derive(Debug, Clone, Error)]
#[error("validation failed: {}", violations.join("; "))]
pub struct ValidationError {
    /// One human-readable message per violated field.
    pub violations: Vec<String>,
}

impl ValidationError {
    /// Create a validation error with a single violation.
    pub fn new(message: impl Into<String>) -> Self {
        ValidationError {
            violations: vec![message.into()],
        }
    }

    /// Create a validation error from a collected list of violations.
    pub fn from_violations(violations: Vec<String>) -> Self {
        ValidationError { violations }
    }
}

/// Mathematically invalid input to a low-level numeric helper.
///
/// These indicate a programming error in the caller rather than a user-input
/// problem: once a scenario has passed validation, none of these can occur.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    /// Distance must be strictly positive.
    #[error("distance must be positive (got {0} m)")]
    NonPositiveDistance(f64),

    /// Frequency must be strictly positive.
    #[error("frequency must be positive (got {0} MHz)")]
    NonPositiveFrequency(f64),

    /// Power in watts must be strictly positive for a dBm conversion.
    #[error("power must be positive (got {0} W)")]
    NonPositivePower(f64),

    /// Linear ratio must be strictly positive for a dB conversion.
    #[error("linear ratio must be positive (got {0})")]
    NonPositiveRatio(f64),

    /// Latitude outside [-90, 90] degrees.
    #[error("latitude out of range [-90, 90] (got {0})")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] degrees.
    #[error("longitude out of range [-180, 180] (got {0})")]
    InvalidLongitude(f64),
}

// ============================================================================
// Geographic Types
// ============================================================================

/// Mean Earth radius in meters, used by the Haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude in meters (optional).
    pub altitude_m: Option<f64>,
}

impl GeoCoord {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoCoord {
            latitude,
            longitude,
            altitude_m: None,
        }
    }

    /// Create a new coordinate with altitude.
    pub fn with_altitude(latitude: f64, longitude: f64, altitude_m: f64) -> Self {
        GeoCoord {
            latitude,
            longitude,
            altitude_m: Some(altitude_m),
        }
    }

    fn check_in_range(&self) -> Result<(), DomainError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DomainError::InvalidLatitude(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DomainError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }

    /// Great-circle distance to another coordinate in meters.
    ///
    /// Uses the Haversine formula with [`EARTH_RADIUS_M`]. Altitudes are
    /// ignored; see [`GeoCoord::slant_distance_to`] for the 3-D variant.
    pub fn distance_to(&self, other: &GeoCoord) -> Result<f64, DomainError> {
        self.check_in_range()?;
        other.check_in_range()?;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        Ok(EARTH_RADIUS_M * c)
    }

    /// 3-D distance to another coordinate in meters.
    ///
    /// Combines the Haversine ground distance with the altitude difference.
    /// Missing altitudes are treated as 0 m.
    pub fn slant_distance_to(&self, other: &GeoCoord) -> Result<f64, DomainError> {
        let horizontal = self.distance_to(other)?;
        let vertical = other.altitude_m.unwrap_or(0.0) - self.altitude_m.unwrap_or(0.0);
        Ok(horizontal.hypot(vertical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_dakar_fixture() {
        // Two points ~115 m apart in Dakar.
        let a = GeoCoord::new(14.6928, -17.4467);
        let b = GeoCoord::new(14.6935, -17.4475);
        let distance = a.distance_to(&b).unwrap();
        assert!(
            distance > 80.0 && distance < 150.0,
            "expected ~100 m range, got {distance}"
        );
    }

    #[test]
    fn test_haversine_zero_distance() {
        let a = GeoCoord::new(48.8566, 2.3522);
        assert!(a.distance_to(&a).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_haversine_rejects_bad_latitude() {
        let a = GeoCoord::new(95.0, 0.0);
        let b = GeoCoord::new(0.0, 0.0);
        assert!(matches!(
            a.distance_to(&b),
            Err(DomainError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_haversine_rejects_bad_longitude() {
        let a = GeoCoord::new(0.0, 0.0);
        let b = GeoCoord::new(0.0, 181.0);
        assert!(matches!(
            a.distance_to(&b),
            Err(DomainError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_slant_distance_pythagoras() {
        let a = GeoCoord::with_altitude(14.6928, -17.4467, 0.0);
        let b = GeoCoord::with_altitude(14.6928, -17.4467, 30.0);
        // Same ground point, 30 m apart vertically.
        let d = a.slant_distance_to(&b).unwrap();
        assert!((d - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_validation_error_message_lists_all() {
        let err = ValidationError::from_violations(vec![
            "frequency out of range".to_string(),
            "rx gain out of range".to_string(),
        ]);
        let message = err.to_string();
        assert!(message.contains("frequency out of range"));
        assert!(message.contains("rx gain out of range"));
    }
}
