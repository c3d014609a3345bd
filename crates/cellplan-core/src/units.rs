//! Power and ratio unit conversions.
//!
//! All pairs are exact inverses within floating-point tolerance. The
//! logarithmic directions reject non-positive input with a [`DomainError`]
//! instead of producing NaN/-inf.

use crate::DomainError;

/// Convert a power level in dBm to watts.
pub fn dbm_to_watt(dbm: f64) -> f64 {
    10.0_f64.powf((dbm - 30.0) / 10.0)
}

/// Convert a power level in watts to dBm.
pub fn watt_to_dbm(watt: f64) -> Result<f64, DomainError> {
    if watt <= 0.0 {
        return Err(DomainError::NonPositivePower(watt));
    }
    Ok(10.0 * watt.log10() + 30.0)
}

/// Convert a dB value to a linear ratio.
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Convert a linear ratio to dB.
pub fn linear_to_db(linear: f64) -> Result<f64, DomainError> {
    if linear <= 0.0 {
        return Err(DomainError::NonPositiveRatio(linear));
    }
    Ok(10.0 * linear.log10())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dbm_watt_round_trip() {
        for dbm in [-120.0, -30.0, 0.0, 23.0, 43.0, 60.0] {
            let back = watt_to_dbm(dbm_to_watt(dbm)).unwrap();
            assert!((back - dbm).abs() < 1e-9, "round trip failed for {dbm} dBm");
        }
    }

    #[test]
    fn test_db_linear_round_trip() {
        for db in [-40.0, -3.0, 0.0, 3.0, 10.0, 30.0] {
            let back = linear_to_db(db_to_linear(db)).unwrap();
            assert!((back - db).abs() < 1e-9, "round trip failed for {db} dB");
        }
    }

    #[test]
    fn test_known_values() {
        // 30 dBm = 1 W, 0 dB = ratio 1.
        assert!((dbm_to_watt(30.0) - 1.0).abs() < 1e-12);
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_linear(10.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        assert!(matches!(
            watt_to_dbm(0.0),
            Err(DomainError::NonPositivePower(_))
        ));
        assert!(matches!(
            watt_to_dbm(-1.0),
            Err(DomainError::NonPositivePower(_))
        ));
        assert!(matches!(
            linear_to_db(0.0),
            Err(DomainError::NonPositiveRatio(_))
        ));
    }
}
