//! Standard parameter tables for 4G/5G planning.
//!
//! Values derive from 3GPP RSRP quality ranges, ITU-R P.2109 building entry
//! loss, and the usual log-normal shadowing spreads per clutter class. They
//! are reference data, not derived from any scenario.

use crate::budget::{SignalQuality, Technology};
use crate::scenario::Environment;
use serde::Serialize;

/// Propagation speed used by the breakpoint-distance formula, in m/s.
///
/// Kept at 3.0e8 (not the exact SI value) so computed breakpoints match the
/// reference planning tables.
pub const SPEED_OF_LIGHT_M_S: f64 = 3.0e8;

// ============================================================================
// RSRP Quality Tiers
// ============================================================================

/// RSRP tier thresholds in dBm, highest quality first.
///
/// A received power is classified as the first tier whose threshold it meets;
/// anything below every named threshold is Critical.
pub fn rsrp_tiers(technology: Technology) -> [(f64, SignalQuality); 5] {
    match technology {
        Technology::Lte => [
            (-75.0, SignalQuality::Excellent),
            (-85.0, SignalQuality::Good),
            (-95.0, SignalQuality::Medium),
            (-105.0, SignalQuality::Weak),
            (-200.0, SignalQuality::Critical),
        ],
        Technology::Nr => [
            (-70.0, SignalQuality::Excellent),
            (-80.0, SignalQuality::Good),
            (-90.0, SignalQuality::Medium),
            (-95.0, SignalQuality::Weak),
            (-200.0, SignalQuality::Critical),
        ],
    }
}

// ============================================================================
// Environment Tables
// ============================================================================

/// Log-normal shadowing standard deviation per environment, in dB.
pub fn shadowing_sigma_db(environment: Environment) -> f64 {
    match environment {
        Environment::Rural => 4.0,
        Environment::Suburban => 6.0,
        Environment::Urban => 8.0,
        Environment::DenseUrban => 10.0,
    }
}

/// Fixed environment correction for the breakpoint model, in dB.
pub fn breakpoint_env_correction_db(environment: Environment) -> f64 {
    match environment {
        Environment::Rural => 0.0,
        Environment::Suburban => 5.0,
        Environment::Urban => 10.0,
        Environment::DenseUrban => 15.0,
    }
}

/// Environment correction for the COST-231 Hata model, in dB.
pub fn hata_env_correction_db(environment: Environment) -> f64 {
    match environment {
        Environment::Rural => -15.0,
        Environment::Suburban => -2.0,
        Environment::Urban => 0.0,
        Environment::DenseUrban => 3.0,
    }
}

// ============================================================================
// Technology Presets
// ============================================================================

/// Default macro-cell radio parameters for a technology.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TechnologyPreset {
    /// Carrier frequency in MHz.
    pub frequency_mhz: f64,
    /// Transmit power in dBm.
    pub tx_power_dbm: f64,
    /// Transmit antenna gain in dBi.
    pub tx_gain_dbi: f64,
    /// Receive antenna gain in dBi.
    pub rx_gain_dbi: f64,
    /// Receiver sensitivity in dBm.
    pub rx_sensitivity_dbm: f64,
}

/// Standard macro-cell parameters per technology.
pub fn technology_preset(technology: Technology) -> TechnologyPreset {
    match technology {
        Technology::Lte => TechnologyPreset {
            frequency_mhz: 1800.0,
            tx_power_dbm: 43.0,
            tx_gain_dbi: 18.0,
            rx_gain_dbi: 0.0,
            rx_sensitivity_dbm: -110.0,
        },
        Technology::Nr => TechnologyPreset {
            frequency_mhz: 3500.0,
            tx_power_dbm: 40.0,
            tx_gain_dbi: 20.0,
            rx_gain_dbi: 0.0,
            rx_sensitivity_dbm: -100.0,
        },
    }
}

// ============================================================================
// Building Penetration Loss (ITU-R P.2109 derived)
// ============================================================================

/// Facade material classes for building entry loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacadeMaterial {
    StandardWindow,
    DoubleGlazing,
    LightWall,
    StandardWall,
    ThickWall,
    ReinforcedConcrete,
}

impl FacadeMaterial {
    /// All materials, lightest first.
    pub const ALL: [FacadeMaterial; 6] = [
        FacadeMaterial::StandardWindow,
        FacadeMaterial::DoubleGlazing,
        FacadeMaterial::LightWall,
        FacadeMaterial::StandardWall,
        FacadeMaterial::ThickWall,
        FacadeMaterial::ReinforcedConcrete,
    ];

    /// Stable identifier used in CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            FacadeMaterial::StandardWindow => "standard-window",
            FacadeMaterial::DoubleGlazing => "double-glazing",
            FacadeMaterial::LightWall => "light-wall",
            FacadeMaterial::StandardWall => "standard-wall",
            FacadeMaterial::ThickWall => "thick-wall",
            FacadeMaterial::ReinforcedConcrete => "reinforced-concrete",
        }
    }
}

/// Building entry loss in dB for a facade material at a given technology.
///
/// 5G values run 5 dB above 4G for the same material (higher carrier
/// frequency penetrates less).
pub fn penetration_loss_db(material: FacadeMaterial, technology: Technology) -> f64 {
    let base = match material {
        FacadeMaterial::StandardWindow => 10.0,
        FacadeMaterial::DoubleGlazing => 15.0,
        FacadeMaterial::LightWall => 20.0,
        FacadeMaterial::StandardWall => 25.0,
        FacadeMaterial::ThickWall => 30.0,
        FacadeMaterial::ReinforcedConcrete => 35.0,
    };
    match technology {
        Technology::Lte => base,
        Technology::Nr => base + 5.0,
    }
}

// ============================================================================
// QoS Thresholds
// ============================================================================

/// Service classes with their minimum RSRP requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QosService {
    Voice,
    DataBasic,
    VideoSd,
    VideoHd,
    Gaming,
}

impl QosService {
    /// All services, least demanding first.
    pub const ALL: [QosService; 5] = [
        QosService::Voice,
        QosService::DataBasic,
        QosService::VideoSd,
        QosService::VideoHd,
        QosService::Gaming,
    ];

    /// Stable identifier used in CLI arguments and output.
    pub fn as_str(self) -> &'static str {
        match self {
            QosService::Voice => "voice",
            QosService::DataBasic => "data-basic",
            QosService::VideoSd => "video-sd",
            QosService::VideoHd => "video-hd",
            QosService::Gaming => "gaming",
        }
    }

    /// Parse a service identifier.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|svc| svc.as_str() == s)
    }
}

/// Minimum RSRP in dBm required for a service class.
pub fn qos_threshold_dbm(service: QosService) -> f64 {
    match service {
        QosService::Voice => -105.0,
        QosService::DataBasic => -100.0,
        QosService::VideoSd => -95.0,
        QosService::VideoHd => -85.0,
        QosService::Gaming => -75.0,
    }
}

// ============================================================================
// Small Cell Reference Parameters
// ============================================================================

/// Reference parameters of the supplementary small cell a deficit would be
/// remedied with. Informational only; the decision itself is threshold-based.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SmallCellParams {
    /// Transmit power in dBm.
    pub tx_power_dbm: f64,
    /// Antenna gain in dBi.
    pub antenna_gain_dbi: f64,
    /// Typical coverage range in meters.
    pub typical_range_m: f64,
}

/// Reference small-cell deployment parameters.
pub const SMALL_CELL: SmallCellParams = SmallCellParams {
    tx_power_dbm: 24.0,
    antenna_gain_dbi: 5.0,
    typical_range_m: 50.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_descending() {
        for tech in [Technology::Lte, Technology::Nr] {
            let tiers = rsrp_tiers(tech);
            for pair in tiers.windows(2) {
                assert!(pair[0].0 > pair[1].0, "tiers must descend for {tech:?}");
            }
        }
    }

    #[test]
    fn test_nr_penetration_exceeds_lte() {
        for material in FacadeMaterial::ALL {
            assert!(
                penetration_loss_db(material, Technology::Nr)
                    > penetration_loss_db(material, Technology::Lte)
            );
        }
    }

    #[test]
    fn test_qos_parse_round_trip() {
        for service in QosService::ALL {
            assert_eq!(QosService::parse(service.as_str()), Some(service));
        }
        assert_eq!(QosService::parse("telepathy"), None);
    }
}
