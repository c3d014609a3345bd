//! Scenario parameters with validation-on-construction.
//!
//! [`ScenarioInput`] is the plain serde-friendly carrier used by config files
//! and CLIs; [`ScenarioParams`] is the validated, immutable form the engine
//! computes over. The only way to obtain a `ScenarioParams` is
//! [`ScenarioParams::new`], which checks every field against its physical
//! range and reports **all** violations at once — no invalid instance can
//! ever exist.

use cellplan_core::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Environment
// ============================================================================

/// Clutter class of the deployment area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    Rural,
    Suburban,
    Urban,
    DenseUrban,
}

impl Environment {
    /// All recognized environments, least dense first.
    pub const ALL: [Environment; 4] = [
        Environment::Rural,
        Environment::Suburban,
        Environment::Urban,
        Environment::DenseUrban,
    ];

    /// Stable identifier used in config files and CLI arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Rural => "rural",
            Environment::Suburban => "suburban",
            Environment::Urban => "urban",
            Environment::DenseUrban => "dense-urban",
        }
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Environment::Rural => "open rural area",
            Environment::Suburban => "suburb, low buildings",
            Environment::Urban => "standard urban area",
            Environment::DenseUrban => "dense city center, high-rises",
        }
    }

    /// Typical probability that a link in this environment is line-of-sight.
    pub fn los_probability(self) -> f64 {
        match self {
            Environment::Rural => 0.9,
            Environment::Suburban => 0.7,
            Environment::Urban => 0.5,
            Environment::DenseUrban => 0.3,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Scenario Input (unvalidated)
// ============================================================================

/// Unvalidated scenario fields as read from a config file or CLI.
///
/// Defaults mirror the standard LTE macro-cell case: 1800 MHz, 43 dBm,
/// 18 dBi sector antenna, 25 m mast, 1.5 m handset, urban NLOS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioInput {
    /// Carrier frequency in MHz.
    pub frequency_mhz: f64,
    /// Transmit power in dBm.
    pub tx_power_dbm: f64,
    /// Transmit antenna gain in dBi.
    pub tx_gain_dbi: f64,
    /// Receive antenna gain in dBi.
    pub rx_gain_dbi: f64,
    /// Link distance in meters.
    pub distance_m: f64,
    /// Building penetration loss in dB.
    pub penetration_loss_db: f64,
    /// Base-station antenna height in meters.
    pub bs_height_m: f64,
    /// User-equipment height in meters.
    pub ue_height_m: f64,
    /// Clutter class of the area.
    pub environment: Environment,
    /// Whether the outdoor link is line-of-sight.
    pub line_of_sight: bool,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        ScenarioInput {
            frequency_mhz: 1800.0,
            tx_power_dbm: 43.0,
            tx_gain_dbi: 18.0,
            rx_gain_dbi: 0.0,
            distance_m: 500.0,
            penetration_loss_db: 20.0,
            bs_height_m: 25.0,
            ue_height_m: 1.5,
            environment: Environment::Urban,
            line_of_sight: false,
        }
    }
}

// ============================================================================
// Validated Scenario
// ============================================================================

/// Accepted range for each numeric scenario field.
struct FieldRange {
    name: &'static str,
    unit: &'static str,
    min: f64,
    max: f64,
}

const FIELD_RANGES: [FieldRange; 8] = [
    FieldRange { name: "frequency", unit: "MHz", min: 700.0, max: 6000.0 },
    FieldRange { name: "tx power", unit: "dBm", min: 0.0, max: 60.0 },
    FieldRange { name: "tx gain", unit: "dBi", min: -10.0, max: 30.0 },
    FieldRange { name: "rx gain", unit: "dBi", min: -10.0, max: 10.0 },
    FieldRange { name: "distance", unit: "m", min: 1.0, max: 50_000.0 },
    FieldRange { name: "penetration loss", unit: "dB", min: 0.0, max: 50.0 },
    FieldRange { name: "BS height", unit: "m", min: 10.0, max: 100.0 },
    FieldRange { name: "UE height", unit: "m", min: 0.5, max: 10.0 },
];

/// A validated, immutable scenario.
///
/// Constructed once per evaluation request via [`ScenarioParams::new`];
/// every numeric field is guaranteed to lie inside its declared range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScenarioParams {
    input: ScenarioInput,
}

impl ScenarioParams {
    /// Validate `input` and return the immutable scenario, or a single
    /// [`ValidationError`] listing every out-of-range field.
    pub fn new(input: ScenarioInput) -> Result<Self, ValidationError> {
        let values = [
            input.frequency_mhz,
            input.tx_power_dbm,
            input.tx_gain_dbi,
            input.rx_gain_dbi,
            input.distance_m,
            input.penetration_loss_db,
            input.bs_height_m,
            input.ue_height_m,
        ];

        let mut violations = Vec::new();
        for (range, value) in FIELD_RANGES.iter().zip(values) {
            if !value.is_finite() || value < range.min || value > range.max {
                violations.push(format!(
                    "{} {} {} out of range [{}, {}] {}",
                    range.name, value, range.unit, range.min, range.max, range.unit
                ));
            }
        }

        if violations.is_empty() {
            Ok(ScenarioParams { input })
        } else {
            Err(ValidationError::from_violations(violations))
        }
    }

    /// Carrier frequency in MHz.
    pub fn frequency_mhz(&self) -> f64 {
        self.input.frequency_mhz
    }

    /// Transmit power in dBm.
    pub fn tx_power_dbm(&self) -> f64 {
        self.input.tx_power_dbm
    }

    /// Transmit antenna gain in dBi.
    pub fn tx_gain_dbi(&self) -> f64 {
        self.input.tx_gain_dbi
    }

    /// Receive antenna gain in dBi.
    pub fn rx_gain_dbi(&self) -> f64 {
        self.input.rx_gain_dbi
    }

    /// Link distance in meters.
    pub fn distance_m(&self) -> f64 {
        self.input.distance_m
    }

    /// Building penetration loss in dB.
    pub fn penetration_loss_db(&self) -> f64 {
        self.input.penetration_loss_db
    }

    /// Base-station antenna height in meters.
    pub fn bs_height_m(&self) -> f64 {
        self.input.bs_height_m
    }

    /// User-equipment height in meters.
    pub fn ue_height_m(&self) -> f64 {
        self.input.ue_height_m
    }

    /// Clutter class of the area.
    pub fn environment(&self) -> Environment {
        self.input.environment
    }

    /// Whether the outdoor link is line-of-sight.
    pub fn is_los(&self) -> bool {
        self.input.line_of_sight
    }

    /// Borrow the raw field values.
    pub fn as_input(&self) -> &ScenarioInput {
        &self.input
    }
}
