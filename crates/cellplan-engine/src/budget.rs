//! Link-budget arithmetic: EIRP, received power, signal classification.

use crate::constants::rsrp_tiers;
use crate::propagation::breakpoint_path_loss;
use crate::scenario::ScenarioParams;
use cellplan_core::{DiagnosticsSink, DomainError};
use serde::Serialize;
use std::fmt;

// ============================================================================
// Technology
// ============================================================================

/// Radio access technology of the evaluated carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Technology {
    /// 4G LTE.
    Lte,
    /// 5G NR.
    Nr,
}

impl Technology {
    /// Infer the technology from the carrier frequency: everything above
    /// 3000 MHz is treated as a 5G NR carrier.
    pub fn from_frequency_mhz(frequency_mhz: f64) -> Self {
        if frequency_mhz > 3000.0 {
            Technology::Nr
        } else {
            Technology::Lte
        }
    }

    /// Marketing name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Technology::Lte => "4G",
            Technology::Nr => "5G",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Signal Quality
// ============================================================================

/// RSRP quality tier, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalQuality {
    Excellent,
    Good,
    Medium,
    Weak,
    Critical,
}

impl SignalQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalQuality::Excellent => "excellent",
            SignalQuality::Good => "good",
            SignalQuality::Medium => "medium",
            SignalQuality::Weak => "weak",
            SignalQuality::Critical => "critical",
        }
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Budget Arithmetic
// ============================================================================

/// Effective isotropic radiated power in dBm.
pub fn eirp_dbm(params: &ScenarioParams) -> f64 {
    params.tx_power_dbm() + params.tx_gain_dbi()
}

/// Indoor received power (RSRP) in dBm.
///
/// `RSRP = P_tx + G_tx + G_rx - L_outdoor - L_penetration`, with the outdoor
/// loss taken from the breakpoint model.
///
/// Standalone entry point for callers that only need the RSRP figure. The
/// full-budget orchestrator computes the same value inline so it can reuse
/// the outdoor loss for the rest of the report; both paths must agree.
pub fn received_power_dbm(
    params: &ScenarioParams,
    diag: &mut dyn DiagnosticsSink,
) -> Result<f64, DomainError> {
    let outdoor_loss = breakpoint_path_loss(params, diag)?;
    Ok(eirp_dbm(params) + params.rx_gain_dbi() - outdoor_loss - params.penetration_loss_db())
}

/// Classify a received power into its RSRP quality tier.
///
/// The tier table depends on the technology: 5G tiers sit 5-10 dB higher
/// than 4G because NR needs more signal for comparable service.
pub fn classify_signal(rsrp_dbm: f64, technology: Technology) -> SignalQuality {
    for (threshold, quality) in rsrp_tiers(technology) {
        if rsrp_dbm >= threshold {
            return quality;
        }
    }
    SignalQuality::Critical
}

/// Decide whether an indoor small cell is required and report the margin.
///
/// Returns `(required, margin_db)` where a negative margin means the signal
/// falls short of the threshold. The comparison is strict: exactly meeting
/// the threshold does not require a small cell.
pub fn small_cell_decision(rsrp_dbm: f64, threshold_dbm: f64) -> (bool, f64) {
    let margin_db = rsrp_dbm - threshold_dbm;
    (rsrp_dbm < threshold_dbm, margin_db)
}
