//! Full link-budget evaluation.
//!
//! Ties the propagation, budget and coverage modules together into one
//! report: outdoor loss is computed once by the breakpoint model and every
//! downstream figure derives from it.

use crate::budget::{
    classify_signal, eirp_dbm, small_cell_decision, SignalQuality, Technology,
};
use crate::constants::shadowing_sigma_db;
use crate::coverage::{coverage_probability_pct, required_margin_db, SIGMA_FLOOR_DB};
use crate::propagation::{breakpoint_distance_m, breakpoint_path_loss, free_space_path_loss};
use crate::scenario::ScenarioParams;
use crate::BudgetError;
use cellplan_core::{DiagnosticsBuffer, LogSink};
use serde::Serialize;
use std::collections::BTreeMap;

/// Knobs of a full-budget evaluation that are not scenario physics.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AnalysisOptions {
    /// Run the probabilistic coverage stage.
    pub probabilistic: bool,
    /// Override the environment's shadowing spread, in dB.
    pub sigma_override_db: Option<f64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            probabilistic: true,
            sigma_override_db: None,
        }
    }
}

/// Complete result of a link-budget evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct LinkBudgetResult {
    /// Radio technology inferred from the carrier frequency.
    pub technology: Technology,
    /// Effective isotropic radiated power in dBm.
    pub eirp_dbm: f64,
    /// Outdoor path loss from the breakpoint model, in dB.
    pub outdoor_loss_db: f64,
    /// Building penetration loss applied, in dB.
    pub penetration_loss_db: f64,
    /// Total path loss, outdoor plus penetration, in dB.
    pub total_loss_db: f64,
    /// Indoor received power in dBm.
    pub rsrp_dbm: f64,
    /// RSRP quality tier.
    pub quality: SignalQuality,
    /// Threshold the small-cell decision was made against, in dBm.
    pub threshold_dbm: f64,
    /// Margin of the median RSRP over the threshold, in dB.
    pub margin_db: f64,
    /// Whether an indoor small cell is required.
    pub small_cell_required: bool,
    /// Probability, in percent, of actually clearing the threshold under
    /// shadowing. Zero when the probabilistic stage was skipped.
    pub coverage_probability_pct: f64,
    /// Shadowing spread used, in dB.
    pub sigma_db: f64,
    /// Margin required for 95% coverage, in dB. Zero when the probabilistic
    /// stage was skipped.
    pub margin_for_95_pct_db: f64,
    /// Secondary figures keyed by stable names, for display and export.
    pub details: BTreeMap<String, f64>,
    /// Human-readable warnings, advisories first.
    pub warnings: Vec<String>,
}

/// Evaluate the full link budget for a validated scenario.
///
/// `threshold_dbm` is the minimum RSRP the deployment must deliver indoors.
/// Model advisories land at the front of `warnings`, followed by coverage
/// warnings when the probability falls below 50% or the quality tier drops
/// to weak or worse.
pub fn compute_full_budget(
    params: &ScenarioParams,
    threshold_dbm: f64,
    options: &AnalysisOptions,
) -> Result<LinkBudgetResult, BudgetError> {
    let mut diag = DiagnosticsBuffer::new();

    let technology = Technology::from_frequency_mhz(params.frequency_mhz());
    let eirp = eirp_dbm(params);
    let outdoor_loss_db = breakpoint_path_loss(params, &mut diag)?;
    let total_loss_db = outdoor_loss_db + params.penetration_loss_db();
    let rsrp_dbm =
        eirp + params.rx_gain_dbi() - outdoor_loss_db - params.penetration_loss_db();
    let quality = classify_signal(rsrp_dbm, technology);
    let (small_cell_required, margin_db) = small_cell_decision(rsrp_dbm, threshold_dbm);

    let (coverage_pct, sigma_db, margin95_db) = if options.probabilistic {
        // Report the same floored sigma the coverage stage computes with, so
        // the result stays self-consistent for a zero override.
        let sigma = options
            .sigma_override_db
            .unwrap_or_else(|| shadowing_sigma_db(params.environment()))
            .max(SIGMA_FLOOR_DB);
        (
            coverage_probability_pct(margin_db, sigma),
            sigma,
            required_margin_db(95.0, sigma),
        )
    } else {
        (0.0, 8.0, 0.0)
    };

    let mut warnings = diag.into_messages();
    if options.probabilistic && coverage_pct < 50.0 {
        warnings.push(format!(
            "coverage probability {coverage_pct:.1}% is below 50%, the link is unreliable"
        ));
    }
    if quality >= SignalQuality::Weak {
        warnings.push(format!(
            "signal quality is {quality}, indoor service will be degraded"
        ));
    }

    // Secondary figures; the FSPL advisory path was already walked above, so
    // these feed straight into the log instead of the warning list.
    let mut log_sink = LogSink;
    let mut details = BTreeMap::new();
    details.insert("eirp_dbm".to_owned(), eirp);
    details.insert(
        "fspl_db".to_owned(),
        free_space_path_loss(params.frequency_mhz(), params.distance_m(), &mut log_sink)?,
    );
    details.insert(
        "breakpoint_distance_m".to_owned(),
        breakpoint_distance_m(params),
    );

    log::info!(
        "budget: {technology} RSRP={rsrp_dbm:.1} dBm ({quality}), coverage {coverage_pct:.1}%, \
         small cell required: {small_cell_required}"
    );

    Ok(LinkBudgetResult {
        technology,
        eirp_dbm: eirp,
        outdoor_loss_db,
        penetration_loss_db: params.penetration_loss_db(),
        total_loss_db,
        rsrp_dbm,
        quality,
        threshold_dbm,
        margin_db,
        small_cell_required,
        coverage_probability_pct: coverage_pct,
        sigma_db,
        margin_for_95_pct_db: margin95_db,
        details,
        warnings,
    })
}
