//! Propagation-loss models.
//!
//! Three closed-form models plus a naive baseline, each a pure function over
//! a validated scenario:
//!
//! - free-space loss (FSPL), the obstruction-free reference
//! - a two-segment breakpoint model, the primary model for the decision path
//! - the COST-231 Hata empirical urban model, for comparison only
//!
//! The two non-trivial models deliberately differ in failure philosophy,
//! expressed as an explicit [`ModelPolicy`] on their validity window: the
//! breakpoint model degrades (advisory, keep computing) so the decision path
//! stays available, while COST-231 refuses outside its window so the
//! comparison display never shows a number the model cannot stand behind.

use crate::constants::{
    breakpoint_env_correction_db, hata_env_correction_db, SPEED_OF_LIGHT_M_S,
};
use crate::scenario::ScenarioParams;
use cellplan_core::{DiagnosticsSink, DomainError, ValidationError};
use serde::Serialize;
use std::fmt;

// ============================================================================
// Model Identity and Validity Windows
// ============================================================================

/// The propagation models known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropagationModel {
    /// Free-space path loss.
    FreeSpace,
    /// Two-segment breakpoint model (primary).
    Breakpoint,
    /// COST-231 Hata empirical urban model (comparison only).
    Cost231Hata,
    /// Naive urban baseline: FSPL + 15 dB.
    UrbanBaseline,
}

impl PropagationModel {
    /// Human-readable label used in comparison output.
    pub fn label(self) -> &'static str {
        match self {
            PropagationModel::FreeSpace => "FSPL (theoretical)",
            PropagationModel::Breakpoint => "Breakpoint",
            PropagationModel::Cost231Hata => "COST-231 Hata",
            PropagationModel::UrbanBaseline => "Urban baseline (FSPL + 15 dB)",
        }
    }
}

impl fmt::Display for PropagationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a model does when a scenario falls outside its validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPolicy {
    /// Emit an advisory and compute anyway.
    BestEffort,
    /// Refuse with a [`ValidationError`].
    Strict,
}

/// Frequency/distance bounds within which a model's output is trustworthy.
///
/// Static reference data, not derived from any scenario.
#[derive(Debug, Clone, Copy)]
pub struct ModelValidityWindow {
    pub min_frequency_mhz: f64,
    pub max_frequency_mhz: f64,
    pub min_distance_m: f64,
    pub max_distance_m: f64,
    pub policy: ModelPolicy,
}

impl ModelValidityWindow {
    /// Check a scenario against this window, returning the reason when it
    /// falls outside.
    pub fn check(&self, params: &ScenarioParams) -> Option<String> {
        let f = params.frequency_mhz();
        if f < self.min_frequency_mhz || f > self.max_frequency_mhz {
            return Some(format!(
                "frequency {} MHz outside validity window [{}, {}] MHz",
                f, self.min_frequency_mhz, self.max_frequency_mhz
            ));
        }
        let d = params.distance_m();
        if d < self.min_distance_m || d > self.max_distance_m {
            return Some(format!(
                "distance {} m outside validity window [{}, {}] m",
                d, self.min_distance_m, self.max_distance_m
            ));
        }
        None
    }
}

/// Validity window of the breakpoint model.
pub const BREAKPOINT_VALIDITY: ModelValidityWindow = ModelValidityWindow {
    min_frequency_mhz: 800.0,
    max_frequency_mhz: 6000.0,
    min_distance_m: 20.0,
    max_distance_m: 5000.0,
    policy: ModelPolicy::BestEffort,
};

/// Validity window of the COST-231 Hata model.
pub const COST231_VALIDITY: ModelValidityWindow = ModelValidityWindow {
    min_frequency_mhz: 1500.0,
    max_frequency_mhz: 2000.0,
    min_distance_m: 1000.0,
    max_distance_m: 20_000.0,
    policy: ModelPolicy::Strict,
};

/// Look up the validity window for a model, if it has one.
pub fn validity_window(model: PropagationModel) -> Option<&'static ModelValidityWindow> {
    match model {
        PropagationModel::Breakpoint => Some(&BREAKPOINT_VALIDITY),
        PropagationModel::Cost231Hata => Some(&COST231_VALIDITY),
        PropagationModel::FreeSpace | PropagationModel::UrbanBaseline => None,
    }
}

/// Check whether a scenario is inside a model's validity window.
///
/// Models without a window accept everything. Returns the reason when the
/// scenario falls outside.
pub fn is_within_validity_range(
    params: &ScenarioParams,
    model: PropagationModel,
) -> (bool, Option<String>) {
    match validity_window(model).and_then(|w| w.check(params)) {
        Some(reason) => (false, Some(reason)),
        None => (true, None),
    }
}

// ============================================================================
// Free-Space Loss
// ============================================================================

/// Free-space path loss in dB.
///
/// `FSPL = 32.45 + 20 log10(f_MHz) + 20 log10(d_km)`.
///
/// Emits an advisory when the distance drops below one meter, where the
/// far-field formula loses precision.
pub fn free_space_path_loss(
    frequency_mhz: f64,
    distance_m: f64,
    diag: &mut dyn DiagnosticsSink,
) -> Result<f64, DomainError> {
    if distance_m <= 0.0 {
        return Err(DomainError::NonPositiveDistance(distance_m));
    }
    if frequency_mhz <= 0.0 {
        return Err(DomainError::NonPositiveFrequency(frequency_mhz));
    }

    let distance_km = distance_m / 1000.0;
    if distance_km < 0.001 {
        diag.advisory(format!(
            "distance {distance_m} m is very small, FSPL may be imprecise"
        ));
    }

    Ok(32.45 + 20.0 * frequency_mhz.log10() + 20.0 * distance_km.log10())
}

// ============================================================================
// Breakpoint Model (primary)
// ============================================================================

/// Breakpoint distance in meters: `4 h_bs h_ue f_Hz / c`.
pub fn breakpoint_distance_m(params: &ScenarioParams) -> f64 {
    4.0 * params.bs_height_m() * params.ue_height_m() * (params.frequency_mhz() * 1e6)
        / SPEED_OF_LIGHT_M_S
}

/// Outdoor path loss in dB from the two-segment breakpoint model.
///
/// Below the breakpoint the loss is plain FSPL; beyond it the decay steepens
/// to exponent 2 (LOS) or 4 (NLOS), continuous at the boundary. A fixed
/// environment correction is added on top. Validity-window excursions and a
/// degenerate breakpoint produce advisories, never failures: this model backs
/// the small-cell decision and must always return a number.
pub fn breakpoint_path_loss(
    params: &ScenarioParams,
    diag: &mut dyn DiagnosticsSink,
) -> Result<f64, DomainError> {
    if let Some(reason) = BREAKPOINT_VALIDITY.check(params) {
        diag.advisory(format!("breakpoint model: {reason}"));
    }

    let mut d_bp = breakpoint_distance_m(params);
    if d_bp <= 0.0 {
        diag.advisory(format!(
            "degenerate breakpoint distance {d_bp} m, substituting 100 m"
        ));
        d_bp = 100.0;
    }

    let d = params.distance_m();
    let f = params.frequency_mhz();

    let base_loss = if d <= d_bp {
        free_space_path_loss(f, d, diag)?
    } else {
        let loss_at_bp = free_space_path_loss(f, d_bp, diag)?;
        let exponent = if params.is_los() { 2.0 } else { 4.0 };
        loss_at_bp + 10.0 * exponent * (d / d_bp).log10()
    };

    let loss = base_loss + breakpoint_env_correction_db(params.environment());
    log::debug!(
        "breakpoint model: PL={loss:.2} dB (d={d} m, d_bp={d_bp:.1} m, env={})",
        params.environment()
    );
    Ok(loss)
}

// ============================================================================
// COST-231 Hata Model (comparison only)
// ============================================================================

/// Outdoor path loss in dB from the COST-231 Hata empirical urban model.
///
/// Strict policy: refuses with a [`ValidationError`] when the scenario is
/// outside the model's validity window.
pub fn cost231_path_loss(params: &ScenarioParams) -> Result<f64, ValidationError> {
    if let Some(reason) = COST231_VALIDITY.check(params) {
        return Err(ValidationError::new(format!(
            "COST-231 not applicable: {reason}"
        )));
    }

    let f = params.frequency_mhz();
    let d_km = params.distance_m() / 1000.0;
    let h_bs = params.bs_height_m();
    let h_m = params.ue_height_m();

    // Mobile antenna height correction for a medium-sized city.
    let a_hm = (1.1 * f.log10() - 0.7) * h_m - (1.56 * f.log10() - 0.8);

    let loss = 46.3 + 33.9 * f.log10() - 13.82 * h_bs.log10() - a_hm
        + (44.9 - 6.55 * h_bs.log10()) * d_km.log10()
        + hata_env_correction_db(params.environment());

    log::debug!("COST-231: PL={loss:.2} dB");
    Ok(loss)
}

// ============================================================================
// Model Comparison
// ============================================================================

/// One entry of a side-by-side model comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ModelEstimate {
    /// The model that produced the estimate.
    pub model: PropagationModel,
    /// Predicted outdoor path loss in dB.
    pub loss_db: f64,
}

/// Evaluate every model on the same scenario for side-by-side display.
///
/// Order is fixed: free-space, breakpoint, COST-231, urban baseline. Models
/// that refuse (COST-231 outside its window) are omitted rather than failing
/// the comparison.
pub fn compare_models(
    params: &ScenarioParams,
    diag: &mut dyn DiagnosticsSink,
) -> Result<Vec<ModelEstimate>, DomainError> {
    let fspl = free_space_path_loss(params.frequency_mhz(), params.distance_m(), diag)?;

    let mut estimates = vec![ModelEstimate {
        model: PropagationModel::FreeSpace,
        loss_db: fspl,
    }];

    estimates.push(ModelEstimate {
        model: PropagationModel::Breakpoint,
        loss_db: breakpoint_path_loss(params, diag)?,
    });

    match cost231_path_loss(params) {
        Ok(loss_db) => estimates.push(ModelEstimate {
            model: PropagationModel::Cost231Hata,
            loss_db,
        }),
        Err(err) => diag.advisory(err.to_string()),
    }

    estimates.push(ModelEstimate {
        model: PropagationModel::UrbanBaseline,
        loss_db: fspl + 15.0,
    });

    Ok(estimates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Environment, ScenarioInput};
    use cellplan_core::DiagnosticsBuffer;

    fn scenario(input: ScenarioInput) -> ScenarioParams {
        ScenarioParams::new(input).unwrap()
    }

    fn urban_500m() -> ScenarioParams {
        scenario(ScenarioInput::default())
    }

    #[test]
    fn test_fspl_known_value() {
        // 1800 MHz at 1 km: 32.45 + 20 log10(1800) = 97.5554...
        let mut diag = DiagnosticsBuffer::new();
        let loss = free_space_path_loss(1800.0, 1000.0, &mut diag).unwrap();
        assert!((loss - 97.5554501).abs() < 1e-6, "got {loss}");
        assert!(diag.messages().is_empty());
    }

    #[test]
    fn test_fspl_monotone_in_frequency_and_distance() {
        let mut diag = DiagnosticsBuffer::new();
        let mut previous = f64::NEG_INFINITY;
        for f in [700.0, 1200.0, 1800.0, 2600.0, 3500.0, 6000.0] {
            let loss = free_space_path_loss(f, 800.0, &mut diag).unwrap();
            assert!(loss > previous, "FSPL must increase with frequency");
            previous = loss;
        }
        previous = f64::NEG_INFINITY;
        for d in [10.0, 100.0, 500.0, 1000.0, 10_000.0] {
            let loss = free_space_path_loss(1800.0, d, &mut diag).unwrap();
            assert!(loss > previous, "FSPL must increase with distance");
            previous = loss;
        }
    }

    #[test]
    fn test_fspl_rejects_non_positive() {
        let mut diag = DiagnosticsBuffer::new();
        assert!(matches!(
            free_space_path_loss(1800.0, 0.0, &mut diag),
            Err(DomainError::NonPositiveDistance(_))
        ));
        assert!(matches!(
            free_space_path_loss(-1.0, 100.0, &mut diag),
            Err(DomainError::NonPositiveFrequency(_))
        ));
    }

    #[test]
    fn test_fspl_tiny_distance_advisory() {
        let mut diag = DiagnosticsBuffer::new();
        let loss = free_space_path_loss(1800.0, 0.5, &mut diag).unwrap();
        assert!(loss.is_finite());
        assert_eq!(diag.messages().len(), 1);
    }

    #[test]
    fn test_breakpoint_distance_reference() {
        // 4 * 25 * 1.5 * 1.8e9 / 3e8 = 900 m.
        let d_bp = breakpoint_distance_m(&urban_500m());
        assert!((d_bp - 900.0).abs() < 1e-9, "got {d_bp}");
    }

    #[test]
    fn test_breakpoint_equals_fspl_below_breakpoint() {
        let params = urban_500m(); // d = 500 m, d_bp = 900 m
        let mut diag = DiagnosticsBuffer::new();
        let loss = breakpoint_path_loss(&params, &mut diag).unwrap();
        let fspl = free_space_path_loss(1800.0, 500.0, &mut diag).unwrap();
        let correction = breakpoint_env_correction_db(Environment::Urban);
        assert!((loss - (fspl + correction)).abs() < 1e-12);
    }

    #[test]
    fn test_breakpoint_continuity_at_boundary() {
        // Loss just above the breakpoint must approach the loss at it.
        let at_bp = scenario(ScenarioInput {
            distance_m: 900.0,
            ..ScenarioInput::default()
        });
        let just_past = scenario(ScenarioInput {
            distance_m: 900.0001,
            ..ScenarioInput::default()
        });
        let mut diag = DiagnosticsBuffer::new();
        let a = breakpoint_path_loss(&at_bp, &mut diag).unwrap();
        let b = breakpoint_path_loss(&just_past, &mut diag).unwrap();
        assert!((a - b).abs() < 1e-4, "discontinuity at breakpoint: {a} vs {b}");
    }

    #[test]
    fn test_breakpoint_nlos_steeper_than_los() {
        let nlos = scenario(ScenarioInput {
            distance_m: 3000.0,
            ..ScenarioInput::default()
        });
        let los = scenario(ScenarioInput {
            distance_m: 3000.0,
            line_of_sight: true,
            ..ScenarioInput::default()
        });
        let mut diag = DiagnosticsBuffer::new();
        let nlos_loss = breakpoint_path_loss(&nlos, &mut diag).unwrap();
        let los_loss = breakpoint_path_loss(&los, &mut diag).unwrap();
        assert!(nlos_loss > los_loss);
    }

    #[test]
    fn test_breakpoint_validity_advisory_does_not_block() {
        // 10 km is outside the [20, 5000] m window; the model must still
        // produce a loss and record one advisory.
        let params = scenario(ScenarioInput {
            distance_m: 10_000.0,
            ..ScenarioInput::default()
        });
        let mut diag = DiagnosticsBuffer::new();
        let loss = breakpoint_path_loss(&params, &mut diag).unwrap();
        assert!(loss.is_finite());
        assert!(diag.messages().iter().any(|m| m.contains("validity window")));
    }

    #[test]
    fn test_env_corrections_ordering() {
        let mut losses = Vec::new();
        for env in Environment::ALL {
            let params = scenario(ScenarioInput {
                environment: env,
                ..ScenarioInput::default()
            });
            let mut diag = DiagnosticsBuffer::new();
            losses.push(breakpoint_path_loss(&params, &mut diag).unwrap());
        }
        // rural < suburban < urban < dense-urban, 5 dB steps.
        for pair in losses.windows(2) {
            assert!((pair[1] - pair[0] - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cost231_refuses_outside_window() {
        // 500 m is below the 1000 m minimum.
        let err = cost231_path_loss(&urban_500m()).unwrap_err();
        assert!(err.to_string().contains("COST-231 not applicable"));
    }

    #[test]
    fn test_cost231_inside_window() {
        let params = scenario(ScenarioInput {
            distance_m: 2000.0,
            ..ScenarioInput::default()
        });
        let loss = cost231_path_loss(&params).unwrap();
        // Urban macro loss at 2 km around 1800 MHz lands in the 120-160 dB range.
        assert!(loss > 110.0 && loss < 170.0, "got {loss}");
    }

    #[test]
    fn test_compare_models_order_and_omission() {
        // At 500 m COST-231 refuses, so the comparison has three entries in
        // fixed order and the baseline sits 15 dB above FSPL.
        let mut diag = DiagnosticsBuffer::new();
        let estimates = compare_models(&urban_500m(), &mut diag).unwrap();
        let models: Vec<_> = estimates.iter().map(|e| e.model).collect();
        assert_eq!(
            models,
            [
                PropagationModel::FreeSpace,
                PropagationModel::Breakpoint,
                PropagationModel::UrbanBaseline,
            ]
        );
        assert!((estimates[2].loss_db - estimates[0].loss_db - 15.0).abs() < 1e-12);
        assert!(diag.messages().iter().any(|m| m.contains("COST-231")));
    }

    #[test]
    fn test_compare_models_includes_cost231_in_window() {
        let params = scenario(ScenarioInput {
            distance_m: 2000.0,
            ..ScenarioInput::default()
        });
        let mut diag = DiagnosticsBuffer::new();
        let estimates = compare_models(&params, &mut diag).unwrap();
        let models: Vec<_> = estimates.iter().map(|e| e.model).collect();
        assert_eq!(
            models,
            [
                PropagationModel::FreeSpace,
                PropagationModel::Breakpoint,
                PropagationModel::Cost231Hata,
                PropagationModel::UrbanBaseline,
            ]
        );
    }

    #[test]
    fn test_is_within_validity_range() {
        let (ok, reason) = is_within_validity_range(&urban_500m(), PropagationModel::FreeSpace);
        assert!(ok && reason.is_none());
        let (ok, reason) = is_within_validity_range(&urban_500m(), PropagationModel::Cost231Hata);
        assert!(!ok);
        assert!(reason.unwrap().contains("distance"));
    }
}
