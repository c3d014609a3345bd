//! # cellplan-engine
//!
//! Link-budget and probabilistic-coverage engine for 4G/5G macro-cell
//! indoor planning.
//!
//! This crate provides:
//! - Scenario parameters with validation-on-construction ([`ScenarioParams`])
//! - Propagation models ([`propagation`]): free-space, breakpoint, COST-231 Hata
//! - Link-budget evaluation ([`budget`]): EIRP, received power, signal quality
//! - Log-normal shadowing coverage probability ([`coverage`])
//! - The full-budget orchestrator ([`compute_full_budget`])
//! - 3GPP/ITU-derived constant tables ([`constants`])
//!
//! The engine is fully synchronous and deterministic: every public operation
//! is a pure function over its explicit inputs, and no randomness is involved
//! anywhere. Non-fatal anomalies are reported through the injectable
//! [`cellplan_core::DiagnosticsSink`] rather than global logger state.

pub mod budget;
pub mod constants;
pub mod coverage;
mod evaluate;
pub mod propagation;
pub mod scenario;

use thiserror::Error;

pub use budget::{SignalQuality, Technology};
pub use evaluate::{compute_full_budget, AnalysisOptions, LinkBudgetResult};
pub use scenario::{Environment, ScenarioInput, ScenarioParams};

/// Errors that can occur while evaluating a link budget.
#[derive(Debug, Clone, Error)]
pub enum BudgetError {
    /// Input rejected by range validation, or a strict model invoked outside
    /// its validity window.
    #[error(transparent)]
    Validation(#[from] cellplan_core::ValidationError),

    /// A numeric helper was given mathematically invalid input. Should not
    /// occur once a scenario has passed validation.
    #[error(transparent)]
    Domain(#[from] cellplan_core::DomainError),
}
