//! Result rendering in the supported output formats.

use crate::RunnerError;
use cellplan_engine::propagation::ModelEstimate;
use cellplan_engine::LinkBudgetResult;
use clap::ValueEnum;
use std::fmt::Write;

/// Output format for evaluation results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    Text,
    /// JSON for programmatic consumption.
    Json,
    /// CSV with one row per scenario.
    Csv,
    /// Markdown table for reports.
    Markdown,
}

/// Render evaluation results for a list of named scenarios.
pub fn render_results(
    results: &[(String, LinkBudgetResult)],
    format: OutputFormat,
) -> Result<String, RunnerError> {
    match format {
        OutputFormat::Text => Ok(render_text(results)),
        OutputFormat::Json => render_json(results),
        OutputFormat::Csv => Ok(render_csv(results)),
        OutputFormat::Markdown => Ok(render_markdown(results)),
    }
}

fn render_text(results: &[(String, LinkBudgetResult)]) -> String {
    let mut out = String::new();
    for (name, r) in results {
        let _ = writeln!(out, "=== {name} ({}) ===", r.technology);
        let _ = writeln!(out, "EIRP:                 {:>8.1} dBm", r.eirp_dbm);
        let _ = writeln!(out, "Outdoor path loss:    {:>8.1} dB", r.outdoor_loss_db);
        let _ = writeln!(out, "Penetration loss:     {:>8.1} dB", r.penetration_loss_db);
        let _ = writeln!(out, "Total path loss:      {:>8.1} dB", r.total_loss_db);
        let _ = writeln!(out, "Indoor RSRP:          {:>8.1} dBm  ({})", r.rsrp_dbm, r.quality);
        let _ = writeln!(
            out,
            "Margin vs {:.0} dBm:   {:>8.1} dB",
            r.threshold_dbm, r.margin_db
        );
        let _ = writeln!(
            out,
            "Coverage probability: {:>8.1} %   (sigma {:.1} dB, 95% needs {:+.1} dB)",
            r.coverage_probability_pct, r.sigma_db, r.margin_for_95_pct_db
        );
        let _ = writeln!(
            out,
            "Small cell required:  {}",
            if r.small_cell_required { "YES" } else { "no" }
        );
        for warning in &r.warnings {
            let _ = writeln!(out, "  warning: {warning}");
        }
        out.push('\n');
    }
    out
}

fn render_json(results: &[(String, LinkBudgetResult)]) -> Result<String, RunnerError> {
    let entries: Vec<serde_json::Value> = results
        .iter()
        .map(|(name, r)| {
            let mut value = serde_json::to_value(r)?;
            if let Some(obj) = value.as_object_mut() {
                obj.insert("scenario".to_owned(), serde_json::json!(name));
            }
            Ok(value)
        })
        .collect::<Result<_, serde_json::Error>>()?;
    Ok(serde_json::to_string_pretty(&entries)?)
}

fn render_csv(results: &[(String, LinkBudgetResult)]) -> String {
    let mut out = String::from(
        "scenario,technology,eirp_dbm,outdoor_loss_db,penetration_loss_db,rsrp_dbm,quality,\
         margin_db,coverage_probability_pct,small_cell_required\n",
    );
    for (name, r) in results {
        let _ = writeln!(
            out,
            "{name},{},{:.2},{:.2},{:.2},{:.2},{},{:.2},{:.2},{}",
            r.technology.as_str(),
            r.eirp_dbm,
            r.outdoor_loss_db,
            r.penetration_loss_db,
            r.rsrp_dbm,
            r.quality,
            r.margin_db,
            r.coverage_probability_pct,
            r.small_cell_required
        );
    }
    out
}

fn render_markdown(results: &[(String, LinkBudgetResult)]) -> String {
    let mut out = String::from(
        "| Scenario | Tech | RSRP (dBm) | Quality | Margin (dB) | Coverage | Small cell |\n\
         |---|---|---:|---|---:|---:|---|\n",
    );
    for (name, r) in results {
        let _ = writeln!(
            out,
            "| {name} | {} | {:.1} | {} | {:+.1} | {:.1}% | {} |",
            r.technology,
            r.rsrp_dbm,
            r.quality,
            r.margin_db,
            r.coverage_probability_pct,
            if r.small_cell_required { "yes" } else { "no" }
        );
    }
    out
}

/// Render a side-by-side model comparison.
pub fn render_comparison(
    estimates: &[ModelEstimate],
    format: OutputFormat,
) -> Result<String, RunnerError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(estimates)?),
        OutputFormat::Csv => {
            let mut out = String::from("model,loss_db\n");
            for e in estimates {
                let _ = writeln!(out, "{},{:.2}", e.model.label(), e.loss_db);
            }
            Ok(out)
        }
        OutputFormat::Markdown => {
            let mut out = String::from("| Model | Path loss (dB) |\n|---|---:|\n");
            for e in estimates {
                let _ = writeln!(out, "| {} | {:.1} |", e.model, e.loss_db);
            }
            Ok(out)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for e in estimates {
                let _ = writeln!(out, "{:<30} {:>8.1} dB", e.model.label(), e.loss_db);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellplan_engine::{compute_full_budget, AnalysisOptions, ScenarioInput, ScenarioParams};

    fn sample() -> Vec<(String, LinkBudgetResult)> {
        let params = ScenarioParams::new(ScenarioInput::default()).unwrap();
        let result =
            compute_full_budget(&params, -100.0, &AnalysisOptions::default()).unwrap();
        vec![("default".to_owned(), result)]
    }

    #[test]
    fn test_text_contains_key_figures() {
        let out = render_text(&sample());
        assert!(out.contains("=== default (4G) ==="));
        assert!(out.contains("Indoor RSRP"));
        assert!(out.contains("Small cell required:  no"));
    }

    #[test]
    fn test_json_round_trips() {
        let out = render_json(&sample()).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["scenario"], "default");
        assert_eq!(parsed[0]["quality"], "excellent");
        assert!(parsed[0]["rsrp_dbm"].as_f64().unwrap() < 0.0);
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let out = render_csv(&sample());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("scenario,technology"));
        assert!(lines[1].starts_with("default,4G"));
    }

    #[test]
    fn test_markdown_table_shape() {
        let out = render_markdown(&sample());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("| default | 4G |"));
    }
}
