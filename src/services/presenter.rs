// src/services/presenter.rs
use crate::models::{DscrResult, FieldKey, FieldStore};
use crate::services::validation::TOUCHED_ON_FAILURE;
use crate::services::workflow::WorkflowState;

pub const NOT_AVAILABLE: &str = "N/A";

/// Display projection of a compute result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub baseline_dscr: String,
    pub final_dscr: String,
    /// The full response, pretty-printed.
    pub breakdown: String,
}

/// Two decimals with ties rounded away from zero, or `N/A` when the value is
/// absent or zero.
pub fn format_dscr(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => format!("{:.2}", (v * 100.0).round() / 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn summarize(result: Option<&DscrResult>) -> Option<ResultSummary> {
    let result = result?;
    let breakdown =
        serde_json::to_string_pretty(result.raw()).unwrap_or_else(|_| result.raw().to_string());

    Some(ResultSummary {
        baseline_dscr: format_dscr(result.baseline_dscr()),
        final_dscr: format_dscr(result.final_dscr()),
        breakdown,
    })
}

/// Whether a mandatory field should be highlighted: the user has been there
/// and left it empty. Whitespace counts as an entry.
pub fn is_flagged_invalid(key: FieldKey, store: &FieldStore, state: &WorkflowState) -> bool {
    TOUCHED_ON_FAILURE.contains(&key)
        && state.touched.contains(&key)
        && store.get(key).is_empty()
}
