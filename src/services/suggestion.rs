// src/services/suggestion.rs
use log::info;

use crate::models::{DscrResult, FieldKey, FieldStore};

/// Writes the service's suggested inputs back into a new form snapshot.
///
/// Annual suggestions for monthly fields are divided by 12 and kept to two
/// decimals. Without a result or adjusted inputs the store is returned as is.
pub fn apply_suggestion(store: &FieldStore, result: Option<&DscrResult>) -> FieldStore {
    let Some(adjusted) = result.and_then(DscrResult::adjusted_inputs) else {
        return store.clone();
    };

    let mut updates = Vec::new();
    if let Some(days) = adjusted.days_per_month {
        updates.push((FieldKey::DaysPerMonth, days.to_string()));
    }
    if let Some(pct) = adjusted.depreciation_rate_pct {
        updates.push((FieldKey::DepreciationPct, pct.to_string()));
    }
    if let Some(annual) = adjusted.drawings_annual {
        updates.push((FieldKey::Drawings, format!("{:.2}", annual / 12.0)));
    }
    if let Some(annual) = adjusted.others_annual {
        updates.push((FieldKey::Others, format!("{:.2}", annual / 12.0)));
    }

    info!("Applying {} suggested input(s)", updates.len());
    store.with_values(updates)
}
