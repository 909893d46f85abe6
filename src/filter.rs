// Filter state and the conjunctive filter pipeline.
//
// Filter state is an explicit immutable value: the console loop folds user
// actions through `reduce` and passes the result into `apply` on the next
// render cycle. Nothing here mutates the underlying dataset; filters only
// shape the view materialized from it.
use log::info;

use crate::columns;
use crate::types::{Notice, RecordSet};
use crate::util::normalize_text;

/// Column aliases for the status field, in priority order.
pub const STATUS_COLUMNS: &[&str] = &["estatus", "estado", "status"];
/// Column aliases for the region/state field.
pub const REGION_COLUMNS: &[&str] = &["región", "region", "estado"];

/// Columns never shown and never searched: the image reference column, the
/// `*` placeholder column and anything with a blank label.
const HIDDEN_COLUMNS: &[&str] = &["imagen", "*"];

/// The per-view filter state. All three predicates are independent and
/// compose with logical AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Active status value, stored uppercased; at most one at a time.
    pub status: Option<String>,
    /// Active region value, stored uppercased; at most one at a time.
    pub region: Option<String>,
    /// Free-text query, matched case-insensitively across all visible fields.
    pub query: Option<String>,
}

/// A user action against the filter state.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Select a status button; selecting the active one again clears it.
    ToggleStatus(String),
    /// Select a region link; selecting the active one again clears it.
    ToggleRegion(String),
    /// The explicit "remove filter" action on the region view.
    ClearRegion,
    /// Replace the free-text query; an empty string clears it.
    SetQuery(String),
}

/// Pure reducer: previous state + action → next state.
pub fn reduce(state: &FilterState, action: FilterAction) -> FilterState {
    let mut next = state.clone();
    match action {
        FilterAction::ToggleStatus(value) => {
            let value = value.trim().to_uppercase();
            next.status = if state.status.as_deref() == Some(value.as_str()) {
                None
            } else {
                Some(value)
            };
        }
        FilterAction::ToggleRegion(value) => {
            let value = value.trim().to_uppercase();
            next.region = if state.region.as_deref() == Some(value.as_str()) {
                None
            } else {
                Some(value)
            };
        }
        FilterAction::ClearRegion => next.region = None,
        FilterAction::SetQuery(q) => {
            let q = q.trim().to_string();
            next.query = if q.is_empty() { None } else { Some(q) };
        }
    }
    next
}

/// Apply the filter state to a record set.
///
/// Stages run status → region → hidden-column projection → query; each stage
/// is a row-existence predicate, so any order would produce the same row
/// set. Hidden columns are projected out before the query stage so they
/// never contribute to search matches and are never shown.
///
/// A missing status or region column turns that stage into a no-op and adds
/// a warning notice instead of erroring.
pub fn apply(records: &RecordSet, state: &FilterState) -> (RecordSet, Vec<Notice>) {
    let mut notices = Vec::new();
    let mut view = records.clone();

    if let Some(wanted) = &state.status {
        match columns::find_any(&view, STATUS_COLUMNS) {
            Some(col) => {
                let idx = view.column_index(&col).unwrap_or(0);
                view = view.retain_rows(|row| {
                    row.get(idx).map(String::as_str).unwrap_or("").trim().to_uppercase()
                        == *wanted
                });
            }
            None => notices.push(Notice::warning(
                "No status column (ESTATUS or similar) was found; the status filter was not applied.",
            )),
        }
    }

    if let Some(wanted) = &state.region {
        match columns::find_any(&view, REGION_COLUMNS) {
            Some(col) => {
                let idx = view.column_index(&col).unwrap_or(0);
                view = view.retain_rows(|row| {
                    row.get(idx).map(String::as_str).unwrap_or("").trim().to_uppercase()
                        == *wanted
                });
            }
            None => notices.push(Notice::warning(
                "No region column was found; the region filter was not applied.",
            )),
        }
    }

    view = drop_hidden_columns(&view);

    if let Some(query) = &state.query {
        let needle = query.to_lowercase();
        view = view.retain_rows(|row| row.join(" ").to_lowercase().contains(&needle));
        info!("query '{}' kept {} rows", query, view.len());
    }

    (view, notices)
}

/// Project out internal/non-display columns.
fn drop_hidden_columns(records: &RecordSet) -> RecordSet {
    let visible: Vec<String> = records
        .columns
        .iter()
        .filter(|c| {
            let n = normalize_text(c);
            !n.is_empty() && !HIDDEN_COLUMNS.contains(&n.as_str())
        })
        .cloned()
        .collect();
    records.select(&visible)
}
