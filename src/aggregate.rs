// Grouped sums/counts and derived metrics for the chart and metric boxes.
//
// Every numeric cell goes through `util::parse_numeric`; unparseable values
// are skipped, never propagated. Empty input always produces a defined
// zero/empty result.
use std::collections::HashMap;

use crate::columns;
use crate::types::{AggregateRow, CostSummary, RecordSet};
use crate::util::{average, normalize_text, parse_numeric};

/// Group rows on `group_col` and sum `measure` (or count rows when no
/// measure is given or it cannot be resolved).
///
/// Labels are unique and appear in first-seen row order; use
/// [`sort_by_label`] for the ascending order the per-state series wants.
/// `skip_totals` excludes blank groups and a literal `TOTAL` row, which the
/// per-state series carries in-sheet.
///
/// In sum mode a group only materializes once one of its measure cells
/// parses; a group whose every cell is unparseable is absent from the
/// result, not present with 0.
pub fn group_sum(
    records: &RecordSet,
    group_col: &str,
    measure: Option<&str>,
    skip_totals: bool,
) -> Vec<AggregateRow> {
    let Some(group_label) = columns::find_one(records, group_col) else {
        return Vec::new();
    };
    let group_idx = match records.column_index(&group_label) {
        Some(i) => i,
        None => return Vec::new(),
    };
    let measure_idx = measure
        .and_then(|m| columns::find_one(records, m))
        .and_then(|label| records.column_index(&label));

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for row in &records.rows {
        let label = row.get(group_idx).map(String::as_str).unwrap_or("").trim();
        if skip_totals && (label.is_empty() || label.eq_ignore_ascii_case("total")) {
            continue;
        }
        let amount = match measure_idx {
            Some(mi) => match row.get(mi).and_then(|v| parse_numeric(v)) {
                Some(v) => v,
                None => continue,
            },
            None => 1.0,
        };
        if !totals.contains_key(label) {
            order.push(label.to_string());
        }
        *totals.entry(label.to_string()).or_insert(0.0) += amount;
    }

    order
        .into_iter()
        .map(|label| {
            let value = totals[&label];
            AggregateRow { label, value }
        })
        .collect()
}

/// Ascending label order, for the time/area-style aggregate.
pub fn sort_by_label(rows: &mut [AggregateRow]) {
    rows.sort_by(|a, b| a.label.cmp(&b.label));
}

/// Share of `part` over `whole` in percent, both looked up by normalized
/// label. A missing or zero denominator yields 0, never a division error.
pub fn percentage(part: &str, whole: &str, rows: &[AggregateRow]) -> f64 {
    let lookup = |label: &str| {
        let n = normalize_text(label);
        rows.iter()
            .find(|r| normalize_text(&r.label) == n)
            .map(|r| r.value)
    };
    let denom = match lookup(whole) {
        Some(v) if v != 0.0 => v,
        _ => return 0.0,
    };
    let numer = lookup(part).unwrap_or(0.0);
    (numer / denom) * 100.0
}

/// Total and mean of a cost column.
///
/// Returns `None` when the column cannot be resolved or no cell parses, so
/// callers can distinguish "cost data unavailable" from "all costs are
/// zero".
pub fn cost_summary(records: &RecordSet, cost_col: &str) -> Option<CostSummary> {
    let label = columns::find_one(records, cost_col)?;
    let idx = records.column_index(&label)?;
    let values: Vec<f64> = records
        .rows
        .iter()
        .filter_map(|row| row.get(idx).and_then(|v| parse_numeric(v)))
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(CostSummary {
        total: values.iter().sum(),
        mean: average(&values),
        counted: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_sheet() -> RecordSet {
        RecordSet::new(
            vec!["Etiqueta".into(), "Equipos".into()],
            vec![
                vec!["ACTIVOS".into(), "12".into()],
                vec!["BAJA".into(), "3".into()],
                vec!["ACTIVOS".into(), "5".into()],
                vec!["TOTAL".into(), "20".into()],
            ],
        )
    }

    #[test]
    fn group_sum_merges_duplicate_labels_in_first_seen_order() {
        let rows = group_sum(&graph_sheet(), "Etiqueta", Some("Equipos"), false);
        assert_eq!(
            rows,
            vec![
                AggregateRow { label: "ACTIVOS".into(), value: 17.0 },
                AggregateRow { label: "BAJA".into(), value: 3.0 },
                AggregateRow { label: "TOTAL".into(), value: 20.0 },
            ]
        );
    }

    #[test]
    fn skip_totals_drops_blank_and_total_groups() {
        let rs = RecordSet::new(
            vec!["Estado".into()],
            vec![
                vec!["Jalisco".into()],
                vec!["".into()],
                vec!["TOTAL".into()],
                vec!["Jalisco".into()],
                vec!["Coahuila".into()],
            ],
        );
        let mut rows = group_sum(&rs, "Estado", None, true);
        sort_by_label(&mut rows);
        assert_eq!(
            rows,
            vec![
                AggregateRow { label: "Coahuila".into(), value: 1.0 },
                AggregateRow { label: "Jalisco".into(), value: 2.0 },
            ]
        );
    }

    #[test]
    fn fully_unparseable_group_is_absent_not_zero() {
        let rs = RecordSet::new(
            vec!["Etiqueta".into(), "Equipos".into()],
            vec![
                vec!["ACTIVOS".into(), "12".into()],
                vec!["PENDIENTES".into(), "N/A".into()],
                vec!["PENDIENTES".into(), "".into()],
            ],
        );
        let rows = group_sum(&rs, "Etiqueta", Some("Equipos"), false);
        assert_eq!(rows, vec![AggregateRow { label: "ACTIVOS".into(), value: 12.0 }]);
    }

    #[test]
    fn count_mode_when_measure_is_missing() {
        let rows = group_sum(&graph_sheet(), "Etiqueta", Some("NoSuchColumn"), false);
        assert_eq!(rows[0], AggregateRow { label: "ACTIVOS".into(), value: 2.0 });
    }

    #[test]
    fn unresolvable_group_column_yields_empty() {
        assert!(group_sum(&graph_sheet(), "zzz", None, false).is_empty());
    }

    #[test]
    fn percentage_never_divides_by_zero() {
        let rows = vec![
            AggregateRow { label: "ACTIVOS".into(), value: 17.0 },
            AggregateRow { label: "TOTAL".into(), value: 0.0 },
        ];
        assert_eq!(percentage("ACTIVOS", "TOTAL", &rows), 0.0);
        assert_eq!(percentage("ACTIVOS", "MISSING", &rows), 0.0);
    }

    #[test]
    fn percentage_uses_normalized_label_lookup() {
        let rows = vec![
            AggregateRow { label: " Activos ".into(), value: 5.0 },
            AggregateRow { label: "TOTAL".into(), value: 20.0 },
        ];
        assert_eq!(percentage("ACTIVOS", "total", &rows), 25.0);
    }

    #[test]
    fn cost_summary_distinguishes_unavailable_from_zero() {
        let rs = RecordSet::new(
            vec!["Equipo".into(), "Costo".into()],
            vec![
                vec!["A".into(), "$1,200.50".into()],
                vec!["B".into(), "N/A".into()],
                vec!["C".into(), "799.50".into()],
            ],
        );
        let summary = cost_summary(&rs, "Costo").unwrap();
        assert_eq!(summary.total, 2000.0);
        assert_eq!(summary.mean, 1000.0);
        assert_eq!(summary.counted, 2);

        assert_eq!(cost_summary(&rs, "Precio Final"), None);

        let all_na = RecordSet::new(
            vec!["Costo".into()],
            vec![vec!["N/A".into()], vec!["".into()]],
        );
        assert_eq!(cost_summary(&all_na, "Costo"), None);
    }
}
