// The Column Resolver: maps logical field names onto whatever labels the
// spreadsheet actually carries this week.
//
// Matching is two-stage per desired name: normalized exact match first, then
// substring containment in either direction, taking the first hit in source
// column order. Zero total matches fails open to the full column list so the
// view is never blank; the caller gets a flag to surface that.
use crate::types::RecordSet;
use crate::util::normalize_text;

/// The outcome of resolving a desired column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Actual labels, ordered by the desired list (not by source order),
    /// deduplicated preserving first appearance.
    pub columns: Vec<String>,
    /// True when nothing matched and all available columns were returned.
    pub fail_open: bool,
}

/// Resolve `desired` logical names against the columns of `records`.
pub fn resolve(desired: &[String], records: &RecordSet) -> Resolution {
    // Vec of pairs rather than a map: iteration order is the tiebreaker for
    // substring matches and must follow the source column order.
    let index: Vec<(String, &String)> = records
        .columns
        .iter()
        .map(|c| (normalize_text(c), c))
        .collect();

    let mut matched: Vec<String> = Vec::new();
    for want in desired {
        let nd = normalize_text(want);
        let exact = index.iter().find(|(n, _)| *n == nd);
        let found = exact.or_else(|| {
            index
                .iter()
                .find(|(n, _)| !nd.is_empty() && !n.is_empty() && (n.contains(&nd) || nd.contains(n)))
        });
        if let Some((_, actual)) = found {
            if !matched.contains(*actual) {
                matched.push((*actual).clone());
            }
        }
    }

    if matched.is_empty() {
        return Resolution { columns: records.columns.clone(), fail_open: true };
    }
    Resolution { columns: matched, fail_open: false }
}

/// Resolve a single logical name (exact then substring); no fail-open.
pub fn find_one(records: &RecordSet, desired: &str) -> Option<String> {
    let nd = normalize_text(desired);
    if nd.is_empty() {
        return None;
    }
    let index: Vec<(String, &String)> = records
        .columns
        .iter()
        .map(|c| (normalize_text(c), c))
        .collect();
    index
        .iter()
        .find(|(n, _)| *n == nd)
        .or_else(|| {
            index
                .iter()
                .find(|(n, _)| !n.is_empty() && (n.contains(&nd) || nd.contains(n)))
        })
        .map(|(_, actual)| (*actual).clone())
}

/// First column whose normalized label exactly equals one of `candidates`,
/// trying candidates in order. Used for alias lookups like
/// estatus/status/estado.
pub fn find_any(records: &RecordSet, candidates: &[&str]) -> Option<String> {
    for cand in candidates {
        let nc = normalize_text(cand);
        if let Some(col) = records
            .columns
            .iter()
            .find(|c| normalize_text(c) == nc)
        {
            return Some(col.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_columns(cols: &[&str]) -> RecordSet {
        RecordSet::new(cols.iter().map(|c| c.to_string()).collect(), Vec::new())
    }

    fn desired(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn normalized_exact_match_beats_substring() {
        let rs = with_columns(&["ESTADO ", "Otro"]);
        let res = resolve(&desired(&["Estado"]), &rs);
        assert_eq!(res.columns, vec!["ESTADO "]);
        assert!(!res.fail_open);
    }

    #[test]
    fn substring_matches_in_either_direction() {
        let rs = with_columns(&["Plan Y Servicios contratados", "Ciudad"]);
        let res = resolve(&desired(&["Plan Y Servicios"]), &rs);
        assert_eq!(res.columns, vec!["Plan Y Servicios contratados"]);

        // Desired longer than actual also matches.
        let rs = with_columns(&["Tel", "Ciudad"]);
        let res = resolve(&desired(&["Número de Tel"]), &rs);
        assert_eq!(res.columns, vec!["Tel"]);
    }

    #[test]
    fn order_follows_desired_list_and_dedups() {
        let rs = with_columns(&["Ciudad", "Estado", "Marca"]);
        let res = resolve(&desired(&["Marca", "Estado", "ESTADO"]), &rs);
        assert_eq!(res.columns, vec!["Marca", "Estado"]);
    }

    #[test]
    fn zero_matches_fails_open_to_all_columns() {
        let rs = with_columns(&["Uno", "Dos"]);
        let res = resolve(&desired(&["xyz", "abc"]), &rs);
        assert!(res.fail_open);
        assert_eq!(res.columns, vec!["Uno", "Dos"]);
    }

    #[test]
    fn find_any_respects_candidate_priority() {
        let rs = with_columns(&["Estado", "ESTATUS"]);
        assert_eq!(
            find_any(&rs, &["estatus", "estado", "status"]),
            Some("ESTATUS".to_string())
        );
        assert_eq!(find_any(&rs, &["region"]), None);
    }

    #[test]
    fn estado_outranks_status_when_estatus_is_absent() {
        let rs = with_columns(&["Equipo", "Estado", "Status"]);
        assert_eq!(
            find_any(&rs, crate::filter::STATUS_COLUMNS),
            Some("Estado".to_string())
        );
    }

    #[test]
    fn find_one_is_accent_insensitive() {
        let rs = with_columns(&["Región", "Ciudad"]);
        assert_eq!(find_one(&rs, "region"), Some("Región".to_string()));
        assert_eq!(find_one(&rs, "inexistente"), None);
    }
}
