// Fetching, schema repair and the TTL cache.
//
// The loader is the only component that talks to the network boundary, and
// it never lets a failure escape: any fetch problem is converted into an
// error notice plus an empty `RecordSet`, so downstream components always
// receive a valid (possibly empty) view.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use once_cell::sync::Lazy;

use crate::source::SheetSource;
use crate::types::{Notice, RecordSet};

/// How a worksheet's header row is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadMode {
    /// Row 0 is the header; everything below is data. Blank-header columns
    /// are dropped entirely.
    HeaderFirstRow,
    /// The real header sits at the given row index (the phone sheet carries
    /// decorative rows above it). Blank header cells become positional
    /// `col<i>` placeholders; data starts at `index + 1`.
    HeaderAtRow(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: String,
    sheet: String,
    mode: LoadMode,
}

struct CacheEntry {
    fetched_at: DateTime<Utc>,
    records: Arc<RecordSet>,
}

// One process-wide cache, read-mostly; entries are swapped wholesale under
// the lock so a consumer never observes a half-written snapshot.
static CACHE: Lazy<Mutex<HashMap<CacheKey, CacheEntry>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// What one `load` call produced.
pub struct LoadOutcome {
    pub records: Arc<RecordSet>,
    pub notices: Vec<Notice>,
    pub from_cache: bool,
}

/// Load a worksheet through the cache.
///
/// A hit younger than `ttl_secs` short-circuits the fetch and hands back the
/// same materialized snapshot. A miss or expiry fetches, repairs the schema
/// per `mode`, and replaces the cache entry. A fetch failure degrades to an
/// empty set that is cached for the TTL window like any other result, which
/// matches the original dashboard's caching of its error path.
pub fn load(source: &dyn SheetSource, sheet: &str, mode: LoadMode, ttl_secs: u64) -> LoadOutcome {
    let key = CacheKey {
        source: source.id().to_string(),
        sheet: sheet.to_string(),
        mode,
    };

    let mut cache = CACHE.lock().unwrap();
    if let Some(entry) = cache.get(&key) {
        let age = Utc::now().signed_duration_since(entry.fetched_at);
        if age.num_seconds() >= 0 && (age.num_seconds() as u64) < ttl_secs {
            debug!("cache hit for {}/{} (age {}s)", key.source, key.sheet, age.num_seconds());
            return LoadOutcome {
                records: Arc::clone(&entry.records),
                notices: Vec::new(),
                from_cache: true,
            };
        }
    }

    let mut notices = Vec::new();
    let records = match source.fetch_rows(sheet) {
        Ok(rows) => {
            debug!("fetched {} raw rows from {}/{}", rows.len(), key.source, sheet);
            repair_schema(rows, mode)
        }
        Err(e) => {
            warn!("fetch failed for {}/{}: {}", key.source, sheet, e);
            notices.push(Notice::error(format!(
                "Could not reach the data source for '{}': {}",
                sheet, e
            )));
            RecordSet::empty()
        }
    };

    let records = Arc::new(records);
    cache.insert(
        key,
        CacheEntry { fetched_at: Utc::now(), records: Arc::clone(&records) },
    );
    LoadOutcome { records, notices, from_cache: false }
}

/// Drop every cached entry. The console flow exposes this as an explicit
/// refresh action.
pub fn invalidate_cache() {
    CACHE.lock().unwrap().clear();
}

/// Turn raw cell rows into a `RecordSet` according to the header mode.
fn repair_schema(rows: Vec<Vec<String>>, mode: LoadMode) -> RecordSet {
    match mode {
        LoadMode::HeaderFirstRow => {
            let mut iter = rows.into_iter();
            let Some(header) = iter.next() else {
                return RecordSet::empty();
            };
            // Blank-header columns carry no addressable data; remove them.
            let keep: Vec<usize> = header
                .iter()
                .enumerate()
                .filter(|(_, h)| !h.trim().is_empty())
                .map(|(i, _)| i)
                .collect();
            let columns: Vec<String> = keep.iter().map(|&i| header[i].clone()).collect();
            let rows = iter
                .map(|row| {
                    keep.iter()
                        .map(|&i| row.get(i).cloned().unwrap_or_default())
                        .collect()
                })
                .collect();
            RecordSet::new(columns, rows)
        }
        LoadMode::HeaderAtRow(index) => {
            if rows.len() <= index {
                return RecordSet::empty();
            }
            let columns: Vec<String> = rows[index]
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    if h.trim().is_empty() {
                        format!("col{}", i)
                    } else {
                        h.clone()
                    }
                })
                .collect();
            let width = columns.len();
            let rows = rows[index + 1..]
                .iter()
                .map(|row| {
                    (0..width)
                        .map(|i| row.get(i).cloned().unwrap_or_default())
                        .collect()
                })
                .collect();
            RecordSet::new(columns, rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn first_row_mode_drops_blank_columns_and_pads_short_rows() {
        let rs = repair_schema(
            raw(&[
                &["Equipo", "", "ESTATUS"],
                &["Laptop A", "ignored", "ACTIVA"],
                &["Laptop B"],
            ]),
            LoadMode::HeaderFirstRow,
        );
        assert_eq!(rs.columns, vec!["Equipo", "ESTATUS"]);
        assert_eq!(rs.rows[0], vec!["Laptop A", "ACTIVA"]);
        assert_eq!(rs.rows[1], vec!["Laptop B", ""]);
    }

    #[test]
    fn offset_mode_places_header_and_placeholder() {
        let rs = repair_schema(
            raw(&[
                &["decorative"],
                &["rows"],
                &["above"],
                &["Marca", "", "IMEI"],
                &["Apple", "x", "123"],
                &["Samsung", "y", "456"],
            ]),
            LoadMode::HeaderAtRow(3),
        );
        assert_eq!(rs.columns, vec!["Marca", "col1", "IMEI"]);
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.value(0, 2), "123");
    }

    #[test]
    fn too_few_rows_yields_empty_set() {
        assert!(repair_schema(Vec::new(), LoadMode::HeaderFirstRow).columns.is_empty());
        let rs = repair_schema(raw(&[&["a"], &["b"]]), LoadMode::HeaderAtRow(3));
        assert!(rs.is_empty());
        assert!(rs.columns.is_empty());
    }

    #[test]
    fn header_only_offset_sheet_has_columns_but_no_rows() {
        let rs = repair_schema(
            raw(&[&[""], &[""], &[""], &["Marca", "Modelo"]]),
            LoadMode::HeaderAtRow(3),
        );
        assert_eq!(rs.columns, vec!["Marca", "Modelo"]);
        assert!(rs.is_empty());
    }
}
