use serde::Serialize;
use std::fmt;
use tabled::Tabled;

/// An ordered collection of rows sharing one resolved column set.
///
/// Everything is kept as strings: the spreadsheet is loosely typed and the
/// pipeline coerces on demand (see `util::parse_numeric`). Rows are always
/// padded to the column count by the loader, so `rows[r][c]` is safe for any
/// in-range pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RecordSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Number of data rows (not counting the header).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of an exact (byte-for-byte) column label.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Cell value at (row, column index); `""` when out of range.
    pub fn value(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Project onto the given column labels, in the given order. Unknown
    /// labels are skipped rather than erroring.
    pub fn select(&self, labels: &[String]) -> RecordSet {
        let indices: Vec<usize> = labels
            .iter()
            .filter_map(|l| self.column_index(l))
            .collect();
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        RecordSet { columns, rows }
    }

    /// Keep only the rows for which `pred` returns true.
    pub fn retain_rows<F>(&self, mut pred: F) -> RecordSet
    where
        F: FnMut(&[String]) -> bool,
    {
        RecordSet {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| pred(row.as_slice()))
                .cloned()
                .collect(),
        }
    }
}

/// One (category, total) pair produced by grouping. Category labels are
/// unique within an aggregation result.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AggregateRow {
    #[serde(rename = "Label")]
    #[tabled(rename = "Label")]
    pub label: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: f64,
}

/// Cost metrics over one resolved column. Distinct from "all zeros": the
/// aggregator returns `None` instead of this struct when the column is
/// missing or nothing parses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub total: f64,
    pub mean: f64,
    /// How many cells actually contributed (unparseable ones are dropped).
    pub counted: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-visible degradation message. Failures are contained where they
/// occur and travel up as notices next to a valid (possibly empty) result,
/// so no failure ever produces an unrenderable state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Info => "Info",
            NoticeLevel::Warning => "Warning",
            NoticeLevel::Error => "Error",
        };
        write!(f, "{}: {}", tag, self.message)
    }
}

/// Stats for the exported JSON summary of the current equipment view.
#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_rows: usize,
    pub visible_rows: usize,
    pub active_status: Option<String>,
    pub active_region: Option<String>,
    pub query: Option<String>,
    pub cost_total: Option<f64>,
    pub cost_mean: Option<f64>,
}
