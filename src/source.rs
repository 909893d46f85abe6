// The data-source boundary.
//
// The dashboard only needs "give me worksheet X's rows as cell strings";
// whatever sits behind that (a spreadsheet API, an exported snapshot) is
// interchangeable. Tests plug in an in-memory source with a fetch counter.
use std::path::PathBuf;

use crate::error::SourceError;

/// A read-only, worksheet-oriented tabular source.
pub trait SheetSource {
    /// Stable identity used as part of the loader's cache key.
    fn id(&self) -> &str;

    /// All rows of the named worksheet, each row a vector of cell strings.
    /// Row 0 is whatever the sheet physically starts with; header detection
    /// is the loader's job, not the source's.
    fn fetch_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, SourceError>;
}

/// A directory of CSV files, one per worksheet (`<dir>/<sheet>.csv`).
///
/// This is the offline stand-in for the spreadsheet service: the sheets are
/// exported verbatim, so they carry the same quirks (decorative leading
/// rows, blank header cells) the loader has to repair.
pub struct CsvDirSource {
    id: String,
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(id: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self { id: id.into(), dir: dir.into() }
    }
}

impl SheetSource for CsvDirSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, SourceError> {
        let path = self.dir.join(format!("{}.csv", sheet));
        // A missing file is "no such worksheet"; any other filesystem
        // failure (permissions, a file standing in for the directory) is an
        // io error in its own right.
        match std::fs::metadata(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::WorksheetNotFound(sheet.to_string()));
            }
            Err(e) => return Err(SourceError::Io(e)),
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_worksheet_is_reported_not_io_error() {
        let src = CsvDirSource::new("test", "/nonexistent-dir");
        match src.fetch_rows("NoSuchSheet") {
            Err(SourceError::WorksheetNotFound(name)) => assert_eq!(name, "NoSuchSheet"),
            other => panic!("expected WorksheetNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn non_missing_filesystem_failure_surfaces_as_io() {
        // Point the source at a plain file instead of a directory; the
        // lookup then fails with something other than "not found".
        let file = std::env::temp_dir().join("inventario-source-not-a-dir");
        std::fs::write(&file, "x").unwrap();
        let src = CsvDirSource::new("test", &file);
        match src.fetch_rows("Web") {
            Err(SourceError::Io(_)) => {}
            other => panic!("expected Io, got {:?}", other.map(|_| ())),
        }
        let _ = std::fs::remove_file(&file);
    }
}
