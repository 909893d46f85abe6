use thiserror::Error;

/// Failures at the data-source boundary. The loader is the only consumer;
/// it converts any variant into an error notice plus an empty `RecordSet`,
/// so nothing above the loader ever sees one of these.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
