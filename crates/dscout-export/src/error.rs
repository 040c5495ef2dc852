use std::path::PathBuf;

use thiserror::Error;

/// Persistence failures. Unlike source errors these are fatal to the run:
/// the caller is expected to surface them together with the count of
/// accumulated-but-unsaved records.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("delimited write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("record serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no writers configured")]
    NoWriters,
}
