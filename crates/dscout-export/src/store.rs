use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use dscout_core::DemandRecord;

use crate::delimited::DelimitedWriter;
use crate::error::ExportError;
use crate::rows::{columns, to_rows, Row};
use crate::xlsx::XlsxWriter;

/// The tabular formats a run can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// One persistence strategy. Strategies are tried in the order the store
/// holds them; the first success wins.
pub trait TableWriter: Send + Sync {
    fn format(&self) -> ExportFormat;

    /// Write `rows` under `columns` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the file cannot be produced.
    fn write(&self, path: &Path, columns: &[String], rows: &[Row]) -> Result<(), ExportError>;
}

/// What `save` actually did: where the file landed, in which format, and
/// how many data rows it holds.
#[derive(Debug, Clone)]
pub struct SavedExport {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub rows: usize,
}

/// Persists a run's records, preferring the spreadsheet writer and falling
/// back to the delimited writer when it fails. The fallback is logged, and
/// [`SavedExport::format`] tells the caller which strategy won.
pub struct ResultStore {
    output_dir: PathBuf,
    writers: Vec<Box<dyn TableWriter>>,
}

impl ResultStore {
    /// Store with the default strategy order: xlsx, then CSV.
    #[must_use]
    pub fn new(output_dir: PathBuf) -> Self {
        Self::with_writers(output_dir, vec![Box::new(XlsxWriter), Box::new(DelimitedWriter)])
    }

    /// Store with a custom strategy list (used by tests and callers that
    /// want CSV-only output).
    #[must_use]
    pub fn with_writers(output_dir: PathBuf, writers: Vec<Box<dyn TableWriter>>) -> Self {
        Self {
            output_dir,
            writers,
        }
    }

    /// Persist `records` under `stem` (extension chosen by the winning
    /// writer).
    ///
    /// An empty record set is a no-op reported as `Ok(None)` — no zero-row
    /// file is produced.
    ///
    /// # Errors
    ///
    /// Returns the last writer's [`ExportError`] when every strategy fails;
    /// nothing has been persisted in that case.
    pub fn save(
        &self,
        records: &[DemandRecord],
        stem: &str,
    ) -> Result<Option<SavedExport>, ExportError> {
        if records.is_empty() {
            tracing::info!("no records to persist — skipping export");
            return Ok(None);
        }

        let rows = to_rows(records)?;
        let columns = columns(&rows);

        let mut last_err: Option<ExportError> = None;
        for writer in &self.writers {
            let format = writer.format();
            let path = self
                .output_dir
                .join(format!("{stem}.{}", format.extension()));
            match writer.write(&path, &columns, &rows) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), %format, rows = rows.len(), "export written");
                    return Ok(Some(SavedExport {
                        path,
                        format,
                        rows: rows.len(),
                    }));
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        %format,
                        error = %e,
                        "writer failed — trying the next strategy"
                    );
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or(ExportError::NoWriters))
    }
}

/// Default file stem for a run: `demand_results_` plus the run timestamp.
#[must_use]
pub fn default_stem(at: DateTime<Utc>) -> String {
    format!("demand_results_{}", at.format("%Y%m%d_%H%M%S"))
}
