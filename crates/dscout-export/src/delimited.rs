use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::rows::{cell_text, Row};
use crate::store::{ExportFormat, TableWriter};

/// UTF-8 byte-order mark, written first so spreadsheet importers detect the
/// encoding and non-ASCII titles survive the trip.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Fallback writer: plain CSV, UTF-8 with BOM, RFC 4180 quoting (embedded
/// delimiters and newlines in titles are preserved by the csv crate).
pub struct DelimitedWriter;

impl TableWriter for DelimitedWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn write(&self, path: &Path, columns: &[String], rows: &[Row]) -> Result<(), ExportError> {
        let io_err = |source: std::io::Error| ExportError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::create(path).map_err(io_err)?;
        file.write_all(UTF8_BOM).map_err(io_err)?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(columns)?;
        for row in rows {
            let record: Vec<String> = columns
                .iter()
                .map(|column| cell_text(row.get(column)))
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush().map_err(io_err)?;
        Ok(())
    }
}
