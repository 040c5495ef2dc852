use std::path::Path;

use rust_xlsxwriter::Workbook;
use serde_json::Value;

use crate::error::ExportError;
use crate::rows::Row;
use crate::store::{ExportFormat, TableWriter};

/// Primary writer: one worksheet, header row, numbers stored as numbers so
/// spreadsheet-side sorting and filtering work on the heat columns.
pub struct XlsxWriter;

impl TableWriter for XlsxWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn write(&self, path: &Path, columns: &[String], rows: &[Row]) -> Result<(), ExportError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        let mut col_idx: u16 = 0;
        for column in columns {
            worksheet.write_string(0, col_idx, column.as_str())?;
            col_idx += 1;
        }

        let mut row_idx: u32 = 0;
        for row in rows {
            row_idx += 1;
            let mut col_idx: u16 = 0;
            for column in columns {
                match row.get(column) {
                    Some(Value::Number(n)) => {
                        if let Some(v) = n.as_f64() {
                            worksheet.write_number(row_idx, col_idx, v)?;
                        } else {
                            worksheet.write_string(row_idx, col_idx, n.to_string())?;
                        }
                    }
                    Some(Value::String(s)) => {
                        worksheet.write_string(row_idx, col_idx, s.as_str())?;
                    }
                    None | Some(Value::Null) => {}
                    Some(other) => {
                        worksheet.write_string(row_idx, col_idx, other.to_string())?;
                    }
                }
                col_idx += 1;
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}
