//! Result persistence for dscout.
//!
//! An explicit two-strategy store: the rich spreadsheet writer is tried
//! first and the delimited (CSV-with-BOM) writer is the documented
//! fallback. The caller always learns which format actually landed on
//! disk.

mod delimited;
mod error;
mod rows;
mod store;
mod xlsx;

pub use delimited::DelimitedWriter;
pub use error::ExportError;
pub use store::{default_stem, ExportFormat, ResultStore, SavedExport, TableWriter};
pub use xlsx::XlsxWriter;
