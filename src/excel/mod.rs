//! Excel workbook access
//!
//! - Import: one worksheet (.xlsx) → `Table`, at a header row offset
//! - Export: copy of the workbook with a formula written into a cell range
//! - Cell references: `C2` ↔ (3, 2)

mod cell_reference;
mod exporter;
mod importer;

pub use cell_reference::{
    column_index_to_letters, column_letters_to_index, CellReference, MAX_COLUMN, MAX_ROW,
};
pub use exporter::{ExcelExporter, ExportOptions, OUTPUT_SUFFIX};
pub use importer::ExcelImporter;
