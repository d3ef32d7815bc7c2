//! Excel exporter implementation - copy of a workbook with a formula written in

use super::cell_reference::MAX_ROW;
use crate::error::{NlFormulaError, NlFormulaResult};
use crate::types::{Formula, WriteTarget};
use std::path::{Path, PathBuf};
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// Suffix appended to the file stem of the written copy
pub const OUTPUT_SUFFIX: &str = "_with_formula";

/// Where and how the copy is written
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Worksheet receiving the formula; the workbook's active sheet when `None`
    pub sheet: Option<String>,
    /// Destination file; `<stem>_with_formula.<ext>` next to the source when `None`
    pub output: Option<PathBuf>,
}

/// Writes a formula into a copy of a source workbook
///
/// The source package is loaded as a whole and saved under the new name, so
/// sheets, styles, number formats, defined names and the active sheet carry
/// over. Only the target cells change.
pub struct ExcelExporter {
    source: PathBuf,
}

impl ExcelExporter {
    /// Create a new Excel exporter for `source`
    pub fn new<P: AsRef<Path>>(source: P) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
        }
    }

    /// `<stem>_with_formula.<ext>` in the source's directory
    pub fn derived_output_path(source: &Path) -> NlFormulaResult<PathBuf> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                NlFormulaError::Export(format!(
                    "Cannot derive an output name from '{}'",
                    source.display()
                ))
            })?;

        let file_name = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext),
            None => format!("{}{}", stem, OUTPUT_SUFFIX),
        };

        Ok(source.with_file_name(file_name))
    }

    /// Write `formula` into every cell of `target` and save the copy
    ///
    /// Returns the path of the written file. The source file is only read.
    pub fn export(
        &self,
        formula: &Formula,
        target: &WriteTarget,
        options: &ExportOptions,
    ) -> NlFormulaResult<PathBuf> {
        check_target(target)?;

        let output = match &options.output {
            Some(path) => path.clone(),
            None => Self::derived_output_path(&self.source)?,
        };
        if same_file(&self.source, &output) {
            return Err(NlFormulaError::Export(format!(
                "Refusing to overwrite the source file '{}'",
                self.source.display()
            )));
        }

        let mut book = umya_spreadsheet::reader::xlsx::read(&self.source).map_err(|e| {
            NlFormulaError::Export(format!(
                "Failed to open Excel file '{}': {}",
                self.source.display(),
                e
            ))
        })?;

        let worksheet = target_sheet(&mut book, options.sheet.as_deref())?;
        let sheet_name = worksheet.get_name().to_string();
        write_target(worksheet, formula, target);

        umya_spreadsheet::writer::xlsx::write(&book, &output).map_err(|e| {
            NlFormulaError::Export(format!(
                "Failed to save Excel file '{}': {}",
                output.display(),
                e
            ))
        })?;

        tracing::info!(
            source = %self.source.display(),
            output = %output.display(),
            sheet = %sheet_name,
            start = %target.start,
            rows = target.row_count,
            "wrote formula"
        );
        Ok(output)
    }
}

/// The named worksheet, or the one that was active when the file was saved
fn target_sheet<'a>(
    book: &'a mut Spreadsheet,
    sheet: Option<&str>,
) -> NlFormulaResult<&'a mut Worksheet> {
    let Some(name) = sheet else {
        return Ok(book.get_active_sheet_mut());
    };

    let available: Vec<String> = book
        .get_sheet_collection()
        .iter()
        .map(|ws| ws.get_name().to_string())
        .collect();
    book.get_sheet_by_name_mut(name).ok_or_else(|| {
        NlFormulaError::Export(format!(
            "Sheet '{}' not found (available: {})",
            name,
            available.join(", ")
        ))
    })
}

/// The whole target range must fit on the sheet
fn check_target(target: &WriteTarget) -> NlFormulaResult<()> {
    target.start.ensure_in_grid()?;
    if target.row_count == 0 {
        return Ok(());
    }
    let last_row = u64::from(target.start.row) + u64::from(target.row_count) - 1;
    if last_row > u64::from(MAX_ROW) {
        return Err(NlFormulaError::Validation(format!(
            "Writing {} rows from {} would pass the last Excel row {}",
            target.row_count, target.start, MAX_ROW
        )));
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The same formula text goes into every target cell
fn write_target(worksheet: &mut Worksheet, formula: &Formula, target: &WriteTarget) {
    // Stored without the leading `=`, as in the sheet XML
    let text = formula.as_str().trim_start_matches('=');
    for (column, row) in target.cells() {
        worksheet.get_cell_mut((column, row)).set_formula(text);
    }
}
