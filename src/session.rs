//! One user session: the loaded table and the formula waiting to be saved
//!
//! Each public method is one user action (pick a file, preview at a header
//! row, convert an instruction, save). Inputs arrive as raw text from the
//! CLI or GUI and are validated here; a failed action leaves the session as
//! it was, except that loading a new file drops the old table and a failed
//! conversion drops the formula waiting to be saved.

use crate::error::{NlFormulaError, NlFormulaResult, TranslateError};
use crate::excel::{CellReference, ExcelExporter, ExcelImporter, ExportOptions};
use crate::translator::{FormulaTranslator, TranslatorConfig};
use crate::types::{Formula, Table, WriteTarget};
use std::path::{Path, PathBuf};

/// Rows shown in a preview
pub const PREVIEW_ROWS: usize = 5;

/// A generated formula and where it will be written
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub formula: Formula,
    pub target: WriteTarget,
}

pub struct Session {
    translator: FormulaTranslator,
    file_path: Option<PathBuf>,
    sheet: Option<String>,
    table: Option<Table>,
    pending: Option<PendingWrite>,
}

impl Session {
    pub fn new(config: TranslatorConfig) -> NlFormulaResult<Self> {
        Ok(Self {
            translator: FormulaTranslator::new(config)?,
            file_path: None,
            sheet: None,
            table: None,
            pending: None,
        })
    }

    pub fn translator(&self) -> &FormulaTranslator {
        &self.translator
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingWrite> {
        self.pending.as_ref()
    }

    /// Worksheet used for preview and save; the first one when unset
    pub fn set_sheet(&mut self, sheet: Option<String>) {
        self.sheet = sheet.filter(|s| !s.is_empty());
    }

    /// Pick a workbook; it must open and its first sheet must be readable
    pub fn load_file(&mut self, path: &Path) -> NlFormulaResult<()> {
        ExcelImporter::new(path).check_readable()?;
        self.file_path = Some(path.to_path_buf());
        self.table = None;
        self.pending = None;
        Ok(())
    }

    /// Load the table with `header_input` (0-based row number text) as header
    pub fn preview(&mut self, header_input: &str) -> NlFormulaResult<&Table> {
        if self.file_path.is_none() {
            return Err(NlFormulaError::Preview(
                "Excelファイルを選択してください。".to_string(),
            ));
        }
        let header_row = parse_header_row(header_input)?;
        self.preview_at(header_row)
    }

    /// Load the table with 0-based sheet row `header_row` as header
    pub fn preview_at(&mut self, header_row: usize) -> NlFormulaResult<&Table> {
        let path = self.file_path.as_ref().ok_or_else(|| {
            NlFormulaError::Preview("Excelファイルを選択してください。".to_string())
        })?;
        let table = ExcelImporter::new(path).import(header_row, self.sheet.as_deref())?;
        self.pending = None;
        Ok(self.table.insert(table))
    }

    /// Formula for `instruction` against the loaded table
    pub fn generate(&self, instruction: &str) -> Result<Formula, TranslateError> {
        self.translator.generate(self.table.as_ref(), instruction)
    }

    /// Validate the inputs, translate the instruction and keep the result
    /// for `save`
    ///
    /// An empty `row_count_input` means every data row of the table. Any
    /// earlier result is dropped first, so after a failure there is nothing
    /// to save.
    pub fn convert(
        &mut self,
        instruction: &str,
        cell_input: &str,
        row_count_input: &str,
    ) -> NlFormulaResult<&PendingWrite> {
        self.pending = None;

        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(NlFormulaError::Validation(
                "日本語でやりたいことを入力してください。".to_string(),
            ));
        }
        let table = self.table.as_ref().ok_or(TranslateError::NotReady)?;
        let start = CellReference::from_user_input(cell_input)?;
        let row_count = parse_row_count(row_count_input, table.row_count())?;

        let formula = self.translator.generate(Some(table), instruction)?;
        tracing::info!(formula = %formula, start = %start, row_count, "formula ready");

        Ok(self.pending.insert(PendingWrite {
            formula,
            target: WriteTarget::new(start, row_count),
        }))
    }

    /// Write the pending formula into a copy of the loaded workbook
    pub fn save(&self, output: Option<&Path>) -> NlFormulaResult<PathBuf> {
        let (path, pending) = match (&self.file_path, &self.pending) {
            (Some(path), Some(pending)) => (path, pending),
            _ => {
                return Err(NlFormulaError::Validation(
                    "関数を生成し開始セルを指定してください。".to_string(),
                ))
            }
        };

        let options = ExportOptions {
            sheet: self.sheet.clone(),
            output: output.map(Path::to_path_buf),
        };
        ExcelExporter::new(path).export(&pending.formula, &pending.target, &options)
    }
}

/// Header row text → 0-based row index
pub fn parse_header_row(input: &str) -> NlFormulaResult<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(NlFormulaError::Preview(format!(
            "ヘッダー行の番号は0以上の整数で入力してください。 ('{}')",
            input
        )));
    }
    trimmed
        .parse()
        .map_err(|_| NlFormulaError::Preview(format!("Header row '{}' is too large", trimmed)))
}

/// Row count text → number of rows; empty text means `default`
pub fn parse_row_count(input: &str, default: usize) -> NlFormulaResult<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return u32::try_from(default).map_err(|_| {
            NlFormulaError::Validation(format!("Table has too many rows ({})", default))
        });
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(NlFormulaError::Validation(format!(
            "書き込み行数は数字で入力してください。 ('{}')",
            input
        )));
    }
    trimmed
        .parse()
        .map_err(|_| NlFormulaError::Validation(format!("Row count '{}' is too large", trimmed)))
}
