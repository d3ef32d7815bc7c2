//! Excel importer implementation - Excel (.xlsx) → Table

use crate::error::{NlFormulaError, NlFormulaResult};
use crate::types::{format_number, CellValue, Table};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

type XlsxWorkbook = Xlsx<BufReader<File>>;

/// Excel importer reading one worksheet at a header offset
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> NlFormulaResult<XlsxWorkbook> {
        let is_xlsx = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
        if !is_xlsx {
            return Err(NlFormulaError::Import(format!(
                "'{}' is not an .xlsx file",
                self.path.display()
            )));
        }

        open_workbook(&self.path).map_err(|e| {
            NlFormulaError::Import(format!(
                "Failed to open Excel file '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> NlFormulaResult<Vec<String>> {
        Ok(self.open()?.sheet_names().to_vec())
    }

    /// Open the workbook and read its first sheet without interpreting headers
    ///
    /// Used to reject unreadable files as soon as they are picked.
    pub fn check_readable(&self) -> NlFormulaResult<()> {
        let mut workbook = self.open()?;
        let sheet = first_sheet_name(&workbook)?;
        workbook.worksheet_range(&sheet).map_err(|e| {
            NlFormulaError::Import(format!("Failed to read sheet '{}': {}", sheet, e))
        })?;
        tracing::info!(path = %self.path.display(), "workbook is readable");
        Ok(())
    }

    /// Import a worksheet, treating 0-based sheet row `header_row` as column titles
    ///
    /// Rows above the header are skipped. `sheet` selects a worksheet by
    /// name; the first worksheet is used when it is `None`.
    pub fn import(&self, header_row: usize, sheet: Option<&str>) -> NlFormulaResult<Table> {
        let mut workbook = self.open()?;
        let sheet_name = match sheet {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|s| s == name) {
                    return Err(NlFormulaError::Preview(format!(
                        "Sheet '{}' not found (available: {})",
                        name,
                        workbook.sheet_names().join(", ")
                    )));
                }
                name.to_string()
            }
            None => first_sheet_name(&workbook)?,
        };

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            NlFormulaError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

        let table = self.range_to_table(&sheet_name, &range, header_row)?;
        tracing::info!(
            path = %self.path.display(),
            sheet = %sheet_name,
            header_row,
            columns = table.columns.len(),
            rows = table.row_count(),
            "imported table"
        );
        Ok(table)
    }

    /// Build a table from absolute sheet positions so that `header_row`
    /// counts from the top of the sheet, not from the first used cell
    ///
    /// Data rows with no value in any column are skipped.
    fn range_to_table(
        &self,
        sheet_name: &str,
        range: &Range<Data>,
        header_row: usize,
    ) -> NlFormulaResult<Table> {
        let (last_row, last_col) = match range.end() {
            Some(end) if !range.is_empty() => end,
            _ => {
                return Err(NlFormulaError::Preview(format!(
                    "Sheet '{}' is empty",
                    sheet_name
                )))
            }
        };

        if header_row > last_row as usize {
            return Err(NlFormulaError::Preview(format!(
                "Header row {} is past the last row of sheet '{}' ({} rows)",
                header_row,
                sheet_name,
                last_row as usize + 1
            )));
        }

        let width = last_col as usize + 1;
        let header = header_row as u32;

        let raw_titles: Vec<String> = (0..width)
            .map(|col| header_title(range.get_value((header, col as u32)), col))
            .collect();
        let mut table = Table::new(sheet_name.to_string(), header_row, dedupe_titles(raw_titles));

        for row in (header + 1)..=last_row {
            let values = (0..width)
                .map(|col| {
                    range
                        .get_value((row, col as u32))
                        .map(data_to_cell_value)
                        .unwrap_or(CellValue::Empty)
                })
                .collect::<Vec<_>>();
            if values.iter().all(is_blank) {
                continue;
            }
            table.push_row(values);
        }

        Ok(table)
    }
}

fn is_blank(value: &CellValue) -> bool {
    match value {
        CellValue::Empty => true,
        CellValue::Text(s) => s.is_empty(),
        _ => false,
    }
}

fn first_sheet_name(workbook: &XlsxWorkbook) -> NlFormulaResult<String> {
    workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| NlFormulaError::Import("Workbook has no worksheets".to_string()))
}

/// Column title for a header cell; blank titles become `Unnamed: <index>`
fn header_title(cell: Option<&Data>, col: usize) -> String {
    match cell {
        None | Some(Data::Empty) => format!("Unnamed: {}", col),
        Some(Data::String(s)) if s.is_empty() => format!("Unnamed: {}", col),
        Some(Data::String(s)) => s.clone(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) => format_number(*f),
        Some(Data::Bool(b)) => (if *b { "True" } else { "False" }).to_string(),
        Some(other) => other.to_string(),
    }
}

/// Suffix repeated titles with `.1`, `.2`, … so every column is addressable
fn dedupe_titles(titles: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(titles.len());

    for title in titles {
        let mut name = title;
        let mut current = counts.get(&name).copied().unwrap_or(0);
        while current > 0 {
            counts.insert(name.clone(), current + 1);
            name = format!("{}.{}", name, current);
            current = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), current + 1);
        result.push(name);
    }

    result
}

/// Convert a calamine cell into a table value
fn data_to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        #[allow(unreachable_patterns)]
        other => CellValue::Text(other.to_string()),
    }
}
