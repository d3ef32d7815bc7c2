//! Excel import/export tests against real .xlsx files
//!
//! Fixtures are written with rust_xlsxwriter into a TempDir and read back
//! with calamine.

use calamine::{open_workbook, Data, Reader, Xlsx};
use pretty_assertions::assert_eq;
use royalbit_nlformula::error::NlFormulaError;
use royalbit_nlformula::excel::{CellReference, ExcelExporter, ExcelImporter, ExportOptions};
use royalbit_nlformula::types::{CellValue, Formula, WriteTarget};
use rust_xlsxwriter::{Format, Workbook};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CUSTOMERS: [(&str, f64, f64); 4] = [
    ("田中", 150.0, 6.0),
    ("佐藤", 80.0, 2.0),
    ("鈴木", 120.0, 3.0),
    ("高橋", 200.0, 8.0),
];

/// 顧客 sheet: header at row 0, four customers, one formula in E2; メモ sheet
fn write_customers(path: &Path) {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("顧客").unwrap();
    for (col, title) in ["氏名", "売上高", "来店回数"].iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }
    for (i, (name, sales, visits)) in CUSTOMERS.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *name).unwrap();
        sheet.write_number(row, 1, *sales).unwrap();
        sheet.write_number(row, 2, *visits).unwrap();
    }
    sheet.write_formula(1, 4, "=B2*2").unwrap();

    let notes = workbook.add_worksheet();
    notes.set_name("メモ").unwrap();
    notes.write_string(0, 0, "備考").unwrap();

    workbook.save(path).unwrap();
}

fn customers_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("customers.xlsx");
    write_customers(&path);
    path
}

fn and_formula() -> Formula {
    Formula::new("=AND(売上高>=100, 来店回数>=5)")
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_header_row_zero() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);

    let table = ExcelImporter::new(&path).import(0, None).unwrap();

    assert_eq!(table.sheet_name, "顧客");
    assert_eq!(table.header_row, 0);
    assert_eq!(&table.columns[..3], &["氏名", "売上高", "来店回数"]);
    assert!(table.columns[3..]
        .iter()
        .all(|title| title.starts_with("Unnamed: ")));
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.rows[0][0], CellValue::Text("田中".to_string()));
    assert_eq!(table.rows[0][1], CellValue::Number(150.0));
}

#[test]
fn test_import_header_row_offset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("titled.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "顧客一覧").unwrap();
    sheet.write_string(1, 0, "氏名").unwrap();
    sheet.write_string(1, 1, "売上高").unwrap();
    sheet.write_string(2, 0, "田中").unwrap();
    sheet.write_number(2, 1, 150.0).unwrap();
    workbook.save(&path).unwrap();

    let importer = ExcelImporter::new(&path);

    let at_title = importer.import(0, None).unwrap();
    assert_eq!(at_title.columns, vec!["顧客一覧", "Unnamed: 1"]);
    assert_eq!(at_title.row_count(), 2);

    let at_header = importer.import(1, None).unwrap();
    assert_eq!(at_header.columns, vec!["氏名", "売上高"]);
    assert_eq!(at_header.row_count(), 1);
    assert_eq!(at_header.rows[0][1].to_string(), "150");
}

#[test]
fn test_import_duplicate_and_numeric_titles() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dupes.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "売上").unwrap();
    sheet.write_string(0, 1, "売上").unwrap();
    sheet.write_number(0, 3, 2024.0).unwrap();
    sheet.write_number(1, 0, 1.0).unwrap();
    workbook.save(&path).unwrap();

    let table = ExcelImporter::new(&path).import(0, None).unwrap();
    assert_eq!(table.columns, vec!["売上", "売上.1", "Unnamed: 2", "2024"]);
}

#[test]
fn test_import_header_past_end() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);

    let err = ExcelImporter::new(&path).import(100, None).unwrap_err();
    assert!(matches!(err, NlFormulaError::Preview(_)));
}

#[test]
fn test_import_named_sheet() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);
    let importer = ExcelImporter::new(&path);

    assert_eq!(importer.sheet_names().unwrap(), vec!["顧客", "メモ"]);

    let notes = importer.import(0, Some("メモ")).unwrap();
    assert_eq!(notes.columns, vec!["備考"]);
    assert_eq!(notes.row_count(), 0);

    let err = importer.import(0, Some("売上")).unwrap_err();
    assert!(err.to_string().contains("顧客, メモ"));
}

#[test]
fn test_import_empty_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.xlsx");
    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    workbook.save(&path).unwrap();

    let importer = ExcelImporter::new(&path);
    assert!(importer.check_readable().is_ok());
    assert!(matches!(
        importer.import(0, None),
        Err(NlFormulaError::Preview(_))
    ));
}

#[test]
fn test_import_not_an_excel_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.xlsx");
    fs::write(&path, "just text").unwrap();

    let importer = ExcelImporter::new(&path);
    assert!(matches!(
        importer.check_readable(),
        Err(NlFormulaError::Import(_))
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

fn formula_at(path: &Path, sheet: &str, row: u32, col: u32) -> Option<String> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let formulas = workbook.worksheet_formula(sheet).unwrap();
    formulas
        .get_value((row, col))
        .filter(|f| !f.is_empty())
        .map(|f| f.trim_start_matches('=').to_string())
}

#[test]
fn test_export_writes_formula_range() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);
    let target = WriteTarget::new(CellReference::parse("D2").unwrap(), 3);

    let written = ExcelExporter::new(&path)
        .export(&and_formula(), &target, &ExportOptions::default())
        .unwrap();

    assert_eq!(written, dir.path().join("customers_with_formula.xlsx"));
    for row in 1..=3 {
        assert_eq!(
            formula_at(&written, "顧客", row, 3).as_deref(),
            Some("AND(売上高>=100, 来店回数>=5)")
        );
    }
    assert_eq!(formula_at(&written, "顧客", 4, 3), None);
}

#[test]
fn test_export_preserves_existing_content() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);
    let target = WriteTarget::new(CellReference::parse("D2").unwrap(), 4);

    let written = ExcelExporter::new(&path)
        .export(&and_formula(), &target, &ExportOptions::default())
        .unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&written).unwrap();
    assert_eq!(workbook.sheet_names().to_vec(), vec!["顧客", "メモ"]);

    let values = workbook.worksheet_range("顧客").unwrap();
    assert_eq!(
        values.get_value((0, 1)),
        Some(&Data::String("売上高".to_string()))
    );
    assert_eq!(
        values.get_value((4, 0)),
        Some(&Data::String("高橋".to_string()))
    );
    assert_eq!(values.get_value((3, 2)), Some(&Data::Float(3.0)));

    let notes = workbook.worksheet_range("メモ").unwrap();
    assert_eq!(
        notes.get_value((0, 0)),
        Some(&Data::String("備考".to_string()))
    );

    assert_eq!(formula_at(&written, "顧客", 1, 4).as_deref(), Some("B2*2"));
}

#[test]
fn test_export_leaves_source_untouched() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);
    let before = fs::read(&path).unwrap();

    let target = WriteTarget::new(CellReference::parse("A2").unwrap(), 4);
    ExcelExporter::new(&path)
        .export(&and_formula(), &target, &ExportOptions::default())
        .unwrap();

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_export_overwrites_target_cells() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);
    let target = WriteTarget::new(CellReference::parse("B2").unwrap(), 1);

    let written = ExcelExporter::new(&path)
        .export(&and_formula(), &target, &ExportOptions::default())
        .unwrap();

    assert_eq!(
        formula_at(&written, "顧客", 1, 1).as_deref(),
        Some("AND(売上高>=100, 来店回数>=5)")
    );
    assert_eq!(formula_at(&written, "顧客", 2, 1), None);
}

#[test]
fn test_export_to_named_sheet_and_output() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);
    let output = dir.path().join("out").with_extension("xlsx");
    let options = ExportOptions {
        sheet: Some("メモ".to_string()),
        output: Some(output.clone()),
    };
    let target = WriteTarget::new(CellReference::parse("B1").unwrap(), 2);

    let written = ExcelExporter::new(&path)
        .export(&and_formula(), &target, &options)
        .unwrap();

    assert_eq!(written, output);
    assert!(formula_at(&written, "メモ", 0, 1).is_some());
    assert!(formula_at(&written, "メモ", 1, 1).is_some());
    assert_eq!(formula_at(&written, "顧客", 0, 1), None);
}

#[test]
fn test_export_unknown_sheet() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);
    let options = ExportOptions {
        sheet: Some("存在しない".to_string()),
        output: None,
    };
    let target = WriteTarget::new(CellReference::parse("B1").unwrap(), 1);

    let err = ExcelExporter::new(&path)
        .export(&and_formula(), &target, &options)
        .unwrap_err();
    assert!(matches!(err, NlFormulaError::Export(_)));
    assert!(!dir.path().join("customers_with_formula.xlsx").exists());
}

#[test]
fn test_export_zero_rows_still_copies() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);
    let target = WriteTarget::new(CellReference::parse("D2").unwrap(), 0);

    let written = ExcelExporter::new(&path)
        .export(&and_formula(), &target, &ExportOptions::default())
        .unwrap();

    assert!(written.exists());
    assert_eq!(formula_at(&written, "顧客", 1, 3), None);
    assert_eq!(formula_at(&written, "顧客", 1, 4).as_deref(), Some("B2*2"));
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKBOOK COPY FIDELITY
// ═══════════════════════════════════════════════════════════════════════════

/// Data + Report sheets, `Sales` name, a `0.0%` cell, Report active
fn write_report_book(path: &Path) {
    let mut workbook = Workbook::new();
    let percent = Format::new().set_num_format("0.0%");

    let data = workbook.add_worksheet();
    data.set_name("Data").unwrap();
    data.write_string(0, 0, "売上高").unwrap();
    data.write_string(0, 1, "比率").unwrap();
    data.write_number(1, 0, 150.0).unwrap();
    data.write_number_with_format(1, 1, 0.125, &percent).unwrap();
    data.write_formula(1, 2, "=SUM(Sales)").unwrap();

    let report = workbook.add_worksheet();
    report.set_name("Report").unwrap();
    report.write_string(0, 0, "メモ").unwrap();
    report.write_number(1, 0, 1.0).unwrap();
    report.set_active(true);

    workbook.define_name("Sales", "=Data!$A$2").unwrap();
    workbook.save(path).unwrap();
}

type CellMap = BTreeMap<(u32, u32), String>;

/// Non-empty values and formulas of one sheet by absolute (row, col)
fn sheet_contents(path: &Path, sheet: &str) -> (CellMap, CellMap) {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let values = workbook.worksheet_range(sheet).unwrap();
    let formulas = workbook.worksheet_formula(sheet).unwrap();

    let (vr, vc) = values.start().unwrap_or((0, 0));
    let value_map = values
        .cells()
        .filter(|(_, _, v)| !matches!(v, Data::Empty))
        .map(|(r, c, v)| ((vr + r as u32, vc + c as u32), v.to_string()))
        .collect();

    let (fr, fc) = formulas.start().unwrap_or((0, 0));
    let formula_map = formulas
        .cells()
        .filter(|(_, _, f)| !f.is_empty())
        .map(|(r, c, f)| {
            (
                (fr + r as u32, fc + c as u32),
                f.trim_start_matches('=').to_string(),
            )
        })
        .collect();

    (value_map, formula_map)
}

#[test]
fn test_export_targets_active_sheet_and_keeps_workbook_parts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.xlsx");
    write_report_book(&path);

    let target = WriteTarget::new(CellReference::parse("D2").unwrap(), 2);
    let written = ExcelExporter::new(&path)
        .export(&and_formula(), &target, &ExportOptions::default())
        .unwrap();

    // Formula lands on the active sheet only
    assert_eq!(
        formula_at(&written, "Report", 1, 3).as_deref(),
        Some("AND(売上高>=100, 来店回数>=5)")
    );
    assert_eq!(
        formula_at(&written, "Report", 2, 3).as_deref(),
        Some("AND(売上高>=100, 来店回数>=5)")
    );
    assert_eq!(formula_at(&written, "Data", 1, 3), None);

    // Defined names survive
    let copy: Xlsx<_> = open_workbook(&written).unwrap();
    let names = copy.defined_names().to_vec();
    assert!(
        names
            .iter()
            .any(|(name, formula)| name == "Sales" && formula.contains("Data!$A$2")),
        "defined names: {:?}",
        names
    );

    // Number formats survive
    let book = umya_spreadsheet::reader::xlsx::read(&written).unwrap();
    let format_code = book
        .get_sheet_by_name("Data")
        .and_then(|sheet| sheet.get_cell((2, 2)))
        .and_then(|cell| {
            cell.get_style()
                .get_number_format()
                .map(|nf| nf.get_format_code().to_string())
        });
    assert_eq!(format_code.as_deref(), Some("0.0%"));
}

#[test]
fn test_export_changes_no_other_cells() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.xlsx");
    write_report_book(&path);

    let target = WriteTarget::new(CellReference::parse("D2").unwrap(), 2);
    let written = ExcelExporter::new(&path)
        .export(&and_formula(), &target, &ExportOptions::default())
        .unwrap();
    let targets = [(1, 3), (2, 3)];

    for sheet in ["Data", "Report"] {
        let (source_values, source_formulas) = sheet_contents(&path, sheet);
        let (copy_values, mut copy_formulas) = sheet_contents(&written, sheet);

        if sheet == "Report" {
            for cell in targets {
                assert!(copy_formulas.remove(&cell).is_some(), "{:?}", cell);
            }
        }
        assert_eq!(copy_formulas, source_formulas, "formulas of {}", sheet);

        // Cached results of formula cells may be refreshed; plain values may not
        let plain = |values: &CellMap, formulas: &CellMap| -> CellMap {
            values
                .iter()
                .filter(|(cell, _)| !formulas.contains_key(cell) && !targets.contains(cell))
                .map(|(cell, v)| (*cell, v.clone()))
                .collect()
        };
        assert_eq!(
            plain(&copy_values, &source_formulas),
            plain(&source_values, &source_formulas),
            "values of {}",
            sheet
        );
    }
}

#[test]
fn test_import_skips_blank_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gaps.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "氏名").unwrap();
    sheet.write_string(0, 1, "売上高").unwrap();
    sheet.write_string(1, 0, "田中").unwrap();
    sheet.write_number(3, 1, 80.0).unwrap();
    sheet.write_string(5, 0, "鈴木").unwrap();
    workbook.save(&path).unwrap();

    let table = ExcelImporter::new(&path).import(0, None).unwrap();
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows[1][1], CellValue::Number(80.0));
    assert_eq!(table.rows[2][0], CellValue::Text("鈴木".to_string()));
}

#[test]
fn test_only_xlsx_files_are_accepted() {
    let dir = TempDir::new().unwrap();
    let path = customers_file(&dir);
    let macro_book = dir.path().join("customers.xlsm");
    fs::copy(&path, &macro_book).unwrap();

    let err = ExcelImporter::new(&macro_book).check_readable().unwrap_err();
    assert!(matches!(err, NlFormulaError::Import(_)));
}
