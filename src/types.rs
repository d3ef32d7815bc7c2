use crate::excel::CellReference;
use serde::Serialize;
use std::fmt;

//==============================================================================
// Loaded Table
//==============================================================================

/// A single cell value read from a worksheet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    /// Excel serial date/time
    DateTime(f64),
    /// Error literal such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::DateTime(serial) => write!(f, "{}", format_number(*serial)),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Format a number for display, dropping a trailing `.0` on whole numbers
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A worksheet loaded at a header offset: ordered column titles plus data rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub sheet_name: String,
    /// 0-based sheet row holding the column titles
    pub header_row: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(sheet_name: String, header_row: usize, columns: Vec<String>) -> Self {
        Self {
            sheet_name,
            header_row,
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a data row, padding or truncating it to the column count
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The first `n` data rows
    pub fn head(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..n.min(self.rows.len())]
    }
}

//==============================================================================
// Conditions and Formulas
//==============================================================================

/// Comparison token placed between column and threshold
pub const GREATER_OR_EQUAL: &str = ">=";

/// `<column> >= <threshold>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    /// ASCII digits exactly as typed (leading zeros kept)
    pub threshold: String,
}

impl Condition {
    pub fn new(column: impl Into<String>, threshold: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            threshold: threshold.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column, GREATER_OR_EQUAL, self.threshold)
    }
}

/// How all conditions of an instruction are united
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Every condition must hold (`AND`)
    All,
    /// At least one condition must hold (`OR`)
    Any,
}

impl Combinator {
    pub fn function_name(self) -> &'static str {
        match self {
            Combinator::All => "AND",
            Combinator::Any => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSet {
    pub combinator: Combinator,
    pub conditions: Vec<Condition>,
}

impl ConditionSet {
    pub fn new(combinator: Combinator, conditions: Vec<Condition>) -> Self {
        Self {
            combinator,
            conditions,
        }
    }

    /// Render as `=AND(a>=1, b>=2)` / `=OR(...)`
    pub fn to_formula(&self) -> Formula {
        let parts: Vec<String> = self.conditions.iter().map(|c| c.to_string()).collect();
        Formula(format!(
            "={}({})",
            self.combinator.function_name(),
            parts.join(", ")
        ))
    }
}

/// Spreadsheet formula text, always starting with `=`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Formula(String);

impl Formula {
    /// Wrap user-supplied formula text, adding the leading `=` if missing
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.starts_with('=') {
            Formula(text)
        } else {
            Formula(format!("={}", text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//==============================================================================
// Write Target
//==============================================================================

/// Where a formula is written: a start cell and how many rows below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTarget {
    pub start: CellReference,
    pub row_count: u32,
}

impl WriteTarget {
    pub fn new(start: CellReference, row_count: u32) -> Self {
        Self { start, row_count }
    }

    /// 1-based (column, row) of every cell the formula goes into
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.row_count).map(move |i| (self.start.column, self.start.row + i))
    }
}
