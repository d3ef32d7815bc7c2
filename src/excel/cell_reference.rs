//! A1-style cell references (column letters + row number)

use crate::error::{NlFormulaError, NlFormulaResult};
use regex::Regex;
use std::fmt;

/// Last column Excel can address (`XFD`)
pub const MAX_COLUMN: u32 = 16_384;

/// Last row Excel can address
pub const MAX_ROW: u32 = 1_048_576;

/// A cell reference with 1-based column and row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellReference {
    pub column: u32,
    pub row: u32,
}

impl CellReference {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Decode a reference matching `[A-Z]+[0-9]+` exactly
    ///
    /// Examples:
    /// - `A1` → (1, 1)
    /// - `C2` → (3, 2)
    /// - `AA10` → (27, 10)
    pub fn parse(reference: &str) -> NlFormulaResult<Self> {
        let pattern = Regex::new(r"^([A-Z]+)([0-9]+)$")
            .map_err(|e| NlFormulaError::Validation(format!("Regex error: {}", e)))?;

        let captures = pattern.captures(reference).ok_or_else(|| {
            NlFormulaError::Validation(format!(
                "開始セルは例のように入力してください（例：C2）。 ('{}')",
                reference
            ))
        })?;

        let letters = &captures[1];
        let digits = &captures[2];

        if digits.starts_with('0') {
            return Err(NlFormulaError::Validation(format!(
                "Row number in '{}' must start at 1 without leading zeros",
                reference
            )));
        }

        let column = column_letters_to_index(letters)?;
        let row: u32 = digits.parse().map_err(|_| {
            NlFormulaError::Validation(format!("Row number in '{}' is too large", reference))
        })?;

        Ok(Self { column, row })
    }

    /// Parse text typed by a user: surrounding whitespace is trimmed and
    /// letters are uppercased before decoding, and the cell must lie on the
    /// Excel grid.
    pub fn from_user_input(input: &str) -> NlFormulaResult<Self> {
        let normalized = input.trim().to_uppercase();
        let reference = Self::parse(&normalized)?;
        reference.ensure_in_grid()?;
        Ok(reference)
    }

    /// Fail when the cell lies outside Excel's sheet dimensions
    pub fn ensure_in_grid(&self) -> NlFormulaResult<()> {
        if self.column == 0 || self.row == 0 {
            return Err(NlFormulaError::Validation(
                "Cell columns and rows start at 1".to_string(),
            ));
        }
        if self.column > MAX_COLUMN {
            return Err(NlFormulaError::Validation(format!(
                "Column {} is beyond the last Excel column XFD",
                column_index_to_letters(self.column)
            )));
        }
        if self.row > MAX_ROW {
            return Err(NlFormulaError::Validation(format!(
                "Row {} is beyond the last Excel row {}",
                self.row, MAX_ROW
            )));
        }
        Ok(())
    }

    /// Column letters of this reference (`3` → `C`)
    pub fn column_letters(&self) -> String {
        column_index_to_letters(self.column)
    }

    /// 0-based (row, column) as used by the xlsx writer and reader APIs
    pub fn zero_based(&self) -> (u32, u32) {
        (self.row.saturating_sub(1), self.column.saturating_sub(1))
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row)
    }
}

/// Decode column letters as a bijective base-26 numeral (A=1 … Z=26, AA=27)
pub fn column_letters_to_index(letters: &str) -> NlFormulaResult<u32> {
    if letters.is_empty() {
        return Err(NlFormulaError::Validation(
            "Column letters must not be empty".to_string(),
        ));
    }

    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_uppercase() {
            return Err(NlFormulaError::Validation(format!(
                "Invalid column letter '{}' in '{}'",
                ch, letters
            )));
        }
        let digit = ch as u32 - 'A' as u32 + 1;
        index = index
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| {
                NlFormulaError::Validation(format!("Column '{}' is too large", letters))
            })?;
    }

    Ok(index)
}

/// Encode a 1-based column index as letters (1 → A, 26 → Z, 27 → AA)
///
/// Index 0 has no letter form and yields an empty string.
pub fn column_index_to_letters(index: u32) -> String {
    let mut result = String::new();
    let mut n = index;

    while n > 0 {
        let remainder = (n - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }

    result
}
