//! nlformula - Japanese filtering instructions → Excel formulas
//!
//! This library loads a worksheet at a header row, turns an instruction such
//! as 「売上が100以上かつ来店回数が5以上の人」 into `=AND(売上高>=100, 来店回数>=5)`,
//! and writes that formula into a copy of the workbook.
//!
//! # Features
//!
//! - Column matching by synonym table plus fuzzy similarity
//! - `<word>が<integer>以上` conditions joined by AND, or OR when
//!   「または」/「もしくは」 appears
//! - A1 cell reference codec
//! - Workbook copy with the formula in a column range (`*_with_formula.xlsx`)
//!
//! # Example
//!
//! ```no_run
//! use royalbit_nlformula::session::Session;
//! use royalbit_nlformula::translator::TranslatorConfig;
//! use std::path::Path;
//!
//! let mut session = Session::new(TranslatorConfig::default())?;
//! session.load_file(Path::new("customers.xlsx"))?;
//! session.preview("0")?;
//! session.convert("売上が100以上かつ来店回数が5以上の人", "D2", "")?;
//! let written = session.save(None)?;
//! println!("{}", written.display());
//! # Ok::<(), royalbit_nlformula::error::NlFormulaError>(())
//! ```

pub mod cli;
pub mod error;
pub mod excel;
#[cfg(feature = "gui")]
pub mod gui;
pub mod logging;
pub mod session;
pub mod translator;
pub mod types;

// Re-export commonly used types
pub use error::{NlFormulaError, NlFormulaResult, TranslateError};
pub use types::{CellValue, Combinator, Condition, ConditionSet, Formula, Table, WriteTarget};
