//! Natural-language (Japanese) instruction → Excel boolean formula
//!
//! - `config`: synonym table, fuzzy cutoff and connective keywords
//! - `similarity`: gestalt string similarity used for fuzzy column matching
//! - `resolver`: instruction word → column title
//! - `parser`: `<word>が<integer>以上` conditions → `=AND(...)` / `=OR(...)`

pub mod config;
mod parser;
mod resolver;
pub mod similarity;

pub use config::{SynonymEntry, SynonymTable, TranslatorConfig};
pub use parser::{FormulaTranslator, RawCondition};
pub use resolver::ColumnResolver;
