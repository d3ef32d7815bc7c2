use thiserror::Error;

pub type NlFormulaResult<T> = Result<T, NlFormulaError>;

/// Fixed message shown when no table has been loaded yet
pub const NOT_READY_MESSAGE: &str = "Excelファイルを読み込み、ヘッダー行を設定してください。";

/// Fixed message shown when the instruction holds no recognizable condition
pub const NOT_RECOGNIZED_MESSAGE: &str = "条件が認識できませんでした。";

/// Context for an instruction word that matched no column
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveContext {
    /// The word exactly as it appeared in the instruction
    pub word: String,
    /// Column titles of the loaded table
    pub available_columns: Vec<String>,
    /// Nearest column titles that scored below the cutoff, best first
    pub candidates: Vec<String>,
}

impl ResolveContext {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            available_columns: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn with_available_columns(mut self, columns: Vec<String>) -> Self {
        self.available_columns = columns;
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Hint lines for the user, empty when there is nothing useful to add
    pub fn format_hint(&self) -> String {
        let mut lines = Vec::new();
        if !self.candidates.is_empty() {
            lines.push(format!("Did you mean: {}", self.candidates.join(", ")));
        }
        // Long header rows are noise in a one-line hint
        if !self.available_columns.is_empty() && self.available_columns.len() <= 10 {
            lines.push(format!(
                "Available columns: {}",
                self.available_columns.join(", ")
            ));
        }
        lines.join("\n")
    }
}

/// Outcomes of translating an instruction that did not produce a formula
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("{}", NOT_READY_MESSAGE)]
    NotReady,

    #[error("{}", NOT_RECOGNIZED_MESSAGE)]
    NotRecognized,

    #[error("列「{}」が見つかりません。Excelのヘッダーを確認してください。", .0.word)]
    UnresolvedColumn(ResolveContext),
}

#[derive(Error, Debug)]
pub enum NlFormulaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel import error: {0}")]
    Import(String),

    #[error("Preview error: {0}")]
    Preview(String),

    #[error("{0}")]
    Translate(#[from] TranslateError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Excel export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
