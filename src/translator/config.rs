//! Translator configuration: synonym table, fuzzy cutoff and connectives
//!
//! Loaded from YAML, e.g.
//!
//! ```yaml
//! synonyms:
//!   - canonical: 売上
//!     synonyms: [売上, 売上高, 収入]
//! cutoff: 0.6
//! and_keywords: [かつ, 且つ, そして]
//! or_keywords: [または, もしくは]
//! ```
//!
//! Every field is optional and falls back to the built-in value.

use crate::error::{NlFormulaError, NlFormulaResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is not given
pub const CONFIG_ENV_VAR: &str = "NLFORMULA_CONFIG";

/// Default minimum similarity for a fuzzy column match
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// One canonical column concept and the words users type for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymEntry {
    pub canonical: String,
    pub synonyms: Vec<String>,
}

impl SynonymEntry {
    pub fn new(canonical: &str, synonyms: &[&str]) -> Self {
        Self {
            canonical: canonical.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Ordered synonym table; the first entry listing a word wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymTable(Vec<SynonymEntry>);

impl SynonymTable {
    pub fn new(entries: Vec<SynonymEntry>) -> Self {
        Self(entries)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn entries(&self) -> &[SynonymEntry] {
        &self.0
    }

    pub fn push(&mut self, entry: SynonymEntry) {
        self.0.push(entry);
    }

    /// Replace `word` with its canonical key when it is a listed synonym
    pub fn canonicalize<'a>(&'a self, word: &'a str) -> &'a str {
        self.0
            .iter()
            .find(|entry| entry.synonyms.iter().any(|s| s == word))
            .map(|entry| entry.canonical.as_str())
            .unwrap_or(word)
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self(vec![
            SynonymEntry::new("名前", &["氏名", "名前", "顧客名"]),
            SynonymEntry::new("売上", &["売上", "売上高", "収入"]),
            SynonymEntry::new("来店回数", &["来店回数", "訪問回数", "回数"]),
        ])
    }
}

fn default_cutoff() -> f64 {
    DEFAULT_CUTOFF
}

fn default_and_keywords() -> Vec<String> {
    vec!["かつ".to_string(), "且つ".to_string(), "そして".to_string()]
}

fn default_or_keywords() -> Vec<String> {
    vec!["または".to_string(), "もしくは".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub synonyms: SynonymTable,

    /// Minimum similarity (inclusive) for a fuzzy column match
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,

    /// Words joining conditions that must all hold
    #[serde(default = "default_and_keywords")]
    pub and_keywords: Vec<String>,

    /// Words that, anywhere in the instruction, switch the formula to OR
    #[serde(default = "default_or_keywords")]
    pub or_keywords: Vec<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            synonyms: SynonymTable::default(),
            cutoff: DEFAULT_CUTOFF,
            and_keywords: default_and_keywords(),
            or_keywords: default_or_keywords(),
        }
    }
}

impl TranslatorConfig {
    /// Parse and validate YAML config text
    pub fn from_yaml_str(content: &str) -> NlFormulaResult<Self> {
        let config: TranslatorConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn load(path: &Path) -> NlFormulaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NlFormulaError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            entries = config.synonyms.entries().len(),
            "loaded translator config"
        );
        Ok(config)
    }

    /// Config from an explicit path, else `$NLFORMULA_CONFIG`, else built-ins
    pub fn resolve(explicit: Option<&Path>) -> NlFormulaResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(value) if !value.is_empty() => Self::load(&PathBuf::from(value)),
            _ => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> NlFormulaResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> NlFormulaResult<()> {
        if !(0.0..=1.0).contains(&self.cutoff) {
            return Err(NlFormulaError::Config(format!(
                "cutoff must be between 0 and 1, got {}",
                self.cutoff
            )));
        }
        for keyword in self.and_keywords.iter().chain(&self.or_keywords) {
            if keyword.is_empty() {
                return Err(NlFormulaError::Config(
                    "connective keywords must not be empty".to_string(),
                ));
            }
        }
        for entry in self.synonyms.entries() {
            if entry.canonical.is_empty() {
                return Err(NlFormulaError::Config(
                    "synonym entries need a canonical name".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonicalize_synonym() {
        let table = SynonymTable::default();
        assert_eq!(table.canonicalize("売上高"), "売上");
        assert_eq!(table.canonicalize("氏名"), "名前");
        assert_eq!(table.canonicalize("回数"), "来店回数");
    }

    #[test]
    fn test_canonicalize_unknown_word_unchanged() {
        let table = SynonymTable::default();
        assert_eq!(table.canonicalize("在庫"), "在庫");
    }

    #[test]
    fn test_first_entry_wins() {
        let table = SynonymTable::new(vec![
            SynonymEntry::new("A", &["x"]),
            SynonymEntry::new("B", &["x"]),
        ]);
        assert_eq!(table.canonicalize("x"), "A");
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = TranslatorConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, TranslatorConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
synonyms:
  - canonical: 在庫
    synonyms: [在庫, 在庫数]
cutoff: 0.8
"#;
        let config = TranslatorConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.synonyms.entries().len(), 1);
        assert_eq!(config.synonyms.canonicalize("在庫数"), "在庫");
        assert_eq!(config.cutoff, 0.8);
        assert_eq!(config.or_keywords, vec!["または", "もしくは"]);
    }

    #[test]
    fn test_rejects_cutoff_out_of_range() {
        assert!(TranslatorConfig::from_yaml_str("cutoff: 1.5").is_err());
    }

    #[test]
    fn test_rejects_unknown_field() {
        assert!(TranslatorConfig::from_yaml_str("cutof: 0.5").is_err());
    }

    #[test]
    fn test_rejects_empty_keyword() {
        assert!(TranslatorConfig::from_yaml_str("or_keywords: ['']").is_err());
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let config = TranslatorConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(TranslatorConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
