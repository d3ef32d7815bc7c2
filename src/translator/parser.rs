//! Instruction → conditions → formula

use super::config::TranslatorConfig;
use super::resolver::ColumnResolver;
use crate::error::{NlFormulaError, NlFormulaResult, TranslateError};
use crate::types::{Combinator, Condition, ConditionSet, Formula, Table};
use regex::Regex;

/// Text that closes one condition; a connective may follow it
const CONDITION_END: &str = "以上";

/// `<word>が<integer>以上` as found in the instruction, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCondition {
    pub word: String,
    /// ASCII digits of the threshold
    pub digits: String,
}

/// Translates Japanese filtering instructions into AND/OR formulas
pub struct FormulaTranslator {
    config: TranslatorConfig,
    condition_pattern: Regex,
    /// And/or keywords, longest first
    connectives: Vec<String>,
}

impl FormulaTranslator {
    pub fn new(config: TranslatorConfig) -> NlFormulaResult<Self> {
        config.validate()?;

        let condition_pattern = Regex::new(r"(\w+?)が([0-9０-９]+)以上")
            .map_err(|e| NlFormulaError::Config(format!("Regex error: {}", e)))?;

        let mut connectives: Vec<String> = config
            .and_keywords
            .iter()
            .chain(&config.or_keywords)
            .cloned()
            .collect();
        connectives.sort_by_key(|k| std::cmp::Reverse(k.chars().count()));

        Ok(Self {
            config,
            condition_pattern,
            connectives,
        })
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// All `<word>が<integer>以上` occurrences, in order
    ///
    /// A word captured right after an earlier `以上` (punctuation in between
    /// allowed) starts with the connective joining the two conditions; that
    /// connective is dropped. Words elsewhere are kept whole, so a column
    /// such as `かつお数` at the start of a clause survives.
    pub fn extract_conditions(&self, instruction: &str) -> Vec<RawCondition> {
        self.condition_pattern
            .captures_iter(instruction)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let before = instruction[..whole.start()]
                    .trim_end_matches(|c: char| !(c.is_alphanumeric() || c == '_'));
                let word = &captures[1];
                let word = if before.ends_with(CONDITION_END) {
                    self.strip_connective(word)
                } else {
                    word
                };
                Some(RawCondition {
                    word: word.to_string(),
                    digits: to_ascii_digits(&captures[2]),
                })
            })
            .collect()
    }

    fn strip_connective<'a>(&self, word: &'a str) -> &'a str {
        self.connectives
            .iter()
            .find_map(|keyword| {
                word.strip_prefix(keyword.as_str())
                    .filter(|rest| !rest.is_empty())
            })
            .unwrap_or(word)
    }

    /// `Any` when a disjunction keyword appears anywhere in the instruction
    ///
    /// A single combinator applies to the whole instruction; mixing
    /// `かつ` and `または` does not group conditions.
    pub fn combinator(&self, instruction: &str) -> Combinator {
        if self
            .config
            .or_keywords
            .iter()
            .any(|keyword| instruction.contains(keyword.as_str()))
        {
            Combinator::Any
        } else {
            Combinator::All
        }
    }

    /// Parse an instruction against known column titles
    pub fn parse(
        &self,
        columns: &[String],
        instruction: &str,
    ) -> Result<ConditionSet, TranslateError> {
        let resolver = ColumnResolver::new(columns, &self.config.synonyms, self.config.cutoff);

        let mut conditions = Vec::new();
        for raw in self.extract_conditions(instruction) {
            let column = resolver
                .resolve(&raw.word)
                .map_err(TranslateError::UnresolvedColumn)?;
            conditions.push(Condition::new(column, raw.digits));
        }

        if conditions.is_empty() {
            return Err(TranslateError::NotRecognized);
        }

        Ok(ConditionSet::new(self.combinator(instruction), conditions))
    }

    /// Formula for `instruction` against column titles
    pub fn translate(
        &self,
        columns: &[String],
        instruction: &str,
    ) -> Result<Formula, TranslateError> {
        let formula = self.parse(columns, instruction)?.to_formula();
        tracing::debug!(instruction, formula = %formula, "generated formula");
        Ok(formula)
    }

    /// Formula for `instruction` against a loaded table, if any
    pub fn generate(
        &self,
        table: Option<&Table>,
        instruction: &str,
    ) -> Result<Formula, TranslateError> {
        let table = table.ok_or(TranslateError::NotReady)?;
        self.translate(table.column_names(), instruction)
    }
}

/// Map full-width digits to ASCII, leaving ASCII digits as they are
fn to_ascii_digits(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            other => other,
        })
        .collect()
}
