//! Map instruction words onto the loaded table's column titles

use super::config::SynonymTable;
use super::similarity::ratio;
use crate::error::ResolveContext;

/// How many below-cutoff columns are offered as hints
const MAX_CANDIDATES: usize = 3;

pub struct ColumnResolver<'a> {
    columns: &'a [String],
    synonyms: &'a SynonymTable,
    cutoff: f64,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(columns: &'a [String], synonyms: &'a SynonymTable, cutoff: f64) -> Self {
        Self {
            columns,
            synonyms,
            cutoff,
        }
    }

    /// Resolve `word` to a column title
    ///
    /// The word is first replaced by its canonical key when the synonym table
    /// lists it, then compared against every column. The best-scoring column
    /// is accepted when its score reaches the cutoff; equal scores go to the
    /// lexicographically greater title.
    pub fn resolve(&self, word: &str) -> Result<String, ResolveContext> {
        let lookup = self.synonyms.canonicalize(word);

        let mut scored: Vec<(f64, &String)> = self
            .columns
            .iter()
            .map(|column| (ratio(column, lookup), column))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(a.1)));

        if let Some((score, column)) = scored.first() {
            if *score >= self.cutoff {
                tracing::debug!(word, lookup, column = %column, score, "resolved column");
                return Ok((*column).clone());
            }
        }

        tracing::debug!(word, lookup, "no column reached the cutoff");
        let candidates = scored
            .iter()
            .filter(|(score, _)| *score > 0.0)
            .take(MAX_CANDIDATES)
            .map(|(_, column)| (*column).clone())
            .collect();
        Err(ResolveContext::new(word)
            .with_available_columns(self.columns.to_vec())
            .with_candidates(candidates))
    }
}
