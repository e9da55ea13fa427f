// src/services/filter.rs

//! Include/exclude keyword matching over normalized text.

use regex::Regex;

use crate::error::Result;
use crate::models::KeywordSet;
use crate::utils::normalize;

/// How include keywords are matched against a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Keyword anywhere in the text
    Substring,
    /// Keyword bounded by non-word characters
    WholeWord,
}

/// Compiled include/exclude keyword lists.
///
/// Exclusion is always substring-based and always wins.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    include_words: Vec<Regex>,
}

impl KeywordFilter {
    /// Normalize both lists and compile the whole-word patterns.
    pub fn new(include: &KeywordSet, exclude: &KeywordSet) -> Result<Self> {
        let include = non_empty(include.normalized());
        let exclude = non_empty(exclude.normalized());
        let include_words = include
            .iter()
            .map(|kw| Regex::new(&format!(r"\b{}\b", regex::escape(kw))))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            include,
            exclude,
            include_words,
        })
    }

    /// Check already-normalized text.
    pub fn matches(&self, normalized: &str, mode: MatchMode) -> bool {
        let included = match mode {
            MatchMode::Substring => self.include.iter().any(|kw| normalized.contains(kw.as_str())),
            MatchMode::WholeWord => self.include_words.iter().any(|re| re.is_match(normalized)),
        };
        included && !self.is_excluded(normalized)
    }

    /// Normalize `text` and check it.
    pub fn matches_text(&self, text: &str, mode: MatchMode) -> bool {
        self.matches(&normalize(text), mode)
    }

    /// Whether any exclude keyword occurs in the normalized text.
    pub fn is_excluded(&self, normalized: &str) -> bool {
        self.exclude.iter().any(|kw| normalized.contains(kw.as_str()))
    }
}

fn non_empty(keywords: Vec<String>) -> Vec<String> {
    keywords.into_iter().filter(|k| !k.trim().is_empty()).collect()
}
