//! User-editable keyword lists.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::normalize;

/// Ordered list of free-text keywords.
///
/// Duplicates are rejected on insertion; matching always goes through
/// [`normalize`], so entries keep the spelling the user typed. Lists read
/// from configuration go through the same checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `keyword` unless it is already present.
    ///
    /// Returns `Ok(false)` for a duplicate and an error for blank input.
    pub fn insert(&mut self, keyword: impl Into<String>) -> Result<bool> {
        let keyword = keyword.into();
        if keyword.trim().is_empty() {
            return Err(AppError::validation("keyword must not be empty"));
        }
        if self.0.contains(&keyword) {
            return Ok(false);
        }
        self.0.push(keyword);
        Ok(true)
    }

    /// Remove `keyword`, returning whether it was present.
    pub fn remove(&mut self, keyword: &str) -> bool {
        match self.0.iter().position(|k| k == keyword) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All keywords in normalized form, in insertion order.
    pub fn normalized(&self) -> Vec<String> {
        self.0.iter().map(|k| normalize(k)).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for keyword in iter {
            let keyword = keyword.into();
            match set.insert(keyword.clone()) {
                Ok(true) => {}
                Ok(false) => log::warn!("Skipping duplicate keyword '{}'", keyword),
                Err(e) => log::warn!("Skipping keyword {:?}: {}", keyword, e),
            }
        }
        set
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(keywords: Vec<String>) -> Self {
        keywords.into_iter().collect()
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.0
    }
}
