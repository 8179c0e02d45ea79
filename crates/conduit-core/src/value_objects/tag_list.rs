//! Normalized list of tag names attached to an article

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::DomainError;

/// Separator used when the list is cached in a single text column
const COLUMN_SEPARATOR: char = ',';

/// Ordered, de-duplicated tag names.
///
/// Names are trimmed, empty names are dropped and later names that equal an
/// earlier one ignoring case are dropped, so the first spelling wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagList(Vec<String>);

impl TagList {
    /// Normalize raw tag input.
    ///
    /// # Errors
    /// Returns a validation error if a name contains the column separator.
    pub fn normalize<I, S>(raw: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for name in raw {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if name.contains(COLUMN_SEPARATOR) {
                return Err(DomainError::ValidationError(format!(
                    "Tag names cannot contain '{COLUMN_SEPARATOR}': {name}"
                )));
            }
            if seen.insert(name.to_lowercase()) {
                names.push(name.to_string());
            }
        }

        Ok(Self(names))
    }

    /// Rebuild the list from its cached column form
    pub fn from_column(value: &str) -> Self {
        Self(
            value
                .split(COLUMN_SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    /// Render the list for the cached column
    pub fn to_column(&self) -> String {
        self.0.join(&COLUMN_SEPARATOR.to_string())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
