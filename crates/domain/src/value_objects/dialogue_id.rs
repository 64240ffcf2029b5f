//! Identifier of a conversation or dialogue line in the corpus
//!
//! Corpus files written by hand use both numbers and strings as ids, so both
//! are accepted and written back in their original form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric or textual corpus identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DialogueId {
    /// Numeric id (`"id": 3`)
    Number(u64),
    /// Textual id (`"id": "intro"`)
    Text(String),
}

impl fmt::Display for DialogueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for DialogueId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for DialogueId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
