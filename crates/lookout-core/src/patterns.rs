//! Ignore patterns: plain substrings or compiled regular expressions.
//!
//! In config files a pattern is either a bare string (substring match) or a
//! table with a `regex` key:
//!
//! ```
//! use lookout_core::IgnorePattern;
//!
//! let plain: IgnorePattern = serde_json::from_str(r#""Script error""#).unwrap();
//! let regex: IgnorePattern = serde_json::from_str(r#"{"regex": "chrome-extension"}"#).unwrap();
//! assert!(plain.matches("Script error."));
//! assert!(regex.matches("chrome-extension://abc/script.js"));
//! ```

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::PatternError;

/// A single ignore rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PatternRepr", into = "PatternRepr")]
pub enum IgnorePattern {
    /// Matches when the haystack contains this text.
    Substring(String),
    /// Matches when the regex finds a match anywhere in the haystack.
    Regex(Regex),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PatternRepr {
    Text(String),
    Regex { regex: String },
}

impl IgnorePattern {
    /// Substring pattern.
    pub fn substring(text: impl Into<String>) -> Self {
        Self::Substring(text.into())
    }

    /// Compile a regex pattern.
    pub fn regex(pattern: &str) -> Result<Self, PatternError> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| PatternError::InvalidRegex {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn matches(&self, haystack: &str) -> bool {
        match self {
            Self::Substring(needle) => haystack.contains(needle.as_str()),
            Self::Regex(re) => re.is_match(haystack),
        }
    }

    /// The source text of the pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Substring(s) => s,
            Self::Regex(re) => re.as_str(),
        }
    }
}

/// True when any pattern in `patterns` matches `haystack`.
pub fn any_match(patterns: &[IgnorePattern], haystack: &str) -> bool {
    patterns.iter().any(|p| p.matches(haystack))
}

impl PartialEq for IgnorePattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Substring(a), Self::Substring(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for IgnorePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring(s) => write!(f, "{s:?}"),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl TryFrom<PatternRepr> for IgnorePattern {
    type Error = PatternError;

    fn try_from(repr: PatternRepr) -> Result<Self, Self::Error> {
        match repr {
            PatternRepr::Text(text) => Ok(Self::Substring(text)),
            PatternRepr::Regex { regex } => Self::regex(&regex),
        }
    }
}

impl From<IgnorePattern> for PatternRepr {
    fn from(pattern: IgnorePattern) -> Self {
        match pattern {
            IgnorePattern::Substring(text) => PatternRepr::Text(text),
            IgnorePattern::Regex(re) => PatternRepr::Regex {
                regex: re.as_str().to_string(),
            },
        }
    }
}

impl From<&str> for IgnorePattern {
    fn from(text: &str) -> Self {
        Self::substring(text)
    }
}
