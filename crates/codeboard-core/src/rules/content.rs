//! Content rules - what a postable code looks like
//!
//! A post must contain a code of the form `AB1234 word:/TOKEN`: two uppercase
//! letters, four digits, whitespace, an alphanumeric word, `:/`, then
//! uppercase letters or digits. The matched sub-string is the core code used
//! for duplicate detection.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::error::DomainError;

static CORE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z]{2}[0-9]{4}\s[a-zA-Z0-9]+:/[A-Z0-9]+").expect("core code pattern")
});

static CORE_CODE_ANCHORED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}[0-9]{4}\s[a-zA-Z0-9]+:/[A-Z0-9]+$").expect("anchored core code pattern")
});

/// How strictly content must match the code pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The pattern may appear anywhere in the content
    #[default]
    Contains,
    /// The whole trimmed content must be exactly one code
    Full,
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contains" | "loose" => Ok(Self::Contains),
            "full" | "strict" => Ok(Self::Full),
            other => Err(format!("unknown match mode '{other}'")),
        }
    }
}

/// Validation applied to post content before it reaches the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRules {
    pub max_chars: usize,
    pub mode: MatchMode,
}

impl Default for ContentRules {
    fn default() -> Self {
        Self {
            max_chars: 50,
            mode: MatchMode::Contains,
        }
    }
}

impl ContentRules {
    /// Validate content and extract its core code
    ///
    /// Length is checked first, then the pattern.
    pub fn extract_core_code(&self, content: &str) -> Result<String, DomainError> {
        if content.chars().count() > self.max_chars {
            return Err(DomainError::ContentTooLong {
                max: self.max_chars,
            });
        }

        let found = match self.mode {
            MatchMode::Contains => CORE_CODE.find(content),
            MatchMode::Full => CORE_CODE_ANCHORED.find(content.trim()),
        };

        found
            .map(|m| m.as_str().to_string())
            .ok_or(DomainError::BadFormat)
    }
}
