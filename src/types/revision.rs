// ABOUTME: Validated git revision (commit hash) of the tracked tree.
// ABOUTME: Supplies the full hash for artifact names and a short form for display.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Number of characters shown when a revision is printed for humans.
pub const DISPLAY_LENGTH: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevisionError {
    #[error("revision cannot be empty")]
    Empty,

    #[error("revision must be at least {DISPLAY_LENGTH} characters, got {0}")]
    TooShort(usize),

    #[error("invalid character in revision: '{0}'")]
    InvalidChar(char),
}

/// A full commit hash, lowercase hexadecimal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Revision(String);

impl Revision {
    /// Parse a revision, trimming surrounding whitespace as printed by `git rev-parse`.
    pub fn parse(value: &str) -> Result<Self, RevisionError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(RevisionError::Empty);
        }

        if let Some(c) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(RevisionError::InvalidChar(c));
        }

        if value.len() < DISPLAY_LENGTH {
            return Err(RevisionError::TooShort(value.len()));
        }

        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for progress output only.
    pub fn short(&self) -> &str {
        &self.0[..DISPLAY_LENGTH]
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "abc123def4567890abc123def4567890abc123de";

    #[test]
    fn parses_rev_parse_output() {
        let rev = Revision::parse(&format!("{HASH}\n")).unwrap();
        assert_eq!(rev.as_str(), HASH);
    }

    #[test]
    fn short_is_first_eight_characters() {
        let rev = Revision::parse(HASH).unwrap();
        assert_eq!(rev.short(), "abc123de");
    }

    #[test]
    fn uppercase_is_normalized() {
        let rev = Revision::parse("ABCDEF0123456789").unwrap();
        assert_eq!(rev.as_str(), "abcdef0123456789");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Revision::parse("  \n"), Err(RevisionError::Empty));
    }

    #[test]
    fn rejects_non_hex() {
        assert_eq!(
            Revision::parse("fatal: not a git repository"),
            Err(RevisionError::InvalidChar('t'))
        );
    }

    #[test]
    fn rejects_short_hashes() {
        assert_eq!(Revision::parse("abc12"), Err(RevisionError::TooShort(5)));
    }
}
