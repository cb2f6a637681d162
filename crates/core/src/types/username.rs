//! Store-owner username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// The input string is empty (after trimming).
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace.
    #[error("username cannot contain whitespace")]
    ContainsWhitespace,
}

/// A store owner's login username.
///
/// The backend treats usernames as opaque lookup keys; this type only
/// enforces the structure the login form enforces - trimmed, non-empty, no
/// interior whitespace, bounded length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Username` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`], or contains whitespace.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(UsernameError::ContainsWhitespace);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let username = Username::parse("cakebydee").expect("parse");
        assert_eq!(username.as_str(), "cakebydee");
    }

    #[test]
    fn test_parse_trims() {
        let username = Username::parse("  cakebydee  ").expect("parse");
        assert_eq!(username.as_str(), "cakebydee");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(Username::parse("").expect_err("empty"), UsernameError::Empty);
        assert_eq!(
            Username::parse("   ").expect_err("blank"),
            UsernameError::Empty
        );
    }

    #[test]
    fn test_parse_rejects_interior_whitespace() {
        assert_eq!(
            Username::parse("cake by dee").expect_err("whitespace"),
            UsernameError::ContainsWhitespace
        );
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "a".repeat(Username::MAX_LENGTH + 1);
        assert_eq!(
            Username::parse(&long).expect_err("too long"),
            UsernameError::TooLong {
                max: Username::MAX_LENGTH
            }
        );
    }
}
