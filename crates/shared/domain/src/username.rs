//! Username value object.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH, USERNAME_PATTERN};
use crate::error::{DomainError, DomainResult};

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(USERNAME_PATTERN).expect("username pattern is a valid regex"));

/// A username that satisfies the length and character-set rules.
///
/// The only way to obtain one is [`Username::parse`], so holding a `Username`
/// means the value has already been validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and wrap a raw username.
    ///
    /// Surrounding whitespace is not trimmed: `" alice"` is rejected rather
    /// than silently stored as `"alice"`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw.trim().is_empty() {
            return Err(DomainError::validation("Username must not be blank"));
        }

        let length = raw.chars().count();
        if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
            return Err(DomainError::validation(format!(
                "Username must be between {} and {} characters",
                MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
            )));
        }

        if !USERNAME_REGEX.is_match(raw) {
            return Err(DomainError::validation(
                "Username may only contain letters, digits, hyphens and underscores",
            ));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Username::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

/// Reject blank lookup keys.
///
/// Lookups accept any non-blank value; a malformed name simply matches no row.
pub fn require_non_blank<'a>(field: &str, value: &'a str) -> DomainResult<&'a str> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} must not be blank", field)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_letters_digits_hyphen_underscore() {
        let name = Username::parse("alice_01-dev").unwrap();
        assert_eq!(name.as_str(), "alice_01-dev");
    }

    #[test]
    fn enforces_length_bounds() {
        assert!(Username::parse("ab").is_err());
        assert!(Username::parse("abc").is_ok());
        assert!(Username::parse(&"a".repeat(50)).is_ok());
        assert!(Username::parse(&"a".repeat(51)).is_err());
    }

    #[test]
    fn rejects_blank_and_bad_characters() {
        assert_eq!(
            Username::parse("   "),
            Err(DomainError::validation("Username must not be blank"))
        );
        assert!(Username::parse("bob smith").is_err());
        assert!(Username::parse("bob@home").is_err());
        assert!(Username::parse("zoë").is_err());
        assert!(Username::parse(" alice").is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<Username, _> = serde_json::from_str("\"carol\"");
        assert!(ok.is_ok());

        let bad: Result<Username, _> = serde_json::from_str("\"x\"");
        assert!(bad.is_err());
    }

    #[test]
    fn require_non_blank_passes_through_value() {
        assert_eq!(require_non_blank("Username", "x").unwrap(), "x");
        assert!(require_non_blank("Username", " \t").is_err());
    }
}
