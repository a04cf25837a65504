//! Display name validation.

use std::fmt;

use crate::config::GameConfig;
use crate::error::NameError;

/// A display name that passed length validation.
///
/// Can only be obtained through [`DisplayName::parse`], so stores may assume
/// the bounds hold.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Trims surrounding whitespace and checks the length bounds.
    ///
    /// Length is counted in characters, not bytes, so non-ASCII names get the
    /// same budget as ASCII ones.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if !(GameConfig::MIN_NAME_LEN..=GameConfig::MAX_NAME_LEN).contains(&len) {
            return Err(NameError::InvalidLength {
                len,
                min: GameConfig::MIN_NAME_LEN,
                max: GameConfig::MAX_NAME_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_bounds_are_inclusive() {
        assert!(DisplayName::parse("ab").is_ok());
        assert!(DisplayName::parse(&"x".repeat(20)).is_ok());

        assert_eq!(
            DisplayName::parse("a"),
            Err(NameError::InvalidLength {
                len: 1,
                min: 2,
                max: 20
            })
        );
        assert!(matches!(
            DisplayName::parse(&"x".repeat(21)),
            Err(NameError::InvalidLength { len: 21, .. })
        ));
    }

    #[test]
    fn whitespace_is_trimmed_before_counting() {
        let name = DisplayName::parse("   Alice \t").unwrap();
        assert_eq!(name.as_str(), "Alice");

        assert!(DisplayName::parse("  a  ").is_err());
        assert!(DisplayName::parse("    ").is_err());
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 20 Cyrillic letters are 40 bytes.
        let name = "Ж".repeat(20);
        assert!(DisplayName::parse(&name).is_ok());
        assert!(DisplayName::parse(&"Ж".repeat(21)).is_err());
    }
}
