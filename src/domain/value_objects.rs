//! Validated wrappers around the string fields of boards, columns and cards.
//!
//! Construction is the only place validation happens: once a value object
//! exists, its content is known to be trimmed and within bounds.

use crate::error::DomainError;
use std::fmt;

const NAME_MAX_LEN: usize = 100;
const TITLE_MAX_LEN: usize = 200;
const DESCRIPTION_MAX_LEN: usize = 1000;

/// Name of a board or column (1-100 characters, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
    /// Validates `value` as the name of an `entity` (e.g. "Board", "Column")
    pub fn new(value: &str, entity: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        let invalid = |reason: &str| DomainError::InvalidName {
            entity: entity.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("cannot be empty"));
        }
        if trimmed.chars().count() > NAME_MAX_LEN {
            return Err(invalid("cannot exceed 100 characters"));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Card title (1-200 characters, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle("cannot be empty".to_string()));
        }
        if trimmed.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::InvalidTitle(
                "cannot exceed 200 characters".to_string(),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional card description (up to 1000 characters)
///
/// Missing, empty and whitespace-only input all collapse to the empty state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Description(Option<String>);

impl Description {
    pub fn new(value: Option<&str>) -> Result<Self, DomainError> {
        let trimmed = match value.map(str::trim) {
            None | Some("") => return Ok(Self(None)),
            Some(trimmed) => trimmed,
        };

        if trimmed.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(DomainError::InvalidDescription(
                "cannot exceed 1000 characters".to_string(),
            ));
        }

        Ok(Self(Some(trimmed.to_string())))
    }

    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_trims_whitespace() {
        let name = Name::new("  Sprint Board  ", "Board").unwrap();
        assert_eq!(name.as_str(), "Sprint Board");
    }

    #[test]
    fn test_name_rejects_empty() {
        for value in ["", "   ", "\t\n"] {
            let err = Name::new(value, "Column").unwrap_err();
            assert_eq!(
                err,
                DomainError::InvalidName {
                    entity: "Column".to_string(),
                    reason: "cannot be empty".to_string(),
                }
            );
        }
    }

    #[test]
    fn test_name_length_boundary() {
        assert!(Name::new(&"a".repeat(100), "Board").is_ok());
        assert!(Name::new(&format!("  {}  ", "a".repeat(100)), "Board").is_ok());

        let err = Name::new(&"a".repeat(101), "Board").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Board name: cannot exceed 100 characters");
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        assert!(Name::new(&"é".repeat(100), "Board").is_ok());
    }

    #[test]
    fn test_name_equality() {
        let a = Name::new("Todo", "Column").unwrap();
        let b = Name::new(" Todo ", "Column").unwrap();
        let c = Name::new("Done", "Column").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_title_length_boundary() {
        assert!(Title::new(&"t".repeat(200)).is_ok());
        assert!(matches!(
            Title::new(&"t".repeat(201)),
            Err(DomainError::InvalidTitle(_))
        ));
        assert!(matches!(Title::new("  "), Err(DomainError::InvalidTitle(_))));
    }

    #[test]
    fn test_title_trims_whitespace() {
        assert_eq!(Title::new(" Fix login ").unwrap().as_str(), "Fix login");
    }

    #[test]
    fn test_description_empty_states_are_equal() {
        let none = Description::new(None).unwrap();
        let empty = Description::new(Some("")).unwrap();
        let blank = Description::new(Some("   ")).unwrap();

        for description in [&none, &empty, &blank] {
            assert!(description.is_empty());
            assert_eq!(description.value(), None);
        }
        assert_eq!(none, empty);
        assert_eq!(empty, blank);
    }

    #[test]
    fn test_description_length_boundary() {
        let ok = Description::new(Some(&"d".repeat(1000))).unwrap();
        assert!(!ok.is_empty());

        let err = Description::new(Some(&"d".repeat(1001))).unwrap_err();
        assert_eq!(err.code(), "INVALID_DESCRIPTION");
    }

    #[test]
    fn test_description_trims_value() {
        let description = Description::new(Some("  details  ")).unwrap();
        assert_eq!(description.value(), Some("details"));
    }
}
