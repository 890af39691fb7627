//! Delegation subject identifier.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{Error, ValidationError};

const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// The id of a contact that requests are made on behalf of.
///
/// Only the canonical hyphenated form with lowercase hex digits is accepted
/// (`8-4-4-4-12`). Braced, simple, URN and uppercase forms are rejected.
///
/// # Example
///
/// ```
/// use currencycloud_core::SubjectId;
///
/// assert!(SubjectId::new("c6ece846-6df1-461d-acaa-b42a6aa74045").is_ok());
/// assert!(SubjectId::new("not-a-uuid").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubjectId(Uuid);

impl SubjectId {
    /// Parse a subject id, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::SubjectId`] if the string is not a
    /// lowercase hyphenated UUID.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        if !has_uuid_shape(s) {
            return Err(invalid(s));
        }
        Uuid::parse_str(s).map(Self).map_err(|_| invalid(s))
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

fn has_uuid_shape(s: &str) -> bool {
    let mut groups = s.split('-');
    let shaped = GROUPS.iter().all(|&len| {
        groups.next().is_some_and(|group| {
            group.len() == len
                && group
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        })
    });
    shaped && groups.next().is_none()
}

fn invalid(value: &str) -> Error {
    ValidationError::SubjectId {
        value: value.to_string(),
    }
    .into()
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SubjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hyphenated_lowercase() {
        let id = SubjectId::new("c6ece846-6df1-461d-acaa-b42a6aa74045").unwrap();
        assert_eq!(id.to_string(), "c6ece846-6df1-461d-acaa-b42a6aa74045");
    }

    #[test]
    fn accepts_generated_v4() {
        let uuid = Uuid::new_v4();
        let id = SubjectId::new(uuid.to_string()).unwrap();
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn rejects_malformed_ids() {
        for value in [
            "not-a-uuid",
            "12345",
            "",
            "C6ECE846-6DF1-461D-ACAA-B42A6AA74045",
            "c6ece8466df1461dacaab42a6aa74045",
            "{c6ece846-6df1-461d-acaa-b42a6aa74045}",
            "c6ece846-6df1-461d-acaa-b42a6aa74045-",
            "c6ece846-6df1-461d-acaa-b42a6aa7404g",
            "urn:uuid:c6ece846-6df1-461d-acaa-b42a6aa74045",
        ] {
            let err = SubjectId::new(value).unwrap_err();
            assert!(
                matches!(err, Error::Validation(ValidationError::SubjectId { .. })),
                "expected validation error for {value:?}"
            );
        }
    }
}
