use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Character cap of the roll number login input.
pub const ROLL_NUMBER_CAP: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Roll number is required")]
    MissingRollNumber,
    #[error("Name is required")]
    MissingName,
    #[error("Roll number must be at most {} characters", ROLL_NUMBER_CAP)]
    RollNumberTooLong,
}

/// The roll-number/name pair established at login.
///
/// Immutable once created; attached to the final submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    roll_number: String,
    name: String,
}

impl SessionIdentity {
    pub fn new(roll_number: impl Into<String>, name: impl Into<String>) -> Result<Self, IdentityError> {
        let roll_number = roll_number.into();
        let name = name.into();
        if roll_number.is_empty() {
            return Err(IdentityError::MissingRollNumber);
        }
        if name.is_empty() {
            return Err(IdentityError::MissingName);
        }
        if roll_number.chars().count() > ROLL_NUMBER_CAP {
            return Err(IdentityError::RollNumberTooLong);
        }
        Ok(Self { roll_number, name })
    }

    pub fn roll_number(&self) -> &str {
        &self.roll_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_parts_required() {
        assert_eq!(SessionIdentity::new("", "Ann"), Err(IdentityError::MissingRollNumber));
        assert_eq!(SessionIdentity::new("RA1", ""), Err(IdentityError::MissingName));
        let id = SessionIdentity::new("RA2211003", "Ann").unwrap();
        assert_eq!(id.roll_number(), "RA2211003");
        assert_eq!(id.name(), "Ann");
    }

    #[test]
    fn roll_number_is_capped() {
        let long = "R".repeat(ROLL_NUMBER_CAP + 1);
        assert_eq!(SessionIdentity::new(long, "Ann"), Err(IdentityError::RollNumberTooLong));
        assert!(SessionIdentity::new("R".repeat(ROLL_NUMBER_CAP), "Ann").is_ok());
    }

    #[test]
    fn serializes_camel_case() {
        let id = SessionIdentity::new("RA1", "Ann").unwrap();
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            serde_json::json!({ "rollNumber": "RA1", "name": "Ann" })
        );
    }
}
