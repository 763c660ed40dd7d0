/// Active/inactive flag shared by every table
///
/// Stored as `INTEGER` (0 or 1) and serialized as the bare number so payloads
/// look like `"status": 1`.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Record status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum AccountStatus {
    /// Disabled; cannot sign in
    Inactive = 0,

    /// Enabled
    #[default]
    Active = 1,
}

impl AccountStatus {
    /// Parses a raw status code, rejecting anything other than 0 or 1
    pub fn from_code(code: i32) -> Result<Self, DomainError> {
        Self::try_from(code)
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl From<AccountStatus> for i32 {
    fn from(status: AccountStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for AccountStatus {
    type Error = DomainError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AccountStatus::Inactive),
            1 => Ok(AccountStatus::Active),
            other => Err(DomainError::validation(
                "status",
                format!("status must be 0 or 1, got {}", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AccountStatus::from_code(0).unwrap(), AccountStatus::Inactive);
        assert_eq!(AccountStatus::from_code(1).unwrap(), AccountStatus::Active);
        assert!(AccountStatus::from_code(2).is_err());
        assert!(AccountStatus::from_code(-1).is_err());
        assert_eq!(AccountStatus::default(), AccountStatus::Active);
    }

    #[test]
    fn test_status_serializes_as_number() {
        let json = serde_json::to_string(&AccountStatus::Inactive).unwrap();
        assert_eq!(json, "0");

        let parsed: AccountStatus = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, AccountStatus::Active);

        assert!(serde_json::from_str::<AccountStatus>("7").is_err());
    }
}
