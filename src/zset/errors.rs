//! Sorted-set error types and stable error codes
//!
//! Error codes:
//! - AERO_ZSET_NOT_FOUND (ERROR)
//! - AERO_ZSET_MEMBER_NOT_EXIST (ERROR)
//! - AERO_ZSET_EMPTY (ERROR)
//! - AERO_ZSET_INVALID_SCORE (ERROR)
//! - AERO_CONFIG_INVALID (FATAL)

use std::fmt;

use thiserror::Error;

/// Severity levels for sorted-set errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, engine continues
    Error,
    /// Engine must not start
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Sorted-set error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZSetErrorCode {
    /// Sorted set name was never created
    AeroZsetNotFound,
    /// Member absent from an existing sorted set
    AeroZsetMemberNotExist,
    /// Peek/pop on a sorted set with no members
    AeroZsetEmpty,
    /// Score cannot be ordered (NaN)
    AeroZsetInvalidScore,
    /// Configuration rejected
    AeroConfigInvalid,
}

impl ZSetErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ZSetErrorCode::AeroZsetNotFound => "AERO_ZSET_NOT_FOUND",
            ZSetErrorCode::AeroZsetMemberNotExist => "AERO_ZSET_MEMBER_NOT_EXIST",
            ZSetErrorCode::AeroZsetEmpty => "AERO_ZSET_EMPTY",
            ZSetErrorCode::AeroZsetInvalidScore => "AERO_ZSET_INVALID_SCORE",
            ZSetErrorCode::AeroConfigInvalid => "AERO_CONFIG_INVALID",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ZSetErrorCode::AeroConfigInvalid => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ZSetErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result type for sorted-set operations
pub type ZSetResult<T> = Result<T, ZSetError>;

/// Sorted-set errors
///
/// Every variant is raised before any structural change is applied, so a
/// failed call leaves the registry untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZSetError {
    /// The addressed sorted set was never created
    #[error("the sorted set does not exist: {0}")]
    NotFound(String),

    /// The member is not in the addressed sorted set
    #[error("the member of sorted set {0} does not exist")]
    MemberNotExist(String),

    /// The sorted set exists but has no members
    #[error("the sorted set is empty: {0}")]
    Empty(String),

    /// NaN score offered for insertion
    #[error("invalid score for sorted set {0}: NaN cannot be ordered")]
    InvalidScore(String),

    /// Configuration could not be read or failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ZSetError {
    /// Returns the error code
    pub fn code(&self) -> ZSetErrorCode {
        match self {
            ZSetError::NotFound(_) => ZSetErrorCode::AeroZsetNotFound,
            ZSetError::MemberNotExist(_) => ZSetErrorCode::AeroZsetMemberNotExist,
            ZSetError::Empty(_) => ZSetErrorCode::AeroZsetEmpty,
            ZSetError::InvalidScore(_) => ZSetErrorCode::AeroZsetInvalidScore,
            ZSetError::InvalidConfig(_) => ZSetErrorCode::AeroConfigInvalid,
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    pub(crate) fn not_found(name: &str) -> Self {
        ZSetError::NotFound(name.to_string())
    }

    pub(crate) fn member_not_exist(name: &str) -> Self {
        ZSetError::MemberNotExist(name.to_string())
    }

    pub(crate) fn empty(name: &str) -> Self {
        ZSetError::Empty(name.to_string())
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        ZSetError::InvalidConfig(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ZSetErrorCode::AeroZsetNotFound.code(), "AERO_ZSET_NOT_FOUND");
        assert_eq!(
            ZSetErrorCode::AeroZsetMemberNotExist.code(),
            "AERO_ZSET_MEMBER_NOT_EXIST"
        );
        assert_eq!(ZSetErrorCode::AeroZsetEmpty.code(), "AERO_ZSET_EMPTY");
        assert_eq!(ZSetErrorCode::AeroConfigInvalid.code(), "AERO_CONFIG_INVALID");
    }

    #[test]
    fn test_only_config_errors_are_fatal() {
        assert!(!ZSetError::not_found("s").is_fatal());
        assert!(!ZSetError::member_not_exist("s").is_fatal());
        assert!(!ZSetError::empty("s").is_fatal());
        assert!(ZSetError::config("bad").is_fatal());
    }

    #[test]
    fn test_error_display_names_set() {
        let err = ZSetError::empty("leaderboard");
        let display = format!("{}", err);
        assert!(display.contains("leaderboard"));
        assert!(display.contains("empty"));
        assert_eq!(err.code(), ZSetErrorCode::AeroZsetEmpty);
    }
}
