//! OSEK Status Codes
//!
//! Every checked kernel service returns exactly one status. [`ErrorCode`]
//! is the full OSEK `StatusType` subset produced by this layer, including
//! `Ok`, and is what the validation pipeline accumulates. [`OsError`] is the
//! failure-only view returned through `Result` by the service entry points.
//!
//! Numeric values follow the OSEK/VDX standard so they can be handed to C
//! applications unchanged:
//!
//! ```text
//! E_OK          0   ErrorCode::Ok
//! E_OS_ACCESS   1   AccessDenied
//! E_OS_CALLEVEL 2   WrongCallLevel
//! E_OS_ID       3   InvalidId
//! E_OS_NOFUNC   5   ReleaseOutOfOrder
//! E_OS_RESOURCE 6   ResourceStillHeld
//! E_OS_STATE    7   InvalidState
//! ```

#![deny(missing_docs)]

use thiserror_no_std::Error;

/// Status produced by a checked kernel service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ErrorCode {
    /// No error detected
    #[default]
    Ok = 0,
    /// Priority, ownership or task class violation
    AccessDenied = 1,
    /// Service called outside task level
    WrongCallLevel = 2,
    /// Object identifier out of range
    InvalidId = 3,
    /// Resource not released in acquisition order
    ReleaseOutOfOrder = 5,
    /// Calling task still holds a resource
    ResourceStillHeld = 6,
    /// Target task is suspended
    InvalidState = 7,
}

impl ErrorCode {
    /// Whether no error has been detected
    pub const fn is_ok(self) -> bool {
        matches!(self, ErrorCode::Ok)
    }

    /// Whether an error has been detected
    pub const fn is_err(self) -> bool {
        !self.is_ok()
    }

    /// Raw OSEK status value
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert into a `Result`, `Ok` mapping to `Ok(())`
    pub const fn into_result(self) -> Result<(), OsError> {
        match self {
            ErrorCode::Ok => Ok(()),
            ErrorCode::AccessDenied => Err(OsError::AccessDenied),
            ErrorCode::WrongCallLevel => Err(OsError::WrongCallLevel),
            ErrorCode::InvalidId => Err(OsError::InvalidId),
            ErrorCode::ReleaseOutOfOrder => Err(OsError::ReleaseOutOfOrder),
            ErrorCode::ResourceStillHeld => Err(OsError::ResourceStillHeld),
            ErrorCode::InvalidState => Err(OsError::InvalidState),
        }
    }
}

impl TryFrom<u8> for ErrorCode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Ok),
            1 => Ok(ErrorCode::AccessDenied),
            2 => Ok(ErrorCode::WrongCallLevel),
            3 => Ok(ErrorCode::InvalidId),
            5 => Ok(ErrorCode::ReleaseOutOfOrder),
            6 => Ok(ErrorCode::ResourceStillHeld),
            7 => Ok(ErrorCode::InvalidState),
            other => Err(other),
        }
    }
}

impl From<OsError> for ErrorCode {
    fn from(error: OsError) -> Self {
        match error {
            OsError::AccessDenied => ErrorCode::AccessDenied,
            OsError::WrongCallLevel => ErrorCode::WrongCallLevel,
            OsError::InvalidId => ErrorCode::InvalidId,
            OsError::ReleaseOutOfOrder => ErrorCode::ReleaseOutOfOrder,
            OsError::ResourceStillHeld => ErrorCode::ResourceStillHeld,
            OsError::InvalidState => ErrorCode::InvalidState,
        }
    }
}

impl From<Result<(), OsError>> for ErrorCode {
    fn from(result: Result<(), OsError>) -> Self {
        match result {
            Ok(()) => ErrorCode::Ok,
            Err(error) => error.into(),
        }
    }
}

/// Failure reported by a checked kernel service
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OsError {
    /// E_OS_ACCESS
    #[error("access denied (E_OS_ACCESS)")]
    AccessDenied = 1,
    /// E_OS_CALLEVEL
    #[error("wrong call level (E_OS_CALLEVEL)")]
    WrongCallLevel = 2,
    /// E_OS_ID
    #[error("invalid object identifier (E_OS_ID)")]
    InvalidId = 3,
    /// E_OS_NOFUNC
    #[error("resource released out of order (E_OS_NOFUNC)")]
    ReleaseOutOfOrder = 5,
    /// E_OS_RESOURCE
    #[error("task still holds a resource (E_OS_RESOURCE)")]
    ResourceStillHeld = 6,
    /// E_OS_STATE
    #[error("task is suspended (E_OS_STATE)")]
    InvalidState = 7,
}

impl OsError {
    /// Raw OSEK status value
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Result of a checked kernel service
pub type StatusResult = Result<(), OsError>;
