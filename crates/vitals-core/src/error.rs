//! Shared error type across vitals crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Caller passed an argument the operation cannot accept.
    InvalidArgument,
    /// Requested resource does not exist.
    NotFound,
    /// Configuration is malformed or out of range.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidArgument => "INVALID_ARGUMENT",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::BadConfig => "BAD_CONFIG",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// HTTP status code carried by responses with this code.
    pub fn http_status(self) -> u16 {
        match self {
            ClientCode::InvalidArgument | ClientCode::BadConfig => 400,
            ClientCode::NotFound => 404,
            ClientCode::UnsupportedVersion | ClientCode::Internal => 500,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, VitalsError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum VitalsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl VitalsError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            VitalsError::InvalidArgument(_) => ClientCode::InvalidArgument,
            VitalsError::NotFound(_) => ClientCode::NotFound,
            VitalsError::BadConfig(_) => ClientCode::BadConfig,
            VitalsError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            VitalsError::Internal(_) => ClientCode::Internal,
        }
    }
}
