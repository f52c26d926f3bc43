//! Error codes for the portal backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// No valid session
    Unauthorized,
    /// OAuth state parameter missing or not matching the state cookie
    InvalidOauthState,
    /// Identity provider rejected the authorization code or returned junk
    IdentityExchangeFailed,

    // Request Validation
    /// General bad request error
    BadRequest,
    /// A required query parameter is missing
    MissingParameter,

    // Resource Not Found
    /// General not found error; also used to hide admin routes
    NotFound,
    /// Executive record not found
    ExecutiveNotFound,

    // Business Logic Conflicts
    /// Generic conflict
    Conflict,

    // System Errors
    /// Session infrastructure (signing secret store) unavailable
    SessionUnavailable,
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidOauthState => "INVALID_OAUTH_STATE",
            Self::IdentityExchangeFailed => "IDENTITY_EXCHANGE_FAILED",

            Self::BadRequest => "BAD_REQUEST",
            Self::MissingParameter => "MISSING_PARAMETER",

            Self::NotFound => "NOT_FOUND",
            Self::ExecutiveNotFound => "EXECUTIVE_NOT_FOUND",

            Self::Conflict => "CONFLICT",

            Self::SessionUnavailable => "SESSION_UNAVAILABLE",
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
