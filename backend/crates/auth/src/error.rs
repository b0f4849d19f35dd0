//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::ValidationError;
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message shared by every token rejection
pub const INVALID_TOKEN_MESSAGE: &str = "Token is not correct.";

/// Message shared by every code rejection
pub const INVALID_CODE_MESSAGE: &str = "Code is not correct.";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------
    /// Input violated a username or password rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Email failed syntax validation
    #[error("{0}")]
    InvalidEmail(String),

    /// `password` and its repetition differ
    #[error("Password mismatch.")]
    PasswordMismatch,

    /// New password equals the current one
    #[error("Password must be different from the current one.")]
    PasswordUnchanged,

    /// Current password supplied for a change is wrong
    #[error("Wrong password.")]
    IncorrectCurrentPassword,

    /// Missing, expired or wrong one-time code
    #[error("Code is not correct.")]
    InvalidCode,

    // ------------------------------------------------------------------------
    // Authentication / Authorization
    // ------------------------------------------------------------------------
    /// Malformed, expired, revoked or orphaned token
    #[error("Token is not correct.")]
    InvalidToken,

    /// Wrong password on login
    #[error("Wrong password.")]
    InvalidCredentials,

    /// Token is valid but the account is administratively disabled
    #[error("User is not active.")]
    UserInactive,

    // ------------------------------------------------------------------------
    // Lookup / Conflict
    // ------------------------------------------------------------------------
    #[error("User not found.")]
    UserNotFound,

    #[error("Email is already taken.")]
    EmailTaken,

    #[error("Username is already taken.")]
    UserNameTaken,

    #[error("Email is already confirmed.")]
    EmailAlreadyConfirmed,

    /// A code of the same purpose is still active
    #[error("New code will be available to obtain after: {retry_after_secs}")]
    CodeStillActive { retry_after_secs: i64 },

    // ------------------------------------------------------------------------
    // Infrastructure
    // ------------------------------------------------------------------------
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordHashError),

    #[error("Token encoding error: {0}")]
    TokenEncoding(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::InvalidEmail(_)
            | AuthError::PasswordMismatch
            | AuthError::PasswordUnchanged
            | AuthError::IncorrectCurrentPassword
            | AuthError::InvalidCode => ErrorKind::Validation,
            AuthError::InvalidToken | AuthError::InvalidCredentials => ErrorKind::Authentication,
            AuthError::UserInactive => ErrorKind::Authorization,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken
            | AuthError::UserNameTaken
            | AuthError::EmailAlreadyConfirmed
            | AuthError::CodeStillActive { .. } => ErrorKind::Conflict,
            AuthError::Database(sqlx::Error::PoolTimedOut) => ErrorKind::ServiceUnavailable,
            AuthError::Database(_)
            | AuthError::PasswordHash(_)
            | AuthError::TokenEncoding(_)
            | AuthError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic message; their detail only goes to the log.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        if kind.is_server_error() {
            return AppError::new(kind, "Internal server error.");
        }
        let err = AppError::new(kind, self.to_string());
        match self {
            AuthError::CodeStillActive { .. } => err.with_action("Retry after the given number of seconds"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            AuthError::TokenEncoding(msg) | AuthError::Internal(msg) => {
                tracing::error!(detail = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Rejected bearer token");
            }
            AuthError::InvalidCode => {
                tracing::warn!("Rejected one-time code");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
