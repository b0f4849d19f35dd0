//! Token Value Objects
//!
//! Signing domains, the decoded payload and the issued pair.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::Serialize;

use crate::domain::value_object::user_id::UserId;

/// Signing domain of a token
///
/// Access and refresh tokens are signed with different secrets and carry
/// their domain in the `token_use` claim; a token is valid only in its own domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenDomain {
    #[display("access")]
    Access,
    #[display("refresh")]
    Refresh,
}

impl TokenDomain {
    pub fn as_claim(&self) -> &'static str {
        match self {
            TokenDomain::Access => "access",
            TokenDomain::Refresh => "refresh",
        }
    }
}

/// Verified token contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub user_id: UserId,
    pub domain: TokenDomain,
    /// Issue instant at microsecond precision (compared against the revocation watermark)
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Access + refresh pair handed to clients
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}
