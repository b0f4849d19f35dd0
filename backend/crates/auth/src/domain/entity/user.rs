//! User Entity
//!
//! Account record of the store together with its credential state.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::UserPassword,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Lower-cased, unique
    pub email: Email,
    /// Case preserved, unique case-insensitively
    pub user_name: UserName,
    pub password_hash: UserPassword,
    /// Administrative switch; inactive users keep valid tokens but are denied access
    pub is_active: bool,
    pub email_confirmed: bool,
    /// Revocation watermark: tokens issued strictly before it are rejected
    pub tokens_revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unconfirmed user
    pub fn new(email: Email, user_name: UserName, password_hash: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            user_name,
            password_hash,
            is_active: true,
            email_confirmed: false,
            tokens_revoked_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a token issued at `issued_at` has been revoked
    pub fn revoked_token_issued_at(&self, issued_at: DateTime<Utc>) -> bool {
        matches!(self.tokens_revoked_at, Some(watermark) if watermark > issued_at)
    }
}
