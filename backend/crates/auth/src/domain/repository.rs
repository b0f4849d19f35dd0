//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::domain::entity::{one_time_code::OneTimeCode, user::User};
use crate::domain::value_object::{
    code_purpose::CodePurpose, email::Email, user_id::UserId, user_name::UserName,
    user_password::UserPassword,
};
use crate::error::AuthResult;

/// Field-level user update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub password_hash: Option<UserPassword>,
    pub email_confirmed: Option<bool>,
    pub tokens_revoked_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl UserChanges {
    pub fn password(hash: UserPassword) -> Self {
        Self {
            password_hash: Some(hash),
            ..Default::default()
        }
    }

    pub fn email_confirmed() -> Self {
        Self {
            email_confirmed: Some(true),
            ..Default::default()
        }
    }

    pub fn revoke_tokens_at(watermark: DateTime<Utc>) -> Self {
        Self {
            tokens_revoked_at: Some(watermark),
            ..Default::default()
        }
    }

    /// Also move the revocation watermark, in the same write
    pub fn revoking_tokens_at(mut self, watermark: DateTime<Utc>) -> Self {
        self.tokens_revoked_at = Some(watermark);
        self
    }
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user together with its first code, all or nothing
    ///
    /// A uniqueness violation maps to `EmailTaken` / `UserNameTaken` and
    /// stores neither row.
    async fn create_with_code(&self, user: &User, code: &OneTimeCode) -> AuthResult<()>;

    /// Apply `changes`; `UserNotFound` if the user is gone
    async fn update(&self, user_id: &UserId, changes: UserChanges) -> AuthResult<()>;

    /// Delete the user (codes cascade); returns whether a row was removed
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;

    /// Case-insensitive
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Case-insensitive
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Match username or email, case-insensitively, among confirmed users only
    async fn find_by_login(&self, login: &str) -> AuthResult<Option<User>>;

    async fn find_by_email(
        &self,
        email: &Email,
        include_unconfirmed: bool,
    ) -> AuthResult<Option<User>>;

    /// Remove unconfirmed users created before `cutoff`
    async fn delete_unconfirmed_before(&self, cutoff: DateTime<Utc>) -> AuthResult<u64>;
}

/// One-time code repository trait
#[trait_variant::make(CodeRepository: Send)]
pub trait LocalCodeRepository {
    /// Atomically persist `code` unless an unredeemed code of the same
    /// (user, purpose) created within `active_window` of `code.created_at`
    /// already exists.
    ///
    /// Returns `None` when such a code exists.
    async fn create_code(
        &self,
        code: &OneTimeCode,
        active_window: Duration,
    ) -> AuthResult<Option<OneTimeCode>>;

    async fn find_most_recent_code(
        &self,
        user_id: &UserId,
        purpose: CodePurpose,
    ) -> AuthResult<Option<OneTimeCode>>;

    /// Mark `code` consumed and apply `changes` to its owner in one transaction
    ///
    /// Returns `false`, changing nothing, when the code was already redeemed.
    async fn redeem_code(&self, code: &OneTimeCode, changes: UserChanges) -> AuthResult<bool>;
}
