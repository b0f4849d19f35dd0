//! Revoke Tokens Use Case
//!
//! Moves the user's revocation watermark to the current instant.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::repository::{UserChanges, UserRepository};
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Current instant at the store's precision (microseconds)
pub(crate) fn watermark_now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
}

/// Revoke tokens use case
pub struct RevokeTokensUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> RevokeTokensUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Invalidate every token issued strictly before now
    pub async fn execute(&self, user_id: &UserId) -> AuthResult<DateTime<Utc>> {
        let watermark = watermark_now();
        self.user_repo
            .update(user_id, UserChanges::revoke_tokens_at(watermark))
            .await?;

        tracing::info!(user_id = %user_id, "Tokens revoked");

        Ok(watermark)
    }
}
