//! Check Registration Use Case
//!
//! Runs once the confirmation deadline of a registration has passed.

use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

pub struct CheckRegistrationUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> CheckRegistrationUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Delete the user if the email is still unconfirmed
    ///
    /// - `None`: the user no longer exists
    /// - `Some(false)`: unconfirmed, now deleted
    /// - `Some(true)`: confirmed, kept
    pub async fn execute(&self, user_id: &UserId) -> AuthResult<Option<bool>> {
        let Some(user) = self.user_repo.find_by_id(user_id).await? else {
            tracing::debug!(user_id = %user_id, "Registration check: user already gone");
            return Ok(None);
        };

        if user.email_confirmed {
            tracing::debug!(user_id = %user_id, "Registration check: email confirmed");
            return Ok(Some(true));
        }

        self.user_repo.delete(user_id).await?;
        tracing::info!(user_id = %user_id, "Unconfirmed registration removed");

        Ok(Some(false))
    }
}
