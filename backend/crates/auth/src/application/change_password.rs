//! Change Password Use Case
//!
//! The new hash and the revocation watermark are written in one update; the
//! fresh pair is issued after the watermark so it survives it.

use std::sync::Arc;

use crate::application::revoke_tokens::watermark_now;
use crate::application::tokens::TokenService;
use crate::domain::policy::CredentialPolicy;
use crate::domain::repository::{UserChanges, UserRepository};
use crate::domain::services::PasswordHasher;
use crate::domain::value_object::{token::TokenPair, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
    pub re_new_password: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    policy: Arc<CredentialPolicy>,
    tokens: TokenService,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        policy: Arc<CredentialPolicy>,
        tokens: TokenService,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            policy,
            tokens,
        }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        input: ChangePasswordInput,
    ) -> AuthResult<TokenPair> {
        if input.new_password != input.re_new_password {
            return Err(AuthError::PasswordMismatch);
        }
        if input.new_password == input.current_password {
            return Err(AuthError::PasswordUnchanged);
        }
        self.policy.password.validate(&input.new_password)?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.hasher.verify(&input.current_password, &user.password_hash) {
            tracing::warn!(user_id = %user_id, "Password change rejected: wrong current password");
            return Err(AuthError::IncorrectCurrentPassword);
        }

        let password_hash = self.hasher.hash(&input.new_password)?;
        self.user_repo
            .update(
                user_id,
                UserChanges::password(password_hash).revoking_tokens_at(watermark_now()),
            )
            .await?;

        tracing::info!(user_id = %user_id, "Password changed");

        self.tokens.issue_pair(user_id)
    }
}
