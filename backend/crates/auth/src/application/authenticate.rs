//! Authenticate Use Case
//!
//! Resolves a bearer token to its user, honouring the revocation watermark.

use std::sync::Arc;

use crate::application::tokens::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::token::TokenDomain;
use crate::error::{AuthError, AuthResult};

/// Authenticate use case
pub struct AuthenticateUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: TokenService,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: TokenService) -> Self {
        Self { user_repo, tokens }
    }

    /// Malformed, expired, orphaned and revoked tokens all fail with
    /// [`AuthError::InvalidToken`]; an inactive user fails with
    /// [`AuthError::UserInactive`].
    pub async fn execute(&self, token: &str, domain: TokenDomain) -> AuthResult<User> {
        let payload = self.tokens.decode(token, domain)?;

        let Some(user) = self.user_repo.find_by_id(&payload.user_id).await? else {
            tracing::debug!(user_id = %payload.user_id, "Token references unknown user");
            return Err(AuthError::InvalidToken);
        };

        if user.revoked_token_issued_at(payload.issued_at) {
            tracing::debug!(user_id = %user.user_id, domain = %domain, "Token revoked");
            return Err(AuthError::InvalidToken);
        }

        if !user.is_active {
            return Err(AuthError::UserInactive);
        }

        Ok(user)
    }
}
