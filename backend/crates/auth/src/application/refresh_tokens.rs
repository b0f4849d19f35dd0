//! Refresh Tokens Use Case

use std::sync::Arc;

use crate::application::authenticate::AuthenticateUseCase;
use crate::application::tokens::TokenService;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::token::{TokenDomain, TokenPair};
use crate::error::AuthResult;

/// Refresh tokens input
pub struct RefreshTokensInput {
    pub refresh: String,
}

/// Refresh tokens use case
pub struct RefreshTokensUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: TokenService,
}

impl<U> RefreshTokensUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: TokenService) -> Self {
        Self { user_repo, tokens }
    }

    /// Authenticate against the refresh domain only, then mint a fresh pair
    pub async fn execute(&self, input: RefreshTokensInput) -> AuthResult<TokenPair> {
        let user = AuthenticateUseCase::new(self.user_repo.clone(), self.tokens.clone())
            .execute(&input.refresh, TokenDomain::Refresh)
            .await?;

        let pair = self.tokens.issue_pair(&user.user_id)?;

        tracing::debug!(user_id = %user.user_id, "Tokens refreshed");

        Ok(pair)
    }
}
