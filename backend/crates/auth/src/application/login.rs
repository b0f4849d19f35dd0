//! Login Use Case

use std::sync::Arc;

use crate::application::tokens::TokenService;
use crate::domain::repository::UserRepository;
use crate::domain::services::PasswordHasher;
use crate::domain::value_object::token::TokenPair;
use crate::error::{AuthError, AuthResult};

/// Login input; `login` is a username or an email
pub struct LoginInput {
    pub login: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenService,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, hasher: Arc<dyn PasswordHasher>, tokens: TokenService) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<TokenPair> {
        let login = input.login.trim();

        let Some(user) = self.user_repo.find_by_login(login).await? else {
            tracing::debug!("Login for unknown or unconfirmed user");
            return Err(AuthError::UserNotFound);
        };

        if !self.hasher.verify(&input.password, &user.password_hash) {
            tracing::warn!(user_id = %user.user_id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::warn!(user_id = %user.user_id, "Login denied: user inactive");
            return Err(AuthError::UserInactive);
        }

        let pair = self.tokens.issue_pair(&user.user_id)?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(pair)
    }
}
