//! Confirm Registration Use Case

use std::sync::Arc;

use crate::application::codes::CodeVerifier;
use crate::application::config::AuthConfig;
use crate::application::tokens::TokenService;
use crate::domain::repository::{CodeRepository, UserChanges, UserRepository};
use crate::domain::value_object::{code_purpose::CodePurpose, email::Email, token::TokenPair};
use crate::error::{AuthError, AuthResult};

/// Confirm registration input
pub struct ConfirmRegistrationInput {
    pub email: String,
    pub code: String,
}

/// Confirm registration use case
pub struct ConfirmRegistrationUseCase<U, C>
where
    U: UserRepository,
    C: CodeRepository,
{
    user_repo: Arc<U>,
    code_repo: Arc<C>,
    tokens: TokenService,
    config: Arc<AuthConfig>,
}

impl<U, C> ConfirmRegistrationUseCase<U, C>
where
    U: UserRepository,
    C: CodeRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        code_repo: Arc<C>,
        tokens: TokenService,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            code_repo,
            tokens,
            config,
        }
    }

    /// Mark the email confirmed and sign the user in
    pub async fn execute(&self, input: ConfirmRegistrationInput) -> AuthResult<TokenPair> {
        let email = Email::new(&input.email)?;

        let user = self
            .user_repo
            .find_by_email(&email, true)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.email_confirmed {
            return Err(AuthError::EmailAlreadyConfirmed);
        }

        let code = CodeVerifier::new(self.code_repo.clone(), self.config.clone())
            .accept(&user.user_id, CodePurpose::EmailConfirm, &input.code)
            .await?;

        if !self
            .code_repo
            .redeem_code(&code, UserChanges::email_confirmed())
            .await?
        {
            return Err(AuthError::InvalidCode);
        }

        tracing::info!(user_id = %user.user_id, "Email confirmed");

        self.tokens.issue_pair(&user.user_id)
    }
}
