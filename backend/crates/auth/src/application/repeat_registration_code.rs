//! Repeat Registration Code Use Case

use std::sync::Arc;

use crate::application::codes::{CodeIssuer, CodeSent};
use crate::application::config::AuthConfig;
use crate::domain::repository::{CodeRepository, UserRepository};
use crate::domain::services::MailSender;
use crate::domain::value_object::{code_purpose::CodePurpose, email::Email};
use crate::error::{AuthError, AuthResult};

pub struct RepeatRegistrationCodeInput {
    pub email: String,
}

pub struct RepeatRegistrationCodeUseCase<U, C>
where
    U: UserRepository,
    C: CodeRepository,
{
    user_repo: Arc<U>,
    code_repo: Arc<C>,
    mailer: Arc<dyn MailSender>,
    config: Arc<AuthConfig>,
}

impl<U, C> RepeatRegistrationCodeUseCase<U, C>
where
    U: UserRepository,
    C: CodeRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        code_repo: Arc<C>,
        mailer: Arc<dyn MailSender>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            code_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: RepeatRegistrationCodeInput) -> AuthResult<CodeSent> {
        let email = Email::new(&input.email)?;

        let user = self
            .user_repo
            .find_by_email(&email, true)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.email_confirmed {
            return Err(AuthError::EmailAlreadyConfirmed);
        }

        CodeIssuer::new(self.code_repo.clone(), self.mailer.clone(), self.config.clone())
            .send(&user, CodePurpose::EmailConfirm)
            .await
    }
}
