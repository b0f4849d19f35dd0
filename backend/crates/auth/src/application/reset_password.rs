//! Reset Password Use Case
//!
//! Unknown addresses get the same response as known ones and no mail, and
//! so does a known address whose previous code is still active.

use std::sync::Arc;

use crate::application::codes::{CodeIssuer, CodeSent};
use crate::application::config::AuthConfig;
use crate::domain::repository::{CodeRepository, UserRepository};
use crate::domain::services::MailSender;
use crate::domain::value_object::{code_purpose::CodePurpose, email::Email};
use crate::error::{AuthError, AuthResult};

pub struct ResetPasswordInput {
    pub email: String,
}

pub struct ResetPasswordUseCase<U, C>
where
    U: UserRepository,
    C: CodeRepository,
{
    user_repo: Arc<U>,
    code_repo: Arc<C>,
    mailer: Arc<dyn MailSender>,
    config: Arc<AuthConfig>,
}

impl<U, C> ResetPasswordUseCase<U, C>
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

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<CodeSent> {
        let email = Email::new(&input.email)?;

        let Some(user) = self.user_repo.find_by_email(&email, false).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(CodeSent::new(&email));
        };

        match CodeIssuer::new(self.code_repo.clone(), self.mailer.clone(), self.config.clone())
            .send(&user, CodePurpose::ResetPassword)
            .await
        {
            Err(AuthError::CodeStillActive { retry_after_secs }) => {
                tracing::debug!(
                    user_id = %user.user_id,
                    retry_after_secs,
                    "Password reset code still active; nothing sent"
                );
                Ok(CodeSent::new(&email))
            }
            other => other,
        }
    }
}
