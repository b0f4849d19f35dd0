//! Register Use Case
//!
//! Creates an unconfirmed account and its email confirmation code in one
//! write, then mails the code.

use std::sync::Arc;

use chrono::Utc;

use crate::application::codes::{CodeIssuer, CodeSent};
use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::policy::CredentialPolicy;
use crate::domain::repository::{CodeRepository, UserRepository};
use crate::domain::services::{MailSender, PasswordHasher, RegistrationScheduler};
use crate::domain::value_object::{
    code_purpose::CodePurpose, email::Email, user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub re_password: String,
}

/// Register use case
pub struct RegisterUseCase<U, C>
where
    U: UserRepository,
    C: CodeRepository,
{
    user_repo: Arc<U>,
    code_repo: Arc<C>,
    hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn MailSender>,
    scheduler: Arc<dyn RegistrationScheduler>,
    policy: Arc<CredentialPolicy>,
    config: Arc<AuthConfig>,
}

impl<U, C> RegisterUseCase<U, C>
where
    U: UserRepository,
    C: CodeRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        code_repo: Arc<C>,
        hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn MailSender>,
        scheduler: Arc<dyn RegistrationScheduler>,
        policy: Arc<CredentialPolicy>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            code_repo,
            hasher,
            mailer,
            scheduler,
            policy,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<CodeSent> {
        // Validate everything before touching the store
        let email = Email::new(&input.email)?;
        let user_name = UserName::parse(&input.user_name, &self.policy.username)?;

        if input.password != input.re_password {
            return Err(AuthError::PasswordMismatch);
        }
        self.policy.password.validate(&input.password)?;

        // Uniqueness
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }
        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let user = User::new(email, user_name, password_hash);

        let issuer = CodeIssuer::new(
            self.code_repo.clone(),
            self.mailer.clone(),
            self.config.clone(),
        );
        let code = issuer.generate(&user, CodePurpose::EmailConfirm);
        self.user_repo.create_with_code(&user, &code).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User registered"
        );

        let delay = chrono::Duration::from_std(self.config.registration_check_delay)
            .unwrap_or_else(|_| chrono::Duration::days(1));
        self.scheduler.schedule_check(user.user_id, Utc::now() + delay);

        Ok(issuer.mail(&user, &code))
    }
}
