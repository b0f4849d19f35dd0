//! Confirm Reset Password Use Case

use std::sync::Arc;

use crate::application::codes::CodeVerifier;
use crate::application::config::AuthConfig;
use crate::application::revoke_tokens::watermark_now;
use crate::domain::policy::CredentialPolicy;
use crate::domain::repository::{CodeRepository, UserChanges, UserRepository};
use crate::domain::services::PasswordHasher;
use crate::domain::value_object::{code_purpose::CodePurpose, email::Email};
use crate::error::{AuthError, AuthResult};

pub struct ConfirmResetPasswordInput {
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub re_new_password: String,
}

pub struct ConfirmResetPasswordUseCase<U, C>
where
    U: UserRepository,
    C: CodeRepository,
{
    user_repo: Arc<U>,
    code_repo: Arc<C>,
    hasher: Arc<dyn PasswordHasher>,
    policy: Arc<CredentialPolicy>,
    config: Arc<AuthConfig>,
}

impl<U, C> ConfirmResetPasswordUseCase<U, C>
where
    U: UserRepository,
    C: CodeRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        code_repo: Arc<C>,
        hasher: Arc<dyn PasswordHasher>,
        policy: Arc<CredentialPolicy>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            code_repo,
            hasher,
            policy,
            config,
        }
    }

    /// Redeem the code, set a new password and revoke every outstanding token
    pub async fn execute(&self, input: ConfirmResetPasswordInput) -> AuthResult<()> {
        if input.new_password != input.re_new_password {
            return Err(AuthError::PasswordMismatch);
        }
        self.policy.password.validate(&input.new_password)?;

        let email = Email::new(&input.email)?;

        // Unknown users fail exactly like a wrong code
        let Some(user) = self.user_repo.find_by_email(&email, false).await? else {
            return Err(AuthError::InvalidCode);
        };

        let code = CodeVerifier::new(self.code_repo.clone(), self.config.clone())
            .accept(&user.user_id, CodePurpose::ResetPassword, &input.code)
            .await?;

        if self.hasher.verify(&input.new_password, &user.password_hash) {
            return Err(AuthError::PasswordUnchanged);
        }

        // Code, password and watermark commit together
        let password_hash = self.hasher.hash(&input.new_password)?;
        let changes = UserChanges::password(password_hash).revoking_tokens_at(watermark_now());
        if !self.code_repo.redeem_code(&code, changes).await? {
            return Err(AuthError::InvalidCode);
        }

        tracing::info!(user_id = %user.user_id, "Password reset");

        Ok(())
    }
}
