//! HTTP Handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthenticateUseCase, ChangePasswordUseCase, CodeSent, ConfirmRegistrationUseCase,
    ConfirmResetPasswordUseCase, LoginUseCase, RefreshTokensUseCase, RegisterUseCase,
    RepeatRegistrationCodeUseCase, ResetPasswordUseCase, RevokeTokensUseCase, TokenService,
};
use crate::domain::policy::CredentialPolicy;
use crate::domain::repository::{CodeRepository, UserRepository};
use crate::domain::services::{MailSender, PasswordHasher, RegistrationScheduler};
use crate::domain::value_object::token::{TokenDomain, TokenPair};
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, ConfirmRegistrationRequest, ConfirmResetPasswordRequest, EmailRequest,
    LoginRequest, RefreshTokensRequest, RegisterRequest, UserInfoResponse, VerifyTokenRequest,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub policy: Arc<CredentialPolicy>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub mailer: Arc<dyn MailSender>,
    pub scheduler: Arc<dyn RegistrationScheduler>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    /// Build the state; the credential policy is derived from `config`
    pub fn new(
        repo: Arc<R>,
        config: Arc<AuthConfig>,
        hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn MailSender>,
        scheduler: Arc<dyn RegistrationScheduler>,
    ) -> Self {
        let policy = Arc::new(config.credential_policy());
        Self {
            repo,
            config,
            policy,
            hasher,
            mailer,
            scheduler,
        }
    }

    pub fn tokens(&self) -> TokenService {
        TokenService::new(self.config.clone())
    }
}

// ============================================================================
// Registration
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<CodeSent>)>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.hasher.clone(),
        state.mailer.clone(),
        state.scheduler.clone(),
        state.policy.clone(),
        state.config.clone(),
    );

    let sent = use_case.execute(req.into()).await?;

    Ok((StatusCode::CREATED, Json(sent)))
}

/// POST /api/auth/register/confirm
pub async fn confirm_registration<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<ConfirmRegistrationRequest>,
) -> AuthResult<Json<TokenPair>>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let use_case = ConfirmRegistrationUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.tokens(),
        state.config.clone(),
    );

    Ok(Json(use_case.execute(req.into()).await?))
}

/// POST /api/auth/register/repeat
pub async fn repeat_registration_code<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<EmailRequest>,
) -> AuthResult<Json<CodeSent>>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let use_case = RepeatRegistrationCodeUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    Ok(Json(use_case.execute(req.into()).await?))
}

// ============================================================================
// Login & Tokens
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<TokenPair>>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.hasher.clone(), state.tokens());

    Ok(Json(use_case.execute(req.into()).await?))
}

/// POST /api/auth/token/refresh
pub async fn refresh_tokens<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RefreshTokensRequest>,
) -> AuthResult<Json<TokenPair>>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let use_case = RefreshTokensUseCase::new(state.repo.clone(), state.tokens());

    Ok(Json(use_case.execute(req.into()).await?))
}

/// POST /api/auth/token/verify
pub async fn verify_token<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<VerifyTokenRequest>,
) -> AuthResult<Json<UserInfoResponse>>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let user = AuthenticateUseCase::new(state.repo.clone(), state.tokens())
        .execute(&req.access, TokenDomain::Access)
        .await?;

    Ok(Json(UserInfoResponse::from(&user)))
}

/// POST /api/auth/token/revoke (bearer)
pub async fn revoke_tokens<R>(
    State(state): State<AuthAppState<R>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    RevokeTokensUseCase::new(state.repo.clone())
        .execute(&user.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Passwords
// ============================================================================

/// POST /api/auth/password/change (bearer)
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<Json<TokenPair>>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.policy.clone(),
        state.tokens(),
    );

    Ok(Json(use_case.execute(&user.user_id, req.into()).await?))
}

/// POST /api/auth/password/reset
pub async fn reset_password<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<EmailRequest>,
) -> AuthResult<Json<CodeSent>>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    Ok(Json(use_case.execute(req.into()).await?))
}

/// POST /api/auth/password/reset/confirm
pub async fn confirm_reset_password<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<ConfirmResetPasswordRequest>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let use_case = ConfirmResetPasswordUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.hasher.clone(),
        state.policy.clone(),
        state.config.clone(),
    );

    use_case.execute(req.into()).await?;

    Ok(StatusCode::NO_CONTENT)
}
