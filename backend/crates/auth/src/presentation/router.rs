//! Auth Router

use axum::{Router, middleware, routing::post};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{CodeRepository, UserRepository};
use crate::domain::services::MailSender;
use crate::infra::{Argon2PasswordHasher, PgAuthRepository, TokioRegistrationScheduler};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_access_token;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig, mailer: Arc<dyn MailSender>) -> Router {
    let repo = Arc::new(repo);
    let hasher = Arc::new(Argon2PasswordHasher::new(config.password_pepper.clone()));
    let scheduler = Arc::new(TokioRegistrationScheduler::new(repo.clone()));

    let state = AuthAppState::new(repo, Arc::new(config), hasher, mailer, scheduler);

    auth_router_generic(state)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/token/revoke", post(handlers::revoke_tokens::<R>))
        .route("/password/change", post(handlers::change_password::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token::<R>,
        ));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/register/confirm", post(handlers::confirm_registration::<R>))
        .route("/register/repeat", post(handlers::repeat_registration_code::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/token/refresh", post(handlers::refresh_tokens::<R>))
        .route("/token/verify", post(handlers::verify_token::<R>))
        .route("/password/reset", post(handlers::reset_password::<R>))
        .route("/password/reset/confirm", post(handlers::confirm_reset_password::<R>))
        .merge(protected)
        .with_state(state)
}
