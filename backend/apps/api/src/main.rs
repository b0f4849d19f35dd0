//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth::PgAuthRepository;
use auth::domain::repository::UserRepository;
use auth::domain::services::MailSender;
use auth::infra::{RelayMailSender, TracingMailSender};
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::mail::MailRelay;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Timeout for a single mail relay request
const MAIL_RELAY_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // リリースビルドでは署名鍵の指定を必須にする
    let settings = Settings::load(|name| std::env::var(name).ok(), !cfg!(debug_assertions))
        .context("Invalid configuration")?;

    tracing::debug!(auth = ?settings.auth, "Loaded configuration");

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let repo = PgAuthRepository::new(pool.clone());

    // Startup cleanup: checks scheduled before a restart are lost, so sweep
    // registrations whose confirmation deadline has already passed.
    // Errors here should not prevent server startup
    let delay = chrono::Duration::from_std(settings.auth.registration_check_delay)
        .context("CONFIRM_EMAIL_CHECK_DELAY out of range")?;
    if let Err(e) = repo.delete_unconfirmed_before(chrono::Utc::now() - delay).await {
        tracing::warn!(
            error = %e,
            "Unconfirmed registration sweep failed, continuing anyway"
        );
    }

    // Mail delivery
    let mailer: Arc<dyn MailSender> = match &settings.mail_relay_url {
        Some(url) => {
            let relay = MailRelay::new(url.as_str(), MAIL_RELAY_TIMEOUT)?;
            tracing::info!(endpoint = %relay.endpoint(), "Mail relay configured");
            Arc::new(RelayMailSender::new(relay))
        }
        None => {
            tracing::warn!("MAIL_RELAY_URL not set, mail will only be logged");
            Arc::new(TracingMailSender)
        }
    };

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = settings
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let auth_header = http::HeaderName::from_bytes(settings.auth.auth_header.as_bytes())
        .context("AUTHENTICATION_HEADER is not a valid header name")?;

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([Method::POST, Method::OPTIONS]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            auth_header,
        ]));

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth::auth_router(repo, settings.auth, mailer))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
