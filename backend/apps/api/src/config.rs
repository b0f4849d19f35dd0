//! Server Settings
//!
//! 環境変数から起動設定を組み立てる。値の取得はクロージャ経由なので、
//! テストではプロセス環境に触れずに検証できる。

use std::str::FromStr;
use std::time::Duration;

use auth::config::{AuthConfig, ConfigError, parse_algorithm};

/// Default listen port
const DEFAULT_PORT: u16 = 31113;

/// Everything `main` needs to start serving
#[derive(Debug)]
pub struct Settings {
    pub database_url: String,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    /// `None` logs mail instead of delivering it
    pub mail_relay_url: Option<String>,
    pub auth: AuthConfig,
}

impl Settings {
    /// Build settings from `lookup`
    ///
    /// With `require_secrets` both signing secrets must be provided;
    /// otherwise missing secrets are replaced with random ones.
    pub fn load<F>(lookup: F, require_secrets: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::InvalidValue {
            name: "DATABASE_URL",
            reason: "must be set".to_string(),
        })?;

        let mut auth = if require_secrets {
            AuthConfig::default()
        } else {
            AuthConfig::development()
        };

        if let Some(algorithm) = get("JWT_ALGORITHM") {
            auth.token.algorithm = parse_algorithm(&algorithm)?;
        }
        if let Some(secret) = get("ACCESS_SECRET_KEY") {
            auth.token.access_secret = secret.into_bytes();
        }
        if let Some(secret) = get("REFRESH_SECRET_KEY") {
            auth.token.refresh_secret = secret.into_bytes();
        }
        if let Some(ttl) = parse_minutes(&get, "ACCESS_TOKEN_LIFETIME")? {
            auth.token.access_ttl = ttl;
        }
        if let Some(ttl) = parse_minutes(&get, "REFRESH_TOKEN_LIFETIME")? {
            auth.token.refresh_ttl = ttl;
        }

        if let Some(length) = parse::<usize>(&get, "CONFIRMATION_CODE_LENGTH")? {
            auth.code.length = length;
        }
        if let Some(secs) = parse::<u64>(&get, "CONFIRM_EMAIL_CODE_DURATION")? {
            auth.code.email_confirm_window = Duration::from_secs(secs);
        }
        if let Some(secs) = parse::<u64>(&get, "RESET_PASSWORD_CODE_DURATION")? {
            auth.code.reset_password_window = Duration::from_secs(secs);
        }
        if let Some(secs) = parse::<u64>(&get, "CONFIRM_EMAIL_CHECK_DELAY")? {
            auth.registration_check_delay = Duration::from_secs(secs);
        }

        if let Some(min) = parse::<usize>(&get, "USERNAME_MIN_LENGTH")? {
            auth.username_policy.min_length = min;
        }
        if let Some(max) = parse::<usize>(&get, "USERNAME_MAX_LENGTH")? {
            auth.username_policy.max_length = max;
        }
        // May legitimately be empty, so read without the blank filter
        if let Some(special) = lookup("USERNAME_ALLOWED_SPECIAL_CHARACTERS") {
            auth.username_policy.allowed_special_characters = special;
        }
        if let Some(min) = parse::<usize>(&get, "PASSWORD_MIN_LENGTH")? {
            auth.password_policy.min_length = min;
        }
        if let Some(max) = parse::<usize>(&get, "PASSWORD_MAX_LENGTH")? {
            auth.password_policy.max_length = max;
        }

        auth.password_pepper = get("PASSWORD_PEPPER").map(String::into_bytes);

        if let Some(header) = get("AUTHENTICATION_HEADER") {
            auth.auth_header = header;
        }
        if let Some(prefix) = lookup("AUTHENTICATION_HEADER_PREFIX") {
            auth.auth_header_prefix = prefix.trim().to_string();
        }

        auth.validate()?;

        let port = parse::<u16>(&get, "AUTH_PORT")?.unwrap_or(DEFAULT_PORT);

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| "http://localhost:40922,http://127.0.0.1:40922".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url,
            port,
            frontend_origins,
            mail_relay_url: get("MAIL_RELAY_URL"),
            auth,
        })
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
                name,
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn parse_minutes(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    parse::<u64>(get, name)?
        .map(|minutes| {
            minutes
                .checked_mul(60)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    name,
                    reason: "lifetime in minutes is too large".to_string(),
                })
        })
        .transpose()
}
