//! Auth Middleware
//!
//! Bearer-token authentication for protected routes.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::application::AuthenticateUseCase;
use crate::domain::entity::user::User;
use crate::domain::repository::{CodeRepository, UserRepository};
use crate::domain::value_object::token::TokenDomain;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Authenticated user stored in request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Token from `{header}: {prefix} {token}`
///
/// The prefix is matched case-insensitively; an empty prefix takes the whole
/// header value.
pub fn extract_bearer<'a>(headers: &'a HeaderMap, header: &str, prefix: &str) -> Option<&'a str> {
    let value = headers.get(header)?.to_str().ok()?.trim();

    if prefix.is_empty() {
        return (!value.is_empty()).then_some(value);
    }

    let (scheme, token) = value.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case(prefix) {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware that requires a valid access token
pub async fn require_access_token<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + CodeRepository + Clone + Send + Sync + 'static,
{
    let token = extract_bearer(
        req.headers(),
        &state.config.auth_header,
        &state.config.auth_header_prefix,
    )
    .ok_or(AuthError::InvalidToken)?
    .to_string();

    let user = AuthenticateUseCase::new(state.repo.clone(), state.tokens())
        .execute(&token, TokenDomain::Access)
        .await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(
            extract_bearer(&headers("Bearer abc.def"), "Authorization", "Bearer"),
            Some("abc.def")
        );
        assert_eq!(
            extract_bearer(&headers("bearer   abc"), "Authorization", "Bearer"),
            Some("abc")
        );
    }

    #[test]
    fn test_extract_bearer_rejects_other_schemes() {
        assert_eq!(extract_bearer(&headers("Basic abc"), "Authorization", "Bearer"), None);
        assert_eq!(extract_bearer(&headers("Bearer"), "Authorization", "Bearer"), None);
        assert_eq!(extract_bearer(&HeaderMap::new(), "Authorization", "Bearer"), None);
    }

    #[test]
    fn test_extract_without_prefix() {
        assert_eq!(extract_bearer(&headers("abc"), "Authorization", ""), Some("abc"));
    }
}
