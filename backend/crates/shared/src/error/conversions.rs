//! Error conversions - From implementations into [`AppError`]

use super::app_error::AppError;
use crate::validation::ValidationError;

// ============================================================================
// Validation engine conversions
// ============================================================================

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.message().to_owned())
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "kind": self.kind(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_validation_error_conversion() {
        let err = ValidationError::new("length", "Make sure that password length is not less than 8.");
        let app_err: AppError = err.into();
        assert_eq!(app_err.kind(), ErrorKind::Validation);
        assert_eq!(
            app_err.message(),
            "Make sure that password length is not less than 8."
        );
    }
}
