//! Domain-to-HTTP error mapping.
//!
//! Every handler returns `Result<_, ApiError>`; this is the single place
//! status codes are decided:
//!
//! - `Validation` → 400
//! - `NotFound` → 404
//! - `BusinessRule` → 422
//! - `Infrastructure` → 503, with the underlying cause logged and replaced
//!   by a generic message so storage details never reach clients

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use utoipa::ToSchema;
use wasfa_core::DomainError;

/// JSON body for every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            DomainError::BusinessRule(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
            }
            DomainError::Infrastructure { context, source } => {
                tracing::error!(context = %context, error = %source, "infrastructure failure");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The service is temporarily unavailable. Please try again.".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: DomainError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn domain_errors_map_to_documented_status_codes() {
        assert_eq!(
            status_of(DomainError::validation("Patient name is required.")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::not_found("Patient", 9)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::business_rule("duplicate")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(DomainError::infrastructure(
                "Failed to add patient.",
                std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            )),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
