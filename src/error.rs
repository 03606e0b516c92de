//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::QuoteError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("pricing task failed: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Quote(QuoteError::Validation(e)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                PricingErrorResponse {
                    error_type: "ValidationError".to_string(),
                    message: e.message.clone(),
                    details: Some(serde_json::json!({ "errors": e.errors })),
                },
            ),
            AppError::Quote(QuoteError::NoServiceAvailable {
                billable_weight,
                zone,
            }) => (
                StatusCode::NOT_FOUND,
                PricingErrorResponse {
                    error_type: "NoServiceAvailableError".to_string(),
                    message: self.to_string(),
                    details: Some(serde_json::json!({
                        "billableWeight": billable_weight,
                        "zone": zone,
                    })),
                },
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                PricingErrorResponse {
                    error_type: "BadRequest".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    PricingErrorResponse {
                        error_type: "InternalError".to_string(),
                        message: "Internal error".to_string(),
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::validation::ValidationError;

    #[test]
    fn test_status_codes() {
        let validation = AppError::from(QuoteError::Validation(ValidationError {
            message: "Invalid package details".to_string(),
            errors: vec!["declared value must be greater than zero".to_string()],
        }));
        assert_eq!(validation.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let none = AppError::from(QuoteError::NoServiceAvailable {
            billable_weight: 25_000.0,
            zone: 8,
        });
        assert_eq!(none.into_response().status(), StatusCode::NOT_FOUND);

        let bad = AppError::BadRequest("missing field".to_string());
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_panicked_task_is_internal_error() {
        let join_err = tokio::spawn(async { panic!("pricing blew up") })
            .await
            .unwrap_err();
        let err = AppError::from(join_err);
        assert!(matches!(err, AppError::Internal(_)));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["errorType"], "InternalError");
        assert_eq!(body["message"], "Internal error");
    }

    #[test]
    fn test_error_display() {
        let err = AppError::from(QuoteError::NoServiceAvailable {
            billable_weight: 25_000.0,
            zone: 8,
        });
        assert!(err.to_string().contains("zone 8"));
    }
}
