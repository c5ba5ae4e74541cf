//! HTTP error mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use slipcheck_core::SettlementError;
use thiserror::Error;

/// Error returned by handlers, rendered as `{"detail": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing API key or other request configuration
    #[error("{0}")]
    BadRequest(String),

    /// Slip or row failed validation
    #[error("{0}")]
    Unprocessable(String),

    /// Upstream provider call failed
    #[error("{0}")]
    BadGateway(String),

    /// Anything else
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::EmptySlip | SettlementError::InvalidSelection { .. } => {
                Self::Unprocessable(err.to_string())
            }
            SettlementError::Config(detail) => Self::BadRequest(detail),
            SettlementError::Settings(_) | SettlementError::Http(_) => {
                Self::Internal(format!("Unexpected settlement error: {}", err))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Unprocessable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slipcheck_core::SelectionError;

    #[test]
    fn test_settlement_error_mapping() {
        let empty: ApiError = SettlementError::EmptySlip.into();
        assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let invalid: ApiError = SettlementError::InvalidSelection {
            index: 2,
            source: SelectionError::InvalidTeam("middle".to_string()),
        }
        .into();
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(invalid.to_string().starts_with("Selection #2"));

        let config: ApiError = SettlementError::Config("Missing API key".to_string()).into();
        assert_eq!(config.status(), StatusCode::BAD_REQUEST);
        assert_eq!(config.to_string(), "Missing API key");
    }
}
