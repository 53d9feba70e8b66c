// Common types and utilities for API handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::HaCheckError;

// Helper type for snapshot responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

// Query parameters
#[derive(Debug, Default, Deserialize)]
pub struct DevianceQuery {
    pub deviance: Option<String>,
}

/// Parse the optional `deviance` override; it must be a non-negative integer
pub fn parse_deviance(raw: Option<&str>) -> Result<Option<u64>, HaCheckError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| HaCheckError::InvalidRequest {
                reason: format!("deviance must be a non-negative integer, got '{}'", value),
            }),
    }
}

/// Map a health check failure onto a short plain-text response
pub fn error_response(err: HaCheckError) -> Response {
    match err {
        HaCheckError::UnknownTarget { .. } => {
            info!("{}", err);
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        HaCheckError::InvalidRequest { .. } => {
            info!("{}", err);
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        other => {
            error!("Health check failed: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deviance() {
        assert_eq!(parse_deviance(None).unwrap(), None);
        assert_eq!(parse_deviance(Some("")).unwrap(), None);
        assert_eq!(parse_deviance(Some("0")).unwrap(), Some(0));
        assert_eq!(parse_deviance(Some(" 25 ")).unwrap(), Some(25));
        assert!(parse_deviance(Some("-1")).is_err());
        assert!(parse_deviance(Some("ten")).is_err());
        assert!(parse_deviance(Some("1.5")).is_err());
    }
}
