use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error taxonomy.
///
/// Every failure path maps to a distinguishable kind; nothing is collapsed
/// into a generic failure. `StoreUnavailable` is surfaced as-is with no
/// retry; retry policy belongs to callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_argument", msg.clone())
            }
            ApiError::UnknownDevice(msg) => (StatusCode::NOT_FOUND, "unknown_device", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::StoreUnavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "The location store is unavailable".into(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                // SQLite extended result codes: 1555 = primary key violation,
                // 2067 = unique constraint violation.
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "1555" | "2067" => ApiError::Conflict("Resource already exists".into()),
                        _ => ApiError::StoreUnavailable(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::StoreUnavailable(format!("Database error: {}", db_err))
                }
            }
            sqlx::Error::Io(io_err) => {
                ApiError::StoreUnavailable(format!("Database I/O error: {}", io_err))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ApiError::StoreUnavailable("Database connection pool exhausted".into())
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.clone().map(|m| m.to_string()).unwrap_or_default()
                    )
                })
            })
            .collect();

        ApiError::InvalidArgument(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_status() {
        let response = ApiError::InvalidArgument("bad limit".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_device_status() {
        let response = ApiError::UnknownDevice("gps-9".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_status() {
        let response = ApiError::NotFound("no samples".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        let response = ApiError::Conflict("already registered".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_store_unavailable_status() {
        let response = ApiError::StoreUnavailable("disk full".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_status() {
        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", ApiError::UnknownDevice("gps-9".to_string())),
            "Unknown device: gps-9"
        );
        assert_eq!(
            format!("{}", ApiError::InvalidArgument("limit".to_string())),
            "Invalid argument: limit"
        );
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_from_sqlx_pool_timeout() {
        let error: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(error, ApiError::StoreUnavailable(_)));
    }
}
