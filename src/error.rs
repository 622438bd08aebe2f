use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A non-2xx answer from the remote catalog API.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        payload: Option<serde_json::Value>,
    },

    /// Boundary input that cannot form a valid query (negative page, zero size, ...).
    #[error("Invalid query: {field} {reason}")]
    InvalidQuery { field: String, reason: String },

    #[error("Monster not found: {0}")]
    NotFound(u64),

    #[error("Unknown master type: {0}")]
    UnknownMaster(String),
}

impl CatalogError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::InvalidQuery {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Error body returned by the catalog server.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
    pub details: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, code, details) = match &self {
            CatalogError::InvalidQuery { field, reason } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                vec![FieldError {
                    field: field.clone(),
                    message: reason.clone(),
                }],
            ),
            CatalogError::NotFound(_) | CatalogError::UnknownMaster(_) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", Vec::new())
            }
            CatalogError::Api { .. } | CatalogError::Http(_) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", Vec::new())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                Vec::new(),
            ),
        };

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = %self, "Unhandled catalog error");
                "Unexpected error occurred".to_string()
            }
            StatusCode::BAD_REQUEST => "Validation failed".to_string(),
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            code,
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}
