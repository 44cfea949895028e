//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use market::MarketError;
use market::store::SubmitError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unauthorized access
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Missing resource
    #[error("{0}")]
    NotFound(String),

    /// Write conflicting with existing data
    #[error("{0}")]
    Conflict(String),

    /// Failed admin write, reported with the backend's own message
    #[error("{0}")]
    Backend(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    /// Map a failed read: log it and hide the details
    pub fn read(context: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
        move |e| {
            error!("{}: {}", context, e);
            ApiError::InternalServerError
        }
    }

    /// Map a failed admin write: log it and surface the backend message
    pub fn write(action: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
        move |e| {
            error!("Error {}: {}", action, e);
            ApiError::Backend(format!("Error {}: {}", action, e))
        }
    }
}

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::MalformedRow { .. } => {
                error!("{}", err);
                ApiError::InternalServerError
            }
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(e) => e.into(),
            SubmitError::NotFound => ApiError::not_found("Product"),
            backend @ SubmitError::Backend { .. } => ApiError::Backend(backend.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Backend(_) | ApiError::InternalServerError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self {
            ApiError::Database(_) => "Database error".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
