use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Shopify API error: {status}")]
    Upstream { status: StatusCode, message: String },

    #[error("Upstream request failed")]
    Http(#[from] reqwest::Error),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } | AppError::Http(_) => StatusCode::BAD_GATEWAY,
            AppError::DbError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            AppError::Upstream {
                status: upstream,
                message,
            } => format!("Shopify API error: {upstream} - {message}"),
            AppError::DbError(err) => {
                tracing::error!(error = %err, "database error");
                self.to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = ApiResponse::<serde_json::Value>::failure(self.to_string(), message);
        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
