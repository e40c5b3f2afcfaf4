use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::envelope::ApiResponse;

/// Reasons the estimator refuses to produce a quote or its texts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    #[error("at least 2 destinations are required, found {found}")]
    InsufficientDestinations { found: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no vehicle class selected")]
    EmptySelection,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("Invalid ID")]
    InvalidId,

    #[error("Quote not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Quote(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => log::error!("Request failed: {}", self),
            _ => log::warn!("Request rejected: {}", self),
        }
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.to_string()))
    }
}

pub type Result<T, E = QuoteError> = std::result::Result<T, E>;
