use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::infrastructure::{SignedUrlError, TokenError};
use crate::utils::{error_codes, error_to_api_response};

/// Message returned for every rejected link token, whatever the cause.
pub const INVALID_LINK_MESSAGE: &str = "link is invalid or has expired";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", INVALID_LINK_MESSAGE)]
    InvalidLink,
    #[error("{0}")]
    Forbidden(String),
    #[error("internal server error")]
    Internal,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        if err.is_rejection() {
            tracing::warn!("Rejected link token: {}", err);
            AppError::InvalidLink
        } else {
            tracing::error!("Link token failure: {}", err);
            AppError::Internal
        }
    }
}

impl From<SignedUrlError> for AppError {
    fn from(err: SignedUrlError) -> Self {
        match err {
            SignedUrlError::InvalidSignature | SignedUrlError::Expired => {
                tracing::warn!("Rejected signed URL: {}", err);
                AppError::Forbidden(err.to_string())
            }
            SignedUrlError::Signing(e) => {
                tracing::error!("Signed URL failure: {}", e);
                AppError::Internal
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            AppError::InvalidLink => (StatusCode::BAD_REQUEST, error_codes::LINK_INVALID),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, error_codes::PERMISSION_DENIED),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
            ),
        };

        (status, error_to_api_response::<()>(code, self.to_string())).into_response()
    }
}
