//! Error handling - RFC 7807 style responses with stable reason codes.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use postboard_core::DomainError;
use postboard_core::validation::field_messages;
use postboard_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {detail}")]
    NotFound { code: &'static str, detail: String },

    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },

    #[error("Unauthorized: {detail}")]
    Unauthorized { code: &'static str, detail: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Validation errors: {0:?}")]
    Validation(BTreeMap<String, String>),
}

impl AppError {
    pub fn bad_request(code: &'static str, detail: impl Into<String>) -> Self {
        AppError::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    /// Swap the reason code of a not-found error, keeping everything else.
    pub fn not_found_as(self, code: &'static str, detail: &str) -> Self {
        match self {
            AppError::NotFound { .. } => AppError::NotFound {
                code,
                detail: detail.to_string(),
            },
            other => other,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { code, .. }
            | AppError::BadRequest { code, .. }
            | AppError::Unauthorized { code, .. } => code,
            AppError::Conflict(_) => "conflict",
            AppError::Unavailable(_) => "storeunavailable",
            AppError::Validation(_) => "validation",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound { detail, .. } => ErrorResponse::not_found(detail),
            AppError::BadRequest { detail, .. } => ErrorResponse::bad_request(detail),
            AppError::Unauthorized { detail, .. } => {
                ErrorResponse::unauthorized().with_detail(detail)
            }
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Unavailable(detail) => {
                tracing::error!("Store unavailable: {}", detail);
                ErrorResponse::new(503, "Service Unavailable")
                    .with_detail("The post store is currently unavailable")
            }
            AppError::Validation(errors) => {
                ErrorResponse::new(400, "Validation Failed").with_errors(errors.clone())
            }
        };

        HttpResponse::build(self.status_code()).json(error.with_code(self.code()))
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => AppError::Validation(field_messages(&errors)),
            DomainError::PostNotFound(_) => AppError::NotFound {
                code: "postnotfound",
                detail: "Post not found".to_string(),
            },
            DomainError::CommentNotFound { .. } => AppError::NotFound {
                code: "commentnotexists",
                detail: "Comment does not exist".to_string(),
            },
            DomainError::NotAuthorized => AppError::Unauthorized {
                code: "notauthorized",
                detail: "User not authorized".to_string(),
            },
            DomainError::AlreadyLiked => {
                AppError::bad_request("alreadyliked", "User already liked this post")
            }
            DomainError::NotLiked => {
                AppError::bad_request("notliked", "You have not yet liked this post")
            }
            DomainError::Conflict(_) => {
                AppError::Conflict("Post was modified concurrently, please retry".to_string())
            }
            DomainError::StoreUnavailable(msg) => AppError::Unavailable(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
