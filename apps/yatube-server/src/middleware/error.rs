//! Error handling - RFC 7807 bodies, or redirects where a browser flow
//! expects one.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};

use yatube_core::DomainError;
use yatube_core::domain::PostId;
use yatube_shared::ErrorResponse;

pub const LOGIN_PATH: &str = "/auth/login/";

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Validation { field: String, message: String },
    /// Anonymous caller on a members-only route; redirected to the login page.
    LoginRequired,
    /// Non-author touching a post; redirected back to the post.
    NotAuthor { post_id: PostId },
    Unauthorized(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::Validation { field, message } => write!(f, "Invalid {field}: {message}"),
            AppError::LoginRequired => write!(f, "Login required"),
            AppError::NotAuthor { post_id } => write!(f, "Not the author of post {post_id}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::LoginRequired | AppError::NotAuthor { .. } => StatusCode::FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::LoginRequired => {
                // The login_redirect middleware appends `?next=<path>`.
                return HttpResponse::Found()
                    .insert_header((header::LOCATION, LOGIN_PATH))
                    .finish();
            }
            AppError::NotAuthor { post_id } => {
                return HttpResponse::Found()
                    .insert_header((header::LOCATION, format!("/posts/{post_id}/")))
                    .finish();
            }
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::Validation { field, message } => {
                ErrorResponse::invalid_field(field.clone(), message.clone())
            }
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized().with_detail(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DomainError::Validation { field, message } => AppError::Validation {
                field: field.to_string(),
                message,
            },
            DomainError::Permission { post_id } => AppError::NotAuthor { post_id },
            DomainError::AuthRequired => AppError::LoginRequired,
            DomainError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_redirects_to_the_post() {
        let err = AppError::from(DomainError::Permission { post_id: 7 });
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/posts/7/");
    }

    #[test]
    fn test_validation_is_unprocessable() {
        let err = AppError::from(DomainError::validation("text", "This field is required."));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_not_found_and_duplicate_statuses() {
        let err = AppError::from(DomainError::not_found("group", "cats"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = AppError::from(DomainError::Duplicate("slug taken".into()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
