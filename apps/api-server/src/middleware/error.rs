//! Error-response boundary.
//!
//! Handlers return `ApiResult` and never build error responses themselves;
//! this is the single place where an error becomes an HTTP status plus a
//! `{name, message}` body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::ports::AuthError;
use quill_core::{PostError, RepoError};
use quill_shared::ErrorBody;
use std::fmt;

/// Application-level error type.
#[derive(Debug)]
pub enum ApiError {
    /// Post-operation failures: ownership, not-found, creation failure.
    Post(PostError),
    /// Errors forwarded from the persistence layer with their original
    /// name and message.
    Store(RepoError),
    /// Authentication failures from the identity extractor or login.
    Auth(AuthError),
    /// Registration with a username that is already taken.
    UserExists,
    /// Malformed input caught before any store call.
    Validation(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Post(err) => write!(f, "{err}"),
            ApiError::Store(err) => write!(f, "{err}"),
            ApiError::Auth(err) => write!(f, "{err}"),
            ApiError::UserExists => write!(f, "A user by that username already exists"),
            ApiError::Validation(msg) => write!(f, "{msg}"),
        }
    }
}

impl ApiError {
    /// The discriminating error name carried in the response body.
    pub fn name(&self) -> &'static str {
        match self {
            ApiError::Post(err) => err.name(),
            ApiError::Store(err) => err.name(),
            ApiError::Auth(err) => err.name(),
            ApiError::UserExists => "UserExistsError",
            ApiError::Validation(_) => "ValidationError",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Post(PostError::UnauthorizedUpdate)
            | ApiError::Post(PostError::UnauthorizedDelete) => StatusCode::FORBIDDEN,
            ApiError::Post(PostError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Post(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(AuthError::HashingError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::UserExists => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(name = self.name(), "Request failed: {}", self);
        }

        HttpResponse::build(self.status_code())
            .json(ErrorBody::new(self.name(), self.to_string()))
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        // Store failures keep their own name/message instead of being
        // relabelled as post errors.
        match err {
            PostError::Store(repo) => ApiError::Store(repo),
            other => ApiError::Post(other),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        ApiError::Store(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
