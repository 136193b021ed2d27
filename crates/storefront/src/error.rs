//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use blife_core::Identity;

use crate::repository::RepositoryError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data access failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The current identity may not perform this action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Errors that indicate a server fault rather than a bad request.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Template(_) | Self::Session(_) | Self::Internal(_)
        ) || matches!(
            self,
            Self::Repository(
                RepositoryError::Storage(_) | RepositoryError::DataCorruption { .. }
            )
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Repository(RepositoryError::NotFound(_)) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Repository(RepositoryError::Unsupported(_)) => StatusCode::NOT_IMPLEMENTED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Repository(_) | Self::Template(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Don't expose internal error details to clients
        let message = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Attach the signed-in identity to Sentry reports, or detach it on logout.
pub fn report_identity(identity: Option<&Identity>) {
    let user = identity.map(|identity| sentry::User {
        id: Some(identity.id.to_string()),
        email: Some(identity.email.to_string()),
        other: std::iter::once(("role".to_string(), identity.role.as_str().into())).collect(),
        ..Default::default()
    });
    sentry::configure_scope(|scope| scope.set_user(user));
}

/// Leave a Sentry breadcrumb for a marketplace action.
///
/// ```rust,ignore
/// breadcrumb("cart", "Added product", &[("product_id", "3")]);
/// ```
pub fn breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data: data
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).into()))
            .collect(),
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::Forbidden("seller only".to_string());
        assert_eq!(err.to_string(), "Forbidden: seller only");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::NotFound(
                "order".to_string()
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::Unsupported(
                "updateProduct"
            ))),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Internal("disk on fire".to_string());
        assert!(err.is_server_error());
        assert!(!AppError::BadRequest("x".to_string()).is_server_error());
    }
}
