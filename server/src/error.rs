use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::views::ErrorPage;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("The CSRF token is missing or invalid.")]
    BadCsrf,

    #[error("Malformed form submission: {0}")]
    MalformedForm(String),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Upload failed: {0}")]
    Upload(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadCsrf | AppError::MalformedForm(_) => StatusCode::BAD_REQUEST,
            AppError::Database(diesel::result::Error::NotFound) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Template(_)
            | AppError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let page = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            ErrorPage::new(
                status,
                "Something went wrong",
                "An unexpected error occurred. Please try again later.",
            )
        } else if status == StatusCode::NOT_FOUND {
            ErrorPage::new(
                status,
                "Page not found",
                "The page you were looking for doesn't exist.",
            )
        } else {
            tracing::warn!(error = %self, "rejected request");
            ErrorPage::new(status, "Bad request", &self.to_string())
        };

        match askama::Template::render(&page) {
            Ok(body) => (status, Html(body)).into_response(),
            // The error page itself failed; fall back to plain text.
            Err(e) => {
                tracing::error!(error = %e, "failed to render error page");
                (status, status.canonical_reason().unwrap_or("Error")).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadCsrf.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Database(diesel::result::Error::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(diesel::result::Error::BrokenTransactionManager).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_renders_page() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_csrf_renders_bad_request() {
        let response = AppError::BadCsrf.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
