use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vitrine_core::error::CoreError;
use vitrine_pipeline::PublishError;
use vitrine_social::SocialApiError;
use vitrine_storage::StorageError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vitrine_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure anywhere in the publish flow.
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// An object storage failure outside the publish flow (asset uploads).
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Publish flow errors ---
            AppError::Publish(publish) => classify_publish_error(publish),

            // --- Storage errors (asset uploads) ---
            AppError::Storage(err) => (StatusCode::BAD_GATEWAY, "UPLOAD_FAILED", err.to_string()),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a publish flow error into an HTTP status, error code, and message.
///
/// - Content problems the editor can fix (slide count, broken custom
///   element, render failure) map to 422.
/// - State conflicts (already published, unapproved subject) map to 409.
/// - Upstream failures (upload, platform rejection) map to 502; the
///   platform's rejection detail passes through verbatim.
fn classify_publish_error(err: &PublishError) -> (StatusCode, &'static str, String) {
    match err {
        PublishError::InvalidSlideCount(_) | PublishError::InvalidCustomElement { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            err.to_string(),
        ),
        PublishError::ModerationNotApproved { .. } => {
            (StatusCode::CONFLICT, "CONFLICT", err.to_string())
        }
        PublishError::SlideRender { index, source } => {
            tracing::error!(slide = index + 1, error = %source, "Slide render failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "RENDER_FAILED",
                format!(
                    "Could not generate the image for slide {}. Adjust the slide and try again",
                    index + 1
                ),
            )
        }
        PublishError::Upload { .. } => (StatusCode::BAD_GATEWAY, "UPLOAD_FAILED", err.to_string()),
        PublishError::Rejected(social) => match social {
            SocialApiError::Rejected { detail, .. } => {
                (StatusCode::BAD_GATEWAY, "REMOTE_REJECTED", detail.clone())
            }
            SocialApiError::Request(e) => {
                tracing::error!(error = %e, "Publishing platform unreachable");
                (
                    StatusCode::BAD_GATEWAY,
                    "REMOTE_UNREACHABLE",
                    "Could not reach the publishing platform".to_string(),
                )
            }
        },
        PublishError::AlreadyPublished => {
            (StatusCode::CONFLICT, "CONFLICT", err.to_string())
        }
        PublishError::Database(e) => classify_sqlx_error(e),
        PublishError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal publish error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
