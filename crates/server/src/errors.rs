use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// HTTP status for each service error category.
pub fn status_for(e: &ServiceError) -> StatusCode {
    match e {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::AlreadyExists(_) | ServiceError::NotEnrolled(_) => StatusCode::CONFLICT,
        ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error body: `{"error": <title>, "message": <detail>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let title = match &e {
            ServiceError::Validation(_) => "Validation Error",
            ServiceError::NotFound(_) => "Not Found",
            ServiceError::AlreadyExists(_) => "Already Exists",
            ServiceError::NotEnrolled(_) => "Not Enrolled",
            ServiceError::Storage(_) => "Internal Server Error",
        };
        Self::new(status_for(&e), title, Some(e.to_string()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = ?self.detail, "api request failed");
        }
        let body = serde_json::json!({"error": self.title, "message": self.detail});
        (self.status, Json(body)).into_response()
    }
}

/// Failure while rendering an HTML page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let msg = self.to_string();
        error!(error = %msg, "page render failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(status_for(&ServiceError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&ServiceError::student_not_found("S1")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&ServiceError::AlreadyExists("x".into())), StatusCode::CONFLICT);
        assert_eq!(status_for(&ServiceError::NotEnrolled("x".into())), StatusCode::CONFLICT);
        assert_eq!(status_for(&ServiceError::Storage("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn api_error_keeps_service_message() {
        let err = JsonApiError::from(ServiceError::course_not_found("C9"));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.detail.as_deref(), Some("Course ID C9 not found."));
    }
}
