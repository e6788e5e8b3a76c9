use thiserror::Error;

/// Every variant carries the message shown to the end user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    NotEnrolled(String),
    #[error("storage error: {0}")]
    Storage(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn student_not_found(id: &str) -> Self { Self::NotFound(format!("Student ID {id} not found.")) }

    pub fn course_not_found(id: &str) -> Self { Self::NotFound(format!("Course ID {id} not found.")) }

    /// Stable category name, used in logs and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::NotEnrolled(_) => "not_enrolled",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        Self::Validation(e.message().to_string())
    }
}
