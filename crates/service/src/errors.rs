use thiserror::Error;

use crate::customer::domain::UniqueField;
use crate::customer::repository::RepositoryError;
use crate::customer::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("customer already exists with {field}: {value}")]
    Conflict { field: UniqueField, value: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    /// `customer not found with <key>: <value>`
    pub fn not_found_by(key: &str, value: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("customer not found with {}: {}", key, value))
    }

    pub fn conflict(field: UniqueField, value: impl Into<String>) -> Self {
        Self::Conflict { field, value: value.into() }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict { .. } => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Db(_) => 1200,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::UniqueViolation { field, value } => Self::Conflict { field, value },
            RepositoryError::NotFound(id) => Self::not_found_by("id", id),
            RepositoryError::Backend(msg) => Self::Db(msg),
        }
    }
}
