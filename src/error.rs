use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

/// Violated invariants raised by value objects and entities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid {entity} name: {reason}")]
    InvalidName { entity: String, reason: String },

    #[error("Invalid card title: {0}")]
    InvalidTitle(String),

    #[error("Invalid card description: {0}")]
    InvalidDescription(String),

    #[error("{entity} with id '{id}' not found")]
    EntityNotFound { entity: String, id: String },

    #[error("{0}")]
    InvalidOperation(String),
}

impl DomainError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName { .. } => "INVALID_NAME",
            Self::InvalidTitle(_) => "INVALID_TITLE",
            Self::InvalidDescription(_) => "INVALID_DESCRIPTION",
            Self::EntityNotFound { .. } => "NOT_FOUND",
            Self::InvalidOperation(_) => "INVALID_OPERATION",
        }
    }
}

/// Failures raised by use cases
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),
}

impl ApplicationError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
        }
    }
}

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl KanbanError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Domain(err) => err.code(),
            Self::Application(err) => err.code(),
            Self::StorageError(_) => "INTERNAL_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// HTTP-style status a transport boundary should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(_) => 400,
            Self::Application(err) => err.status_code(),
            Self::StorageError(_) | Self::ConfigError(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::NotFound { .. })
                | Self::Domain(DomainError::EntityNotFound { .. })
        )
    }
}

#[cfg(feature = "sqlite-storage")]
impl From<rusqlite::Error> for KanbanError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

/// Error body handed back to callers of the REST surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
}

impl From<&KanbanError> for ErrorResponse {
    fn from(err: &KanbanError) -> Self {
        // Internal failures are not echoed to clients
        let message = match err {
            KanbanError::StorageError(_) | KanbanError::ConfigError(_) => {
                "Internal server error".to_string()
            }
            _ => err.to_string(),
        };
        Self {
            message,
            code: err.code().to_string(),
        }
    }
}
