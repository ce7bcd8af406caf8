use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed: {0}")]
    InvalidFields(FieldErrors),

    /// The event backend (database or hosted API) failed.
    #[error("Backend error: {message}")]
    Backend {
        code: Option<String>,
        message: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing event.
    pub fn event_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: "Event",
            id: id.into(),
        }
    }

    /// Backend failure without a machine-readable code.
    pub fn backend(message: impl Into<String>) -> Self {
        CoreError::Backend {
            code: None,
            message: message.into(),
        }
    }
}

/// Result alias used across the event source boundary.
pub type CoreResult<T> = Result<T, CoreError>;
