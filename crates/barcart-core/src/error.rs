use thiserror::Error;

/// Errors raised by the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid {field}: '{value}'")]
    Validation { field: &'static str, value: String },

    #[error("Malformed record '{key}': {reason}")]
    Format { key: String, reason: String },
}

impl StoreError {
    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Storage(format!("{}: {}", context, err))
    }

    pub fn format(key: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Format {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, StoreError::Storage(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, StoreError::Format { .. })
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
