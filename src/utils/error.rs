use std::fmt;
use thiserror::Error;

/// A single field-level problem found while validating a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field error found in one submission, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Tutor catalog is unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid sort option: {value:?}")]
    InvalidSortOption { value: String },

    #[error("Could not persist to {collection}: {message}")]
    PersistenceFailure { collection: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Service,
    NotFound,
    Validation,
    Persistence,
    Configuration,
}

impl BookingError {
    pub fn not_found(entity: &'static str, key: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn persistence(collection: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::PersistenceFailure {
            collection: collection.into(),
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CatalogUnavailable { .. } => ErrorCategory::Service,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Validation(_) | Self::InvalidSortOption { .. } => ErrorCategory::Validation,
            Self::PersistenceFailure { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::Persistence
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } | Self::TomlError(_) => {
                ErrorCategory::Configuration
            }
        }
    }

    /// Whether the caller can carry on serving the visitor (re-render a form,
    /// show a not-found page, offer a retry).
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self.category(),
            ErrorCategory::Service | ErrorCategory::Configuration
        )
    }

    /// HTTP status an adapter would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::CatalogUnavailable { .. } => 503,
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 422,
            Self::InvalidSortOption { .. } => 400,
            _ => 500,
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
