use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Malformed tariff tree: {0}")]
    MalformedTree(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }

    /// Whether this error came from the settings store rather than from the
    /// tree contents. Callers show a retry state for these.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl From<InfraError> for DomainError {
    fn from(err: InfraError) -> Self {
        DomainError::Storage(err.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infra_errors_surface_as_storage_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "tariffs.json");
        let err: DomainError = InfraError::from(io).into();
        assert!(err.is_store_failure());
        assert!(err.to_string().contains("tariffs.json"));
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let err = DomainError::not_found("Origin", "code", "China");
        assert_eq!(err.to_string(), "Not found: Origin with code=China");
        assert!(!err.is_store_failure());
    }
}
