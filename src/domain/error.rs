use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Cache unavailable: {backend} - {message}")]
    CacheUnavailable { backend: String, message: String },

    #[error("Data source error: {message}")]
    DataSource { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn cache_unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CacheUnavailable {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn data_source(message: impl Into<String>) -> Self {
        Self::DataSource {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true for the by-id absence signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Product '999' not found");
        assert_eq!(error.to_string(), "Not found: Product '999' not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_cache_unavailable_error() {
        let error = DomainError::cache_unavailable("redis", "Connection refused");
        assert_eq!(
            error.to_string(),
            "Cache unavailable: redis - Connection refused"
        );
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_serialization_error() {
        let error = DomainError::serialization("expected value at line 1 column 1");
        assert_eq!(
            error.to_string(),
            "Serialization error: expected value at line 1 column 1"
        );
    }
}
