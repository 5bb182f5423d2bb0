use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("Processor error: {entity_type} - {message}")]
    Processor { entity_type: String, message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Enrichment error: {message}")]
    Enrichment { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn processor(entity_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Processor {
            entity_type: entity_type.into(),
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn enrichment(message: impl Into<String>) -> Self {
        Self::Enrichment {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Unsupported method 'PUT'");
        assert_eq!(error.to_string(), "Validation error: Unsupported method 'PUT'");
    }

    #[test]
    fn test_processor_error() {
        let error = DomainError::processor("product", "price lookup failed");
        assert_eq!(
            error.to_string(),
            "Processor error: product - price lookup failed"
        );
    }

    #[test]
    fn test_auth_error() {
        let error = DomainError::auth("Invalid group token");
        assert_eq!(error.to_string(), "Authentication error: Invalid group token");
    }
}
