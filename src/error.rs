//! Error types and handling for the `TravelPrep` engine

use thiserror::Error;

/// Main error type for the `TravelPrep` engine
///
/// Unknown destinations, profiles and activities never surface here: they are
/// recorded on the generated checklist as skipped references instead.
#[derive(Error, Debug)]
pub enum TravelPrepError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed trip context
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Inconsistent or unreadable reference data (climate tables, catalogs, keywords)
    #[error("Reference data error: {message}")]
    ReferenceData { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON (de)serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl TravelPrepError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new reference data error
    pub fn reference_data<S: Into<String>>(message: S) -> Self {
        Self::ReferenceData {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelPrepError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            TravelPrepError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TravelPrepError::ReferenceData { .. } => {
                "Reference data could not be loaded. Please check the data directory.".to_string()
            }
            TravelPrepError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TravelPrepError::Json { .. } => {
                "The document is not valid JSON for this operation.".to_string()
            }
            TravelPrepError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = TravelPrepError::config("bad threshold");
        assert!(matches!(config_err, TravelPrepError::Config { .. }));

        let validation_err = TravelPrepError::validation("return before departure");
        assert!(matches!(validation_err, TravelPrepError::Validation { .. }));

        let data_err = TravelPrepError::reference_data("duplicate code FR");
        assert!(matches!(data_err, TravelPrepError::ReferenceData { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = TravelPrepError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = TravelPrepError::validation("return date precedes departure");
        assert!(
            validation_err
                .user_message()
                .contains("return date precedes departure")
        );

        let data_err = TravelPrepError::reference_data("test");
        assert!(data_err.user_message().contains("Reference data"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TravelPrepError = io_err.into();
        assert!(matches!(err, TravelPrepError::Io { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TravelPrepError = json_err.into();
        assert!(matches!(err, TravelPrepError::Json { .. }));
    }
}
