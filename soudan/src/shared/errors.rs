use thiserror::Error;

use crate::modules::config::ConfigError;
use crate::modules::consultation::ApplicationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Consultation error: {0}")]
    ConsultationError(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::SerializationError(msg) => AppError::SerializationError(msg),
            other => AppError::ConfigError(other.to_string()),
        }
    }
}

impl From<ApplicationError> for AppError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::UnsupportedLanguage(code) => AppError::UnsupportedLanguage(code),
            ApplicationError::ValidationError(msg) => AppError::ConfigError(msg),
            ApplicationError::ConsultationError(e) => AppError::NetworkError(e.to_string()),
            ApplicationError::TranscriptionError(e) => AppError::NetworkError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
