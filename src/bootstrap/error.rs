use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::app::AppError;
use crate::firestore::FirestoreError;
use crate::platform::environment::EnvironmentError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitializationErrorCode {
    /// A configuration field is empty.
    InvalidConfig,
    /// An app with the same name is already registered.
    DuplicateInitialization,
    /// The SDK refused the configuration.
    SdkRejected,
    /// No configuration could be read from the environment.
    ConfigUnavailable,
}

impl InitializationErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitializationErrorCode::InvalidConfig => "bootstrap/invalid-config",
            InitializationErrorCode::DuplicateInitialization => "bootstrap/duplicate-initialization",
            InitializationErrorCode::SdkRejected => "bootstrap/sdk-rejected",
            InitializationErrorCode::ConfigUnavailable => "bootstrap/config-unavailable",
        }
    }
}

/// Why startup could not produce a client handle. Always fatal.
#[derive(Clone, Debug)]
pub struct InitializationError {
    pub code: InitializationErrorCode,
    message: String,
}

impl InitializationError {
    pub fn new(code: InitializationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for InitializationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl Error for InitializationError {}

pub type BootstrapResult<T> = Result<T, InitializationError>;

pub fn invalid_config(message: impl Into<String>) -> InitializationError {
    InitializationError::new(InitializationErrorCode::InvalidConfig, message)
}

pub fn duplicate_initialization(message: impl Into<String>) -> InitializationError {
    InitializationError::new(InitializationErrorCode::DuplicateInitialization, message)
}

pub fn sdk_rejected(message: impl Into<String>) -> InitializationError {
    InitializationError::new(InitializationErrorCode::SdkRejected, message)
}

impl From<AppError> for InitializationError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::DuplicateApp { .. } => duplicate_initialization(err.to_string()),
            AppError::BadAppName { .. } => invalid_config(err.to_string()),
            other => sdk_rejected(other.to_string()),
        }
    }
}

impl From<FirestoreError> for InitializationError {
    fn from(err: FirestoreError) -> Self {
        sdk_rejected(err.to_string())
    }
}

impl From<EnvironmentError> for InitializationError {
    fn from(err: EnvironmentError) -> Self {
        InitializationError::new(InitializationErrorCode::ConfigUnavailable, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_app_maps_to_duplicate_initialization() {
        let err: InitializationError = AppError::DuplicateApp {
            app_name: "[DEFAULT]".into(),
        }
        .into();
        assert_eq!(err.code, InitializationErrorCode::DuplicateInitialization);
        assert!(err.to_string().ends_with("(bootstrap/duplicate-initialization)"));
    }

    #[test]
    fn firestore_rejection_maps_to_sdk_rejected() {
        let err: InitializationError = crate::firestore::error::missing_project_id().into();
        assert_eq!(err.code_str(), "bootstrap/sdk-rejected");
        assert!(err.message().contains("firestore/missing-project-id"));
    }

    #[test]
    fn missing_environment_maps_to_config_unavailable() {
        let err: InitializationError = EnvironmentError::NotConfigured.into();
        assert_eq!(err.code, InitializationErrorCode::ConfigUnavailable);
    }
}
