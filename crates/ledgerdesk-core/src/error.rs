//! Error types for ledgerdesk-core
//!
//! Every failure of a ledger operation is one of three kinds: local
//! validation (never reaches the network), a transport failure, or a
//! server rejection carrying the server's message. In all three the cache
//! is left exactly as it was before the call.

use ledgerdesk_config::ConfigError;
use ledgerdesk_remote::RemoteError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before any network call
    ValidationFailed,
    /// Transport-level failure
    NetworkFailure,
    /// Non-2xx response from the service
    ServerRejected,
    /// Login refused or privileged operation attempted without admin role
    Unauthorized,
    /// Transaction not in the local cache
    TransactionNotFound,
    /// Configuration error
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationFailed => write!(f, "VALIDATION_FAILED"),
            ErrorCode::NetworkFailure => write!(f, "NETWORK_FAILURE"),
            ErrorCode::ServerRejected => write!(f, "SERVER_REJECTED"),
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Detailed error information for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for ledgerdesk-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Validation failed: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Network failure: {message}")]
    NetworkFailure { message: String },

    #[error("Server rejected request ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: i64 },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        CoreError::ValidationFailed {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CoreError::NetworkFailure { .. } => ErrorCode::NetworkFailure,
            CoreError::ServerRejected { .. } => ErrorCode::ServerRejected,
            CoreError::Unauthorized => ErrorCode::Unauthorized,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ValidationFailed { .. } => ErrorSeverity::Warning,
            CoreError::NetworkFailure { .. } => ErrorSeverity::Error,
            CoreError::ServerRejected { .. } => ErrorSeverity::Error,
            CoreError::Unauthorized => ErrorSeverity::Warning,
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::Config { .. } => ErrorSeverity::Critical,
        }
    }

    /// True when the failure happened before any request was sent
    pub fn is_local(&self) -> bool {
        matches!(self, CoreError::ValidationFailed { .. } | CoreError::TransactionNotFound { .. })
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ValidationFailed { field, .. } => {
                details = details.with_detail(serde_json::json!({ "field": field }));
            }
            CoreError::NetworkFailure { .. } => {
                details = details.with_suggestion(
                    "Check that the bookkeeping service is running and remote.base_url is correct.".to_string()
                );
            }
            CoreError::ServerRejected { status, .. } => {
                details = details.with_detail(serde_json::json!({ "status": status }));
            }
            CoreError::Unauthorized => {
                details = details.with_suggestion(
                    "Sign in with an account that has the Admin role.".to_string()
                );
            }
            CoreError::TransactionNotFound { .. } => {
                details = details.with_suggestion(
                    "Refresh transactions; the record may have been deleted.".to_string()
                );
            }
            CoreError::Config { .. } => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<RemoteError> for CoreError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::Network { message } => CoreError::NetworkFailure { message },
            RemoteError::Decode { message } => CoreError::NetworkFailure { message },
            RemoteError::ServerRejected { status, body } => CoreError::ServerRejected { status, message: body },
        }
    }
}

impl From<ConfigError> for CoreError {
    fn from(error: ConfigError) -> Self {
        CoreError::Config { message: error.to_string() }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "ledgerdesk::error",
            "[{}] {} - Operation: {} - Context: {}",
            error.code(),
            error,
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================
