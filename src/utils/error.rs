use thiserror::Error;

/// 支付服務回傳的錯誤，附帶類 HTTP 狀態碼
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Payment error ({status}): {message}")]
pub struct PaymentError {
    pub status: u16,
    pub message: String,
}

impl PaymentError {
    pub const REJECTED: u16 = 400;
    pub const INTERNAL: u16 = 500;
    pub const TIMEOUT: u16 = 504;

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: Self::REJECTED,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: Self::INTERNAL,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self {
            status: Self::TIMEOUT,
            message: "Payment service timeout".to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.status == Self::TIMEOUT
    }
}

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Base64 decoding failed: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Invalid email address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Email composition failed: {0}")]
    EmailBuildError(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    #[error(transparent)]
    PaymentError(#[from] PaymentError),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Push delivery error: {message}")]
    PushError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IntegrationError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    pub fn push(message: impl Into<String>) -> Self {
        Self::PushError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// 錯誤嚴重程度，CLI 依此決定退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ApiError(_) | Self::SmtpError(_) | Self::PushError { .. } => ErrorSeverity::Medium,
            Self::PaymentError(e) if e.is_timeout() => ErrorSeverity::Medium,
            Self::PaymentError(_)
            | Self::StorageError { .. }
            | Self::Base64Error(_)
            | Self::AddressError(_)
            | Self::EmailBuildError(_)
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::PaymentError(e) => format!("Payment failed: {}", e.message),
            Self::Base64Error(_) => "The supplied file is not valid base64".to_string(),
            Self::AddressError(_) => "The email address is not valid".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IntegrationError>;
