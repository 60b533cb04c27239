use thiserror::Error;

/// Exit code for usage errors. Shows up as 255 on unix.
pub const USAGE_EXIT_CODE: i32 = -1;

#[derive(Error, Debug)]
pub enum PrefError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingConfigError { field: String },

    #[error("Usage error: {message}")]
    UsageError { message: String },

    #[error("Preference store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Preference store query failed: {message}")]
    StoreError { message: String },
}

impl PrefError {
    pub fn config(message: impl Into<String>) -> Self {
        PrefError::ConfigError {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        PrefError::StoreError {
            message: message.into(),
        }
    }

    /// 給使用者看的錯誤訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            PrefError::IoError(e) => format!("Could not read a file: {}", e),
            PrefError::SerializationError(e) => format!("Could not encode the report: {}", e),
            PrefError::ConfigError { message } => format!("Configuration problem: {}", message),
            PrefError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            PrefError::MissingConfigError { field } => format!("Missing setting '{}'", field),
            PrefError::UsageError { message } => message.clone(),
            PrefError::StoreUnavailable { message } => {
                format!("No preference store available: {}", message)
            }
            PrefError::StoreError { message } => format!("Preference lookup failed: {}", message),
        }
    }

    /// 建議的處理方式
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PrefError::IoError(_) => "Check that the file exists and is readable",
            PrefError::SerializationError(_) => "Retry without --json",
            PrefError::ConfigError { .. }
            | PrefError::InvalidConfigValueError { .. }
            | PrefError::MissingConfigError { .. } => {
                "Fix the configuration file or point --config at another one"
            }
            PrefError::UsageError { .. } => "Run with --help to see the expected arguments",
            PrefError::StoreUnavailable { .. } => {
                "Pass --snapshot <file> when not running on macOS"
            }
            PrefError::StoreError { .. } => "Check that the preference daemon is reachable",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            PrefError::UsageError { .. } => USAGE_EXIT_CODE,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PrefError>;
