use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {body}")]
    ApiStatusError { status: u16, body: String },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Manifest line {line}: {reason} ('{content}')")]
    ManifestParseError {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Manifest validation failed: {message}")]
    ValidationError { message: String },
}

/// 錯誤分類，供日誌與退出碼使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Configuration,
    Manifest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlaygroundError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::ApiStatusError { .. } => ErrorCategory::Network,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ManifestParseError { .. } | Self::ValidationError { .. } => {
                ErrorCategory::Manifest
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ApiError(_) | Self::ApiStatusError { .. } => ErrorSeverity::Medium,
            Self::ValidationError { .. } => ErrorSeverity::High,
            Self::ManifestParseError { .. } | Self::SerializationError(_) => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ValidationError { .. } => 1,
            _ => match self.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium | ErrorSeverity::High => 2,
                ErrorSeverity::Critical => 3,
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(e) if e.is_timeout() => {
                "The OpenRouter API did not respond in time".to_string()
            }
            Self::ApiError(_) => "Could not reach the OpenRouter API".to_string(),
            Self::ApiStatusError { status: 401, .. } => {
                "OpenRouter rejected the API key".to_string()
            }
            Self::ApiStatusError { status, .. } => {
                format!("OpenRouter answered with HTTP {}", status)
            }
            Self::MissingConfigError { field } => format!("'{}' is not configured", field),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity and the openrouter.base_url setting".to_string()
            }
            ErrorCategory::Io => "Check that the file exists and is readable".to_string(),
            ErrorCategory::Configuration => match self {
                Self::MissingConfigError { field } if field == "openrouter.api_key" => {
                    "Set OPENROUTER_API_KEY or add api_key under [openrouter]".to_string()
                }
                _ => "Review the configuration file and command-line flags".to_string(),
            },
            ErrorCategory::Manifest => {
                "Use one 'name>=version' specifier per line; comments start with '#'".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PlaygroundError>;
