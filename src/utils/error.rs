use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatentError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    ApiError { status: Option<u16>, message: String },

    #[error("{message}")]
    OperationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Data,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PatentError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::OperationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::ApiError { .. } => ErrorCategory::Upstream,
            Self::CsvError(_) | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::Data
            }
            Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } | Self::OperationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } | Self::OperationError { .. } => ErrorSeverity::Low,
            Self::HttpError(_) => ErrorSeverity::Medium,
            Self::ApiError { status, .. } => match status {
                Some(429) | Some(500..=599) => ErrorSeverity::Medium,
                _ => ErrorSeverity::High,
            },
            Self::CsvError(_) | Self::SerializationError(_) => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    /// 給使用者的修復建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) => "Check network connectivity to the USPTO API and try again",
            Self::ApiError {
                status: Some(403), ..
            } => "Verify the API key configured under [api] or in USPTO_API_KEY",
            Self::ApiError {
                status: Some(429), ..
            } => "The API is rate limiting requests; wait a moment before searching again",
            Self::ApiError { .. } => "Check the search parameters or retry later",
            Self::CsvError(_) | Self::SerializationError(_) => {
                "The API response could not be processed; enable debug mode to inspect it"
            }
            Self::IoError(_) => "Check file permissions and that the path exists",
            Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file and restart the server"
            }
            Self::ValidationError { .. } => "Correct the highlighted search fields",
            Self::OperationError { .. } => "Use one of: search, export_csv, test_connection",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the patent API: {}", self),
            ErrorCategory::Upstream => format!("The patent API returned an error: {}", self),
            ErrorCategory::Data => format!("Failed to process patent data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PatentError>;
