use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Feed format error: {message}")]
    FeedFormatError { message: String },

    #[error("Invalid earthquake record at index {index}: {reason}")]
    InvalidRecordError { index: usize, reason: String },

    #[error("Invalid boundary dataset: {message}")]
    BoundaryFormatError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Io,
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MapError::ApiError(_) | MapError::HttpStatusError { .. } => ErrorCategory::Network,
            MapError::SerializationError(_)
            | MapError::FeedFormatError { .. }
            | MapError::InvalidRecordError { .. }
            | MapError::BoundaryFormatError { .. } => ErrorCategory::Data,
            MapError::ConfigValidationError { .. } | MapError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            MapError::IoError(_) => ErrorCategory::Io,
            MapError::RenderError { .. } => ErrorCategory::Render,
        }
    }

    /// 嚴重程度決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Render => ErrorSeverity::Critical,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, MapError::ApiError(e) if e.is_timeout())
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MapError::ApiError(e) if e.is_timeout() => {
                "The feed did not answer in time; raise --timeout-seconds or try again later"
                    .to_string()
            }
            MapError::ApiError(_) => {
                "Check your network connection and that the feed URL is reachable".to_string()
            }
            MapError::HttpStatusError { status, .. } if *status >= 500 => {
                "The feed server is having trouble; try again in a few minutes".to_string()
            }
            MapError::HttpStatusError { .. } => "Check the feed URL".to_string(),
            MapError::SerializationError(_) | MapError::FeedFormatError { .. } => {
                "Make sure the URL points to a GeoJSON earthquake feed".to_string()
            }
            MapError::InvalidRecordError { .. } => {
                "Re-run with --skip-invalid to drop malformed records".to_string()
            }
            MapError::BoundaryFormatError { .. } => {
                "Point --plates at a GeoJSON file, or pass --no-plates".to_string()
            }
            MapError::ConfigValidationError { .. } | MapError::InvalidConfigValueError { .. } => {
                "Review the command line arguments or the TOML configuration".to_string()
            }
            MapError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            MapError::RenderError { .. } => "This is a bug; please report it".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download map data: {}", self),
            ErrorCategory::Data => format!("The downloaded data is not usable: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Io => format!("Could not write the map: {}", self),
            ErrorCategory::Render => format!("Could not build the map: {}", self),
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_record_names_index() {
        let err = MapError::InvalidRecordError {
            index: 7,
            reason: "magnitude is missing".to_string(),
        };
        assert!(err.to_string().contains("index 7"));
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_network_errors_are_retryable() {
        let err = MapError::HttpStatusError {
            url: "https://example.com/feed".to_string(),
            status: 503,
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
        assert!(err.recovery_suggestion().contains("try again"));
        assert!(err.user_friendly_message().starts_with("Could not download"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = MapError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }
}
