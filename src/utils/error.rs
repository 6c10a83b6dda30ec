use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Verification failed: {check} ({failures} failing checks)")]
    VerificationFailed { check: String, failures: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Verification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VerifyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            VerifyError::IoError(_) | VerifyError::ZipError(_) => ErrorCategory::Io,
            VerifyError::CsvError(_)
            | VerifyError::SerializationError(_)
            | VerifyError::ProcessingError { .. } => ErrorCategory::Data,
            VerifyError::ConfigValidationError { .. }
            | VerifyError::InvalidConfigValueError { .. }
            | VerifyError::MissingConfigError { .. } => ErrorCategory::Configuration,
            VerifyError::VerificationFailed { .. } => ErrorCategory::Verification,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Verification => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            VerifyError::IoError(_) | VerifyError::ZipError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            VerifyError::CsvError(_) | VerifyError::SerializationError(_) => {
                "Re-run with --verbose to see which record could not be written".to_string()
            }
            VerifyError::ConfigValidationError { field, .. }
            | VerifyError::InvalidConfigValueError { field, .. }
            | VerifyError::MissingConfigError { field } => {
                format!("Fix the '{}' setting and run again", field)
            }
            VerifyError::ProcessingError { .. } => {
                "Reduce the bounds or re-run with --verbose for details".to_string()
            }
            VerifyError::VerificationFailed { .. } => {
                "Inspect the exported CSV files for rows with Match = False".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not write results: {}", self),
            ErrorCategory::Data => format!("Could not format results: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Verification => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        let io = VerifyError::IoError(std::io::Error::other("disk full"));
        assert_eq!(io.category(), ErrorCategory::Io);
        assert_eq!(io.severity(), ErrorSeverity::Critical);

        let config = VerifyError::MissingConfigError {
            field: "output.path".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::Medium);
        assert!(config.recovery_suggestion().contains("output.path"));

        let failed = VerifyError::VerificationFailed {
            check: "local roots".to_string(),
            failures: 2,
        };
        assert_eq!(failed.severity(), ErrorSeverity::High);
        assert_eq!(
            failed.to_string(),
            "Verification failed: local roots (2 failing checks)"
        );
    }
}
