use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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

    #[error("Logger setup failed: {message}")]
    LoggerError { message: String },

    #[error("Runtime setup failed: {message}")]
    RuntimeError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Logging,
    Runtime,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code used when a bootstrap step fails with this
    /// severity. Never zero.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl LaunchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LaunchError::ConfigValidationError { .. }
            | LaunchError::InvalidConfigValueError { .. }
            | LaunchError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LaunchError::LoggerError { .. } => ErrorCategory::Logging,
            LaunchError::RuntimeError { .. } => ErrorCategory::Runtime,
            LaunchError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Logging | ErrorCategory::Io => {
                ErrorSeverity::High
            }
            ErrorCategory::Runtime => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LaunchError::IoError(e) => format!("Could not read a required file: {}", e),
            LaunchError::ConfigValidationError { field, message } => {
                format!("The configuration could not be loaded ({}): {}", field, message)
            }
            LaunchError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for {}: {}", value, field, reason)
            }
            LaunchError::MissingConfigError { field } => {
                format!("The setting '{}' is required but was not provided", field)
            }
            LaunchError::LoggerError { message } => {
                format!("Logging could not be configured: {}", message)
            }
            LaunchError::RuntimeError { message } => {
                format!("The application runtime could not be started: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LaunchError::IoError(_) => "Check that the config file exists and is readable",
            LaunchError::ConfigValidationError { .. } => {
                "Make sure the config file is valid TOML with [logging], [delegate] and [monitoring] sections"
            }
            LaunchError::InvalidConfigValueError { .. } => {
                "Fix the value in the config file or override it on the command line"
            }
            LaunchError::MissingConfigError { .. } => {
                "Add the missing setting, or pass the program after `--` on the command line"
            }
            LaunchError::LoggerError { .. } => {
                "Use a valid filter such as `info` or `kernel_boot=debug,info`, or unset RUST_LOG"
            }
            LaunchError::RuntimeError { .. } => {
                "Check system resource limits (threads, file descriptors) and retry"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_with_one() {
        let err = LaunchError::MissingConfigError {
            field: "delegate.program".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity().exit_code(), 1);
        assert!(err.user_friendly_message().contains("delegate.program"));
    }

    #[test]
    fn test_runtime_errors_are_critical() {
        let err = LaunchError::RuntimeError {
            message: "no threads".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().exit_code(), 3);
    }

    #[test]
    fn test_every_bootstrap_failure_exits_non_zero() {
        let errors = vec![
            LaunchError::IoError(std::io::Error::other("disk")),
            LaunchError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: "bad".to_string(),
            },
            LaunchError::InvalidConfigValueError {
                field: "logging.prefix".to_string(),
                value: "A\\nB".to_string(),
                reason: "newline".to_string(),
            },
            LaunchError::MissingConfigError {
                field: "delegate.program".to_string(),
            },
            LaunchError::LoggerError {
                message: "bad filter".to_string(),
            },
            LaunchError::RuntimeError {
                message: "no threads".to_string(),
            },
        ];

        for err in errors {
            assert_ne!(err.severity().exit_code(), 0, "{:?}", err);
        }
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LaunchError = io.into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().contains("missing"));
    }
}
