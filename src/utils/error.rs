use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Queue does not exist: {queue_name}")]
    QueueNotFound { queue_name: String },

    #[error("Duplicate batch entry id: {id}")]
    DuplicateEntryId { id: String },

    #[error("Receipt handle is invalid: {message}")]
    ReceiptHandleInvalid { message: String },

    #[error("SQS {operation} failed ({}): {message}", .code.as_deref().unwrap_or("unknown"))]
    ServiceError {
        operation: String,
        code: Option<String>,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Service,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SqsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SqsError::ConfigError { .. }
            | SqsError::InvalidConfigValueError { .. }
            | SqsError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            SqsError::ValidationError { .. } | SqsError::DuplicateEntryId { .. } => {
                ErrorCategory::Validation
            }
            SqsError::QueueNotFound { .. }
            | SqsError::ReceiptHandleInvalid { .. }
            | SqsError::ServiceError { .. } => ErrorCategory::Service,
            SqsError::IoError(_) | SqsError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SqsError::ReceiptHandleInvalid { .. } => ErrorSeverity::Low,
            // 節流或暫時性錯誤，可重試
            SqsError::ServiceError { code, .. } if is_retryable_code(code.as_deref()) => {
                ErrorSeverity::Medium
            }
            SqsError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the config file, environment variables and command line flags"
            }
            ErrorCategory::Validation => "Check queue names, batch contents and receive limits",
            ErrorCategory::Service => match self {
                SqsError::QueueNotFound { .. } => {
                    "Make sure the queue exists in the configured region and account"
                }
                SqsError::ReceiptHandleInvalid { .. } => {
                    "Receive the messages again to obtain fresh receipt handles"
                }
                _ if self.severity() == ErrorSeverity::Medium => "Retry the request later",
                _ => "Check AWS credentials, permissions and the endpoint URL",
            },
            ErrorCategory::System => "Check local files and input data",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SqsError::QueueNotFound { queue_name } => {
                format!("Queue '{}' was not found", queue_name)
            }
            SqsError::ServiceError {
                operation, message, ..
            } => format!("SQS rejected the {} request: {}", operation, message),
            other => other.to_string(),
        }
    }
}

fn is_retryable_code(code: Option<&str>) -> bool {
    matches!(
        code,
        Some("RequestThrottled")
            | Some("ThrottlingException")
            | Some("ServiceUnavailable")
            | Some("InternalError")
            | Some("KmsThrottled")
    )
}

pub type Result<T> = std::result::Result<T, SqsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttling_is_retryable() {
        let err = SqsError::ServiceError {
            operation: "SendMessageBatch".to_string(),
            code: Some("RequestThrottled".to_string()),
            message: "slow down".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.category(), ErrorCategory::Service);
        assert_eq!(err.recovery_suggestion(), "Retry the request later");
    }

    #[test]
    fn test_service_error_display_without_code() {
        let err = SqsError::ServiceError {
            operation: "GetQueueUrl".to_string(),
            code: None,
            message: "dispatch failure".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "SQS GetQueueUrl failed (unknown): dispatch failure"
        );
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_queue_not_found_message() {
        let err = SqsError::QueueNotFound {
            queue_name: "orders".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "Queue 'orders' was not found");
        assert_eq!(err.category(), ErrorCategory::Service);
    }
}
