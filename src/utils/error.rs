use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid event: {reason}")]
    InvalidEvent { reason: String },

    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: String },

    #[error("{service} responded with HTTP {status}: {body}")]
    UpstreamError {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Message delivery failed for chat(s) {}: {message}", .failed_chat_ids.join(", "))]
    DeliveryError {
        failed_chat_ids: Vec<String>,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Upstream,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl NotifyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NotifyError::ConfigValidationError { .. }
            | NotifyError::MissingConfigError { .. }
            | NotifyError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            NotifyError::ApiError(_) => ErrorCategory::Network,
            NotifyError::UpstreamError { .. } | NotifyError::DeliveryError { .. } => {
                ErrorCategory::Upstream
            }
            NotifyError::OrderNotFound { .. }
            | NotifyError::InvalidEvent { .. }
            | NotifyError::SerializationError(_) => ErrorCategory::Data,
            NotifyError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 找不到訂單：沒有可通知的內容
            NotifyError::OrderNotFound { .. } => ErrorSeverity::Low,
            NotifyError::ApiError(_)
            | NotifyError::UpstreamError { .. }
            | NotifyError::DeliveryError { .. } => ErrorSeverity::Medium,
            NotifyError::SerializationError(_)
            | NotifyError::InvalidEvent { .. }
            | NotifyError::ConfigValidationError { .. }
            | NotifyError::MissingConfigError { .. }
            | NotifyError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            NotifyError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            NotifyError::ApiError(_) => {
                "Check network connectivity and that the Medusa / Telegram endpoints are reachable"
                    .to_string()
            }
            NotifyError::IoError(_) => "Check file paths and permissions".to_string(),
            NotifyError::SerializationError(_) => {
                "The upstream response did not match the expected shape; check the API version"
                    .to_string()
            }
            NotifyError::ConfigValidationError { .. } => {
                "Review the configuration file syntax and values".to_string()
            }
            NotifyError::MissingConfigError { field } => {
                format!("Set '{}' in the config file or environment", field)
            }
            NotifyError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}'", field)
            }
            NotifyError::InvalidEvent { .. } => {
                "Send the order id as 'id' or 'order_id' in the event payload".to_string()
            }
            NotifyError::OrderNotFound { .. } => {
                "Verify the order id exists in the Medusa admin".to_string()
            }
            NotifyError::UpstreamError { status, .. } if *status == 401 || *status == 403 => {
                "Check the API token has admin access".to_string()
            }
            NotifyError::UpstreamError { .. } => {
                "Retry later; the upstream service returned an error".to_string()
            }
            NotifyError::DeliveryError { .. } => {
                "Make sure the bot is a member of the group and the group id is correct"
                    .to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            NotifyError::ApiError(_) => "Could not reach a remote service".to_string(),
            NotifyError::OrderNotFound { order_id } => {
                format!("Order '{}' does not exist", order_id)
            }
            NotifyError::DeliveryError {
                failed_chat_ids, ..
            } => format!(
                "Notification could not be delivered to {} chat(s)",
                failed_chat_ids.len()
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
