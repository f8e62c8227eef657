use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failures talking to the payment gateway
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
    },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimitError { message: String },

    #[error("Provider error: {message}")]
    ProviderError {
        message: String,
        http_status: Option<u16>,
        retryable: bool,
    },
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::ValidationError { .. } => false,
            GatewayError::NetworkError { .. } => true,
            GatewayError::RateLimitError { .. } => true,
            GatewayError::ProviderError { retryable, .. } => *retryable,
        }
    }

    /// Numeric code reported through the failure callback. `-1` when the
    /// gateway never answered with a status.
    pub fn numeric_code(&self) -> i32 {
        match self {
            GatewayError::ValidationError { .. } => 400,
            GatewayError::NetworkError { .. } => -1,
            GatewayError::RateLimitError { .. } => 429,
            GatewayError::ProviderError { http_status, .. } => {
                http_status.map(i32::from).unwrap_or(-1)
            }
        }
    }
}
