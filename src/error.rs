use config::ConfigError;
use isahc::{Error as rError, http::StatusCode};
use url::ParseError;

pub const MAX_BATCH_SIZE: usize = 300;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid IP address format")]
    InvalidIp,
    #[error(
        "API key not configured. Use configure() with an api_key or set IPMONSTER_API_KEY environment variable"
    )]
    MissingApiKey,
    #[error("{0}")]
    Batch(#[from] BatchError),
    #[error("IP Monster API error: {message}")]
    Api { status: StatusCode, message: String },
    #[error("Request timeout after {0}ms")]
    Timeout(u64),
    #[error("Isahc Error: {0}")]
    Isahc(#[from] rError),
    #[error("Http Error: {0}")]
    Http(#[from] isahc::http::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] ParseError),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    IOError(#[from] std::io::Error),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid log filter {filter:?}: {reason}")]
    LogFilter { filter: String, reason: String },
}

impl Error {
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidIp => "invalid_ip",
            Error::MissingApiKey => "missing_api_key",
            Error::Batch(err) => err.code(),
            Error::Api { .. } => "api_error",
            Error::Timeout(_) => "timeout",
            Error::Isahc(_) => "http_client_error",
            Error::Http(_) => "http_request_error",
            Error::Url(_) => "invalid_url",
            Error::Json(_) => "invalid_json",
            Error::IOError(_) => "io_error",
            Error::Config(_) => "config_error",
            Error::LogFilter { .. } => "log_filter_error",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("IPs must be an array")]
    NotArray,
    #[error("At least one IP address is required")]
    Empty,
    #[error("Maximum of {} IP addresses per request", MAX_BATCH_SIZE)]
    TooMany,
    #[error("No valid IP Addresses to process")]
    NoValidIps,
}

impl BatchError {
    fn code(&self) -> &'static str {
        match self {
            BatchError::NotArray => "batch_not_array",
            BatchError::Empty => "batch_empty",
            BatchError::TooMany => "batch_too_many",
            BatchError::NoValidIps => "batch_no_valid_ips",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_error_taxonomy() {
        assert_eq!(Error::InvalidIp.to_string(), "Invalid IP address format");
        assert_eq!(Error::Timeout(250).to_string(), "Request timeout after 250ms");
        assert_eq!(
            Error::from(BatchError::TooMany).to_string(),
            "Maximum of 300 IP addresses per request"
        );
        assert_eq!(
            Error::api(StatusCode::UNAUTHORIZED, "bad key").to_string(),
            "IP Monster API error: bad key"
        );
        assert!(Error::MissingApiKey.to_string().contains("IPMONSTER_API_KEY"));
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(Error::from(BatchError::Empty).code(), "batch_empty");
        assert_eq!(Error::Timeout(1).code(), "timeout");
    }
}
