//! Client error types
//!
//! Generation failures are classified here, at the API boundary, so callers
//! decide on retries by matching [`GenerationError`] variants.

use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No API key configured
    #[error("API key is required")]
    MissingApiKey,
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of a single text-generation call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// Provider asked us to come back after `retry_after`
    #[error("Rate limited, retry in {:.1}s", .retry_after.as_secs_f64())]
    RateLimited { retry_after: Duration },

    /// Quota or rate limit hit without a suggested delay
    #[error("Quota exceeded: {0}")]
    Quota(String),

    /// Anything else; not worth retrying
    #[error("{0}")]
    Other(String),
}

impl From<ClientError> for GenerationError {
    fn from(err: ClientError) -> Self {
        Self::Other(err.to_string())
    }
}

/// Provider error envelope: `{"error": {"code", "message", "status", "details"}}`
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ProviderError,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

const RETRY_INFO_TYPE: &str = "type.googleapis.com/google.rpc.RetryInfo";
const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// "Please retry in 10.327166026s."
static RETRY_IN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?i)retry in (\d+(?:\.\d+)?)s").expect("valid retry-in pattern")
});

/// Extract the human readable message from a provider error body
pub fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
}

/// Classify a non-success generation response
///
/// Order of precedence:
/// 1. `RetryInfo.retryDelay` in the structured details
/// 2. a "retry in Ns" hint inside the message
/// 3. HTTP 429 / `RESOURCE_EXHAUSTED` / a quota mention → [`GenerationError::Quota`]
/// 4. everything else → [`GenerationError::Other`]
pub fn classify_error(status: StatusCode, body: &str) -> GenerationError {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let provider = envelope.error;

    let message = if provider.message.is_empty() {
        if body.trim().is_empty() {
            format!("Generation failed with status {status}")
        } else {
            body.trim().to_string()
        }
    } else {
        provider.message.clone()
    };

    if let Some(retry_after) = retry_delay_from_details(&provider.details)
        .or_else(|| retry_delay_from_message(&message))
    {
        return GenerationError::RateLimited { retry_after };
    }

    let rate_limited_status = status == StatusCode::TOO_MANY_REQUESTS
        || provider.code == Some(StatusCode::TOO_MANY_REQUESTS.as_u16())
        || provider.status.as_deref() == Some(RESOURCE_EXHAUSTED);
    let mentions_quota = message.contains("429") || message.to_lowercase().contains("quota");

    if rate_limited_status || mentions_quota {
        GenerationError::Quota(message)
    } else {
        GenerationError::Other(message)
    }
}

fn retry_delay_from_details(details: &[serde_json::Value]) -> Option<Duration> {
    details
        .iter()
        .filter(|d| d.get("@type").and_then(|t| t.as_str()) == Some(RETRY_INFO_TYPE))
        .find_map(|d| d.get("retryDelay").and_then(|v| v.as_str()))
        .and_then(parse_seconds)
}

fn retry_delay_from_message(message: &str) -> Option<Duration> {
    RETRY_IN
        .captures(message)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

/// Parse a protobuf duration string such as "10s" or "0.5s"
fn parse_seconds(value: &str) -> Option<Duration> {
    value
        .trim()
        .strip_suffix('s')
        .and_then(|n| n.parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}
