use std::path::PathBuf;

use reqwest::header::HeaderMap;
use thiserror::Error;

use crate::utils::log_sanitizer::truncate_for_log;

/// Unified error type for every DNSimple client operation.
///
/// Read and write paths report failures the same way: a non-success HTTP
/// status becomes [`Api`](Self::Api) carrying the status code, the raw
/// response body and the response headers, whichever method was used.
///
/// Local lookups that find nothing (an unknown domain name, a missing apex
/// record, no credentials file) are not errors; those operations return
/// `Ok(false)` / `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum DnsimpleError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("Network error: {detail}")]
    Network {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The API answered with a status other than the one the operation expects.
    #[error("API request failed (HTTP {status}): {}", truncate_for_log(.body))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body, verbatim.
        body: String,
        /// Response headers.
        headers: HeaderMap,
    },

    /// Failed to parse the API response.
    #[error("Parse error: {detail}")]
    Parse {
        /// Details about the parse failure.
        detail: String,
    },

    /// A credentials file was found but could not be used.
    #[error("Invalid credentials file {}: {detail}", .path.display())]
    CredentialsFile {
        /// Location of the offending file.
        path: PathBuf,
        /// What is wrong with it.
        detail: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {detail}")]
    HttpClient {
        /// Error details.
        detail: String,
    },
}

impl DnsimpleError {
    /// HTTP status code of an [`Api`](Self::Api) error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the API reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Api { status, .. } => (400..500).contains(status),
            Self::CredentialsFile { .. } => true,
            Self::Network { .. }
            | Self::Timeout { .. }
            | Self::Parse { .. }
            | Self::HttpClient { .. } => false,
        }
    }
}

/// Convenience type alias for `Result<T, DnsimpleError>`.
pub type Result<T> = std::result::Result<T, DnsimpleError>;
