//! Client configuration and credentials
//!
//! Credentials come either from constructor arguments or from a `.dnsimple`
//! dotfile looked up in the working directory, then in the home directory:
//!
//! ```text
//! email: you@example.com
//! api_token: abcdef0123456789
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{DnsimpleError, Result};
use crate::utils::log_sanitizer::mask_secret;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://dnsimple.com";
/// Name of the credentials dotfile.
pub const AUTH_FILE_NAME: &str = ".dnsimple";

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How the client authenticates against the API.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Account email plus API token, sent as `X-DNSimple-Token: email:token`.
    ApiToken { email: String, api_token: String },
    /// Account email plus password, sent as HTTP basic auth.
    Password { email: String, password: String },
}

impl Credentials {
    pub fn api_token(email: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self::ApiToken {
            email: email.into(),
            api_token: api_token.into(),
        }
    }

    pub fn password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Self::ApiToken { email, .. } | Self::Password { email, .. } => email,
        }
    }

    /// Parse the content of a credentials dotfile.
    ///
    /// The first `email:`, `api_token:` and `password:` lines win. A token is
    /// preferred over a password when both are present.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let email = find_value(content, "email");
        let api_token = find_value(content, "api_token");
        let password = find_value(content, "password");

        let invalid = |detail: &str| DnsimpleError::CredentialsFile {
            path: path.to_path_buf(),
            detail: detail.to_string(),
        };

        let email = email.ok_or_else(|| invalid("missing 'email:' line"))?;
        match (api_token, password) {
            (Some(api_token), _) => Ok(Self::api_token(email, api_token)),
            (None, Some(password)) => Ok(Self::password(email, password)),
            (None, None) => Err(invalid("missing 'api_token:' line")),
        }
    }

    /// Read credentials from one file. `Ok(None)` when the file can't be read.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path).map(Some),
            Err(e) => {
                log::debug!("Credentials file {} not readable: {e}", path.display());
                Ok(None)
            }
        }
    }

    /// Try each location in order and return the first credentials found.
    ///
    /// Returns `Ok(None)` (after logging a warning) when no location holds a
    /// readable file. A file that exists but is malformed is an error.
    pub fn discover_in(locations: &[PathBuf]) -> Result<Option<Self>> {
        for path in locations {
            if let Some(credentials) = Self::from_file(path)? {
                log::debug!("Loaded credentials from {}", path.display());
                return Ok(Some(credentials));
            }
        }

        log::warn!(
            "Could not open {AUTH_FILE_NAME} file - please provide a file {AUTH_FILE_NAME} in the \
             current directory or in the home directory with the content:\n\
             email: <dnsimple_email>\n\
             api_token: <dnsimple API token>"
        );
        Ok(None)
    }

    /// Search `./.dnsimple`, then `~/.dnsimple`.
    pub fn discover() -> Result<Option<Self>> {
        Self::discover_in(&Self::default_locations())
    }

    pub fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from(AUTH_FILE_NAME)];
        if let Some(home) = dirs::home_dir() {
            locations.push(home.join(AUTH_FILE_NAME));
        }
        locations
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiToken { email, api_token } => f
                .debug_struct("ApiToken")
                .field("email", email)
                .field("api_token", &mask_secret(api_token))
                .finish(),
            Self::Password { email, password } => f
                .debug_struct("Password")
                .field("email", email)
                .field("password", &mask_secret(password))
                .finish(),
        }
    }
}

/// First value of a `key: value` line. Splits on the first colon only.
fn find_value(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (k, v) = line.trim().split_once(':')?;
        (k.trim() == key).then(|| v.trim().to_string())
    })
}

/// Transport-level settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host the API paths are appended to, without a trailing slash.
    pub base_url: String,
    pub user_agent: String,
    /// Applied to every request; `None` disables the per-request timeout.
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("dnsimple-client-rust/{}", env!("CARGO_PKG_VERSION")),
            timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}
