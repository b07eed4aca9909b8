//! # dnsimple-client
//!
//! An async client for the [DNSimple](https://dnsimple.com/) REST API.
//!
//! The API's JSON resources map onto three layers:
//!
//! | Type | Wraps | Caches |
//! |------|-------|--------|
//! | [`DnsimpleClient`] | the account | domain listing, keyed by name |
//! | [`Domain`] | one hosted domain | record listing, keyed by record id |
//! | [`Record`] | one DNS record | nothing |
//!
//! Every type shares the client's [`Transport`], which attaches the
//! credentials, a user agent and `accept: application/json` to each request.
//!
//! ## TLS Backend
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and Android targets.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dnsimple_client::{Credentials, DnsimpleClient, NewRecord};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Credentials from arguments, or `DnsimpleClient::with_auth_file()`
//!     let mut client = DnsimpleClient::new(Credentials::api_token(
//!         "you@example.com",
//!         "your-api-token",
//!     ))?;
//!
//!     // 2. List domains (cached until a domain is created or deleted)
//!     for name in client.domains().await?.keys() {
//!         println!("{name}");
//!     }
//!
//!     // 3. Add a record and read the refreshed listing
//!     if let Some(domain) = client.domain("example.com").await? {
//!         domain
//!             .add_record(&NewRecord::new("api", "A", "192.0.2.10").ttl(600))
//!             .await?;
//!         for record in domain.records().await?.values() {
//!             println!("{record}");
//!         }
//!     }
//!
//!     // 4. Composite setup: apex A, www/stage CNAMEs, Google mail
//!     client
//!         .create_standard_domain("example.org", "192.0.2.20")
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, DnsimpleError>`](DnsimpleError), for
//! reads and writes alike:
//!
//! - [`DnsimpleError::Api`]: unexpected HTTP status, with status, raw body and headers
//! - [`DnsimpleError::Network`] / [`DnsimpleError::Timeout`]: transport failures
//! - [`DnsimpleError::Parse`]: response was not the expected JSON
//!
//! Nothing is retried. Lookups that find nothing locally (unknown domain
//! name, missing apex record, no credentials file) return `Ok(false)` or
//! `Ok(None)` and log a warning. Composite operations do not roll back: a
//! failure partway through leaves what earlier steps created on the server.

mod cache;
mod client;
mod config;
mod domain;
mod error;
mod http_client;
mod record;
mod types;
mod utils;

// Re-export error types
pub use error::{DnsimpleError, Result};

pub use cache::{Cached, Invalidator};
pub use client::{DnsimpleClient, DomainMap};
pub use config::{AUTH_FILE_NAME, ClientConfig, Credentials, DEFAULT_BASE_URL};
pub use domain::{Domain, GOOGLE_MAIL_HOST, GOOGLE_MX_TEMPLATE, RecordMap};
pub use http_client::{ApiResponse, TOKEN_HEADER, Transport};
pub use record::Record;
pub use types::{
    DEFAULT_PRIO, DEFAULT_TTL, DomainInfo, NewRecord, RecordChanges, RecordInfo, Template,
};

// Re-export utils module
pub use utils::datetime;
