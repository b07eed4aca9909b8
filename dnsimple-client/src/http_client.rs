//! Authenticated HTTP access to the DNSimple API
//!
//! Every request goes to `base_url + path` with the user agent, an
//! `accept: application/json` header and the credentials attached. Write
//! bodies are form-encoded (`record[name]=www&...`), responses are JSON.
//!
//! [`Transport::request`] and the method wrappers return an [`ApiResponse`]
//! for any HTTP status; only transport failures are errors at that level.
//! Callers turn unexpected statuses into [`DnsimpleError::Api`] with
//! [`ApiResponse::ensure_status`] / [`ApiResponse::ensure_success`], and
//! [`Transport::json_get`] does both steps for reads.

use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, Credentials};
use crate::error::{DnsimpleError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// Header carrying `email:token` for token authentication.
pub const TOKEN_HEADER: &str = "X-DNSimple-Token";

/// A completed HTTP exchange, whatever its status.
#[derive(Debug)]
pub struct ApiResponse {
    method: Method,
    path: String,
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON. An empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.trim().is_empty() {
            return parse_json("null");
        }
        parse_json(&self.body)
    }

    /// Fail with [`DnsimpleError::Api`] unless the status is exactly `expected`.
    pub fn ensure_status(self, expected: StatusCode) -> Result<Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }

    /// Fail with [`DnsimpleError::Api`] unless the status is 2xx.
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }

    fn into_error(self) -> DnsimpleError {
        log::warn!(
            "{} {} failed (HTTP {}): {}",
            self.method,
            self.path,
            self.status.as_u16(),
            truncate_for_log(&self.body)
        );
        DnsimpleError::Api {
            status: self.status.as_u16(),
            body: self.body,
            headers: self.headers,
        }
    }
}

/// Parse a JSON body, logging the raw text when it doesn't fit `T`.
pub(crate) fn parse_json<T>(response_text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(response_text).map_err(|e| {
        log::error!("JSON parse failed: {e}");
        log::error!("Raw response: {}", truncate_for_log(response_text));
        DnsimpleError::Parse {
            detail: e.to_string(),
        }
    })
}

/// HTTP session bound to one account and one API endpoint.
///
/// Shared by the client and every domain and record it hands out.
#[derive(Debug)]
pub struct Transport {
    client: Client,
    config: ClientConfig,
    credentials: Credentials,
}

impl Transport {
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        // reqwest follows up to 10 redirects by default
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(default_headers)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| DnsimpleError::HttpClient {
                detail: e.to_string(),
            })?;

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Send one request and read the full response.
    ///
    /// `form` is sent as an `application/x-www-form-urlencoded` body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, String)]>,
    ) -> Result<ApiResponse> {
        let url = self.url(path);
        log::debug!("{method} {url}");

        let mut builder = self.client.request(method.clone(), &url);
        builder = match &self.credentials {
            Credentials::ApiToken { email, api_token } => {
                builder.header(TOKEN_HEADER, format!("{email}:{api_token}"))
            }
            Credentials::Password { email, password } => builder.basic_auth(email, Some(password)),
        };
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(form) = form {
            builder = builder.form(form);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                DnsimpleError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                DnsimpleError::Network {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        log::debug!("Response Status: {}", status.as_u16());
        let headers = response.headers().clone();

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                DnsimpleError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                DnsimpleError::Network {
                    detail: format!("Failed to read response body: {e}"),
                }
            }
        })?;
        log::debug!("Response Body: {}", truncate_for_log(&body));

        Ok(ApiResponse {
            method,
            path: path.to_string(),
            status,
            headers,
            body,
        })
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, form: &[(&str, String)]) -> Result<ApiResponse> {
        self.request(Method::POST, path, Some(form)).await
    }

    pub async fn put(&self, path: &str, form: &[(&str, String)]) -> Result<ApiResponse> {
        self.request(Method::PUT, path, Some(form)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, None).await
    }

    /// GET `path` and decode the JSON body.
    ///
    /// Any non-2xx status fails with [`DnsimpleError::Api`] carrying the
    /// status code, the body verbatim and the headers.
    pub async fn json_get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path).await?.ensure_success()?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            method: Method::POST,
            path: "/domains".to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn ensure_status_requires_exact_match() {
        assert!(response(201, "{}").ensure_status(StatusCode::CREATED).is_ok());

        let err = response(200, "{}")
            .ensure_status(StatusCode::CREATED)
            .unwrap_err();
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn ensure_success_keeps_body_verbatim() {
        let err = response(422, r#"{"message":"Validation failed"}"#)
            .ensure_success()
            .unwrap_err();
        match err {
            DnsimpleError::Api { status, body, .. } => {
                assert_eq!(status, 422);
                assert_eq!(body, r#"{"message":"Validation failed"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn json_of_empty_body_is_null() {
        let value: serde_json::Value = response(204, "").json().unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn parse_json_valid() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Foo {
            x: i32,
        }
        let result: Result<Foo> = parse_json(r#"{"x":42}"#);
        assert!(
            matches!(&result, Ok(Foo { x: 42 })),
            "unexpected parse result: {result:?}"
        );
    }

    #[test]
    fn parse_json_invalid() {
        let result: Result<serde_json::Value> = parse_json("<html>oops</html>");
        assert!(
            matches!(&result, Err(DnsimpleError::Parse { .. })),
            "unexpected parse result: {result:?}"
        );
    }

    #[test]
    fn url_joins_base_and_path() {
        let transport = Transport::new(
            Credentials::api_token("me@example.com", "t"),
            ClientConfig::default().with_base_url("http://localhost:9999"),
        )
        .unwrap();
        assert_eq!(
            transport.url("/domains.json"),
            "http://localhost:9999/domains.json"
        );
    }
}
