//! 共享测试工具和辅助函数

#![allow(dead_code)]

use dnsimple_client::{ClientConfig, Credentials, DnsimpleClient};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TEST_EMAIL: &str = "me@example.com";
pub const TEST_TOKEN: &str = "secret-token";
pub const TEST_DOMAIN: &str = "example.com";
pub const TEST_DOMAIN_ID: u64 = 42;

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(server.uri())
        .with_user_agent("dnsimple-client-tests/1.0")
}

/// Client authenticated with the test token, talking to the mock server.
pub fn test_client(server: &MockServer) -> DnsimpleClient {
    DnsimpleClient::with_config(
        Credentials::api_token(TEST_EMAIL, TEST_TOKEN),
        test_config(server),
    )
    .expect("failed to build client")
}

pub fn domain_json(id: u64, name: &str) -> Value {
    json!({
        "domain": {
            "id": id,
            "name": name,
            "state": "hosted",
            "record_count": 0,
            "created_at": "2013-01-29T14:25:38Z",
            "updated_at": "2013-01-29T14:25:38Z",
            "token": "abc123"
        }
    })
}

pub fn record_json(id: u64, name: &str, record_type: &str, content: &str) -> Value {
    json!({
        "record": {
            "id": id,
            "domain_id": TEST_DOMAIN_ID,
            "name": name,
            "record_type": record_type,
            "content": content,
            "ttl": 3600,
            "prio": null,
            "created_at": "2013-01-29T14:25:38Z",
            "updated_at": "2013-01-29T14:25:38Z"
        }
    })
}

pub fn domains_path() -> &'static str {
    "/domains.json"
}

pub fn records_path() -> String {
    format!("/domains/{TEST_DOMAIN_ID}/records")
}

/// Mount `GET /domains.json` listing the test domain.
pub async fn mount_domain_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(domains_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([domain_json(TEST_DOMAIN_ID, TEST_DOMAIN)])),
        )
        .mount(server)
        .await;
}

/// Mount `GET /domains/42/records` with the given record wrappers.
pub async fn mount_record_listing(server: &MockServer, records: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(records_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(records)))
        .mount(server)
        .await;
}

/// Every request the server has seen, in arrival order.
pub async fn received(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
}

/// `"METHOD /path"` of each request, in arrival order.
pub async fn request_lines(server: &MockServer) -> Vec<String> {
    received(server)
        .await
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect()
}

/// Decoded form body of a request.
pub fn form_of(request: &Request) -> Vec<(String, String)> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}

/// Value of one form field, if present.
pub fn form_field(request: &Request, key: &str) -> Option<String> {
    form_of(request)
        .into_iter()
        .find_map(|(k, v)| (k == key).then_some(v))
}
