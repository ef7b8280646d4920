//! End-to-end submission tests against a mock server.
//!
//! These exercise the composition pipeline over the wire: host/prefix
//! resolution, additive header and query merging, skip flags, user-agent
//! precedence, absolute-URL paths, and the JSON parse surface.

use httpline::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mounted_server(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::for_host(server.uri(), None).unwrap()
}

async fn last_request(server: &MockServer) -> wiremock::Request {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .pop()
        .expect("at least one request received")
}

#[tokio::test]
async fn get_composes_host_prefix_path_query_and_default_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(wiremock::matchers::query_param("active", "true"))
        .and(header("X-Key", "secret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::for_host(server.uri(), "v1")
        .unwrap()
        .with_default_header("X-Key", "secret");

    let response = client.request().get("/users?active=true").await.unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn query_merge_keeps_both_colliding_values() {
    let server = mounted_server(200).await;
    let client = client_for(&server).with_default_query("a", "2");

    client.request().get("/items?a=1").await.unwrap();

    let request = last_request(&server).await;
    assert_eq!(request.url.query(), Some("a=1&a=2"));
}

#[tokio::test]
async fn skip_default_queries_suppresses_all_defaults() {
    let server = mounted_server(200).await;
    let client = client_for(&server)
        .with_default_query("token", "t")
        .with_default_query("region", "eu");

    client
        .request()
        .skip_default_queries()
        .get("/items?a=1")
        .await
        .unwrap();

    let request = last_request(&server).await;
    assert_eq!(request.url.query(), Some("a=1"));
}

#[tokio::test]
async fn skip_default_headers_suppresses_all_defaults() {
    let server = mounted_server(200).await;
    let client = client_for(&server)
        .with_default_header("X-One", "1")
        .with_default_header("X-Two", "2");

    client
        .request()
        .skip_default_headers()
        .header("X-Call", "yes")
        .get("/items")
        .await
        .unwrap();

    let request = last_request(&server).await;
    assert!(!request.headers.contains_key("x-one"));
    assert!(!request.headers.contains_key("x-two"));
    assert_eq!(request.headers.get("x-call").unwrap(), "yes");
}

#[tokio::test]
async fn header_merge_is_additive_for_repeated_names() {
    let server = mounted_server(200).await;
    let client = client_for(&server).with_default_header("X-Tag", "default");

    client.request().header("X-Tag", "call").get("/t").await.unwrap();

    let request = last_request(&server).await;
    let values: Vec<_> = request
        .headers
        .get_all("x-tag")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(values, vec!["call", "default"]);
}

#[tokio::test]
async fn absolute_url_path_overrides_host_and_prefix_and_still_merges_queries() {
    let home = mounted_server(200).await;
    let other = mounted_server(200).await;

    let client = HttpClient::for_host(home.uri(), "v1")
        .unwrap()
        .with_default_query("token", "t");

    let target = format!("{}/resource?x=1", other.uri());
    client.request().get(target.as_str()).await.unwrap();

    assert!(home.received_requests().await.unwrap().is_empty());
    let request = last_request(&other).await;
    assert_eq!(request.url.path(), "/resource");
    assert_eq!(request.url.query(), Some("x=1&token=t"));
}

#[tokio::test]
async fn user_agent_override_beats_profile_default() {
    let server = mounted_server(200).await;
    let client = client_for(&server).with_user_agent("profile/1.0");

    client.request().user_agent("call/2.0").get("/a").await.unwrap();
    client.request().get("/b").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].headers.get("user-agent").unwrap(), "call/2.0");
    assert_eq!(requests[1].headers.get("user-agent").unwrap(), "profile/1.0");
}

#[tokio::test]
async fn no_user_agent_is_sent_when_neither_is_configured() {
    let server = mounted_server(200).await;
    let client = HttpClient::new(ClientConfig {
        host: server.uri(),
        user_agent: None,
        ..ClientConfig::default()
    })
    .unwrap();

    client.request().get("/a").await.unwrap();

    let request = last_request(&server).await;
    assert!(!request.headers.contains_key("user-agent"));
}

#[tokio::test]
async fn send_sets_method_path_body_and_headers_then_submits() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/widgets/7"))
        .and(header("X-Req", "1"))
        .and(body_string("payload"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let headers = MultiMap::from_pairs([("X-Req", "1")]);
    let response = client
        .request()
        .send("put", "/widgets/7", "payload", headers)
        .await
        .unwrap();

    assert_eq!(response.status_code(), 204);
}

#[tokio::test]
async fn verbs_submit_with_or_without_a_path_argument() {
    let server = mounted_server(200).await;
    let client = client_for(&server);

    client.request().post("/made").await.unwrap();
    client.request().path("/kept").delete(None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].method.to_string(), "POST");
    assert_eq!(requests[0].url.path(), "/made");
    assert_eq!(requests[1].method.to_string(), "DELETE");
    assert_eq!(requests[1].url.path(), "/kept");
}

#[tokio::test]
async fn empty_host_with_relative_path_fails_before_any_call() {
    let client = HttpClient::for_host("definitely not a url", None).unwrap();
    let err = client.request().get("/users").await.unwrap_err();
    assert!(matches!(err, HttpError::ConfigurationMissing));
}

#[tokio::test]
async fn malformed_path_fails_before_any_call() {
    let client = HttpClient::for_host("https://api.example.com", None).unwrap();
    let err = client.request().get("https://[bad/path").await.unwrap_err();
    assert!(matches!(err, HttpError::MalformedPath { .. }));
}

#[tokio::test]
async fn json_body_round_trips_through_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 7, "name": "ada"}))
                .insert_header("Content-Type", "application/json"),
        )
        .mount(&server)
        .await;

    #[derive(serde::Deserialize)]
    struct User {
        id: u64,
        name: String,
    }

    let client = client_for(&server);
    let response = client.request().get("/user").await.unwrap();

    assert!(response.is_json());
    let user: User = response.parse_as().unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.name, "ada");
    assert_eq!(response.original().url.path(), "/user");
}
