#![expect(clippy::expect_used)]
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;
use srcview_backend_client::BackendClient;
use srcview_backend_client::RequestError;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::new(&server.uri()).expect("client")
}

#[tokio::test]
async fn summary_is_posted_with_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary"))
        .and(query_param("id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "breadCrumbs": ["std", "fmt"],
            "signature": "pub trait Display",
            "doc_summary": "Format trait for an empty format.",
            "doc_rest": "More words.",
            "children": [{"id": "43", "signature": "fn fmt(&self)", "doc_summary": "Formats."}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client_for(&server).summary("42").await.unwrap();
    assert_eq!(summary.signature.text(), "pub trait Display");
    assert_eq!(summary.doc_rest(), Some("More words."));
    assert_eq!(summary.children.len(), 1);
    assert_eq!(summary.parent(), None);
}

#[tokio::test]
async fn source_unwraps_tagged_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/src/src/main.rs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Source": {
                "path": ["src", "main.rs"],
                "lines": [
                    "fn main() {",
                    ["    ", {"text": "run", "context_id": "9", "link": "src/lib.rs:4", "impls": 0}, "();"],
                    "}"
                ]
            }
        })))
        .mount(&server)
        .await;

    let file = client_for(&server).source("src/main.rs").await.unwrap();
    assert_eq!(file.path, vec!["src".to_string(), "main.rs".to_string()]);
    assert_eq!(file.lines[1].text(), "    run();");
    assert_eq!(file.lines[1].references().count(), 1);
}

#[tokio::test]
async fn find_impls_folds_results_into_references() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/find"))
        .and(query_param("impls", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "file_name": "src/shape.rs",
                "lines": [{"line_start": 12, "column_start": 1, "column_end": 5, "line": "impl Shape for Square {"}]
            }]
        })))
        .mount(&server)
        .await;

    let results = client_for(&server).find_impls("7").await.unwrap();
    assert!(results.defs.is_empty());
    assert_eq!(results.refs[0].lines[0].line_start, 12);
}

#[tokio::test]
async fn find_uses_reads_defs_and_refs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "defs": [{"file_name": "src/a.rs", "lines": [{"line_start": 1, "column_start": 4, "column_end": 5, "line": "fn a() {}"}]}],
            "refs": []
        })))
        .mount(&server)
        .await;

    let results = client_for(&server).find_uses("7").await.unwrap();
    assert_eq!(results.hit_count(), 1);
}

#[tokio::test]
async fn edit_accepts_empty_acknowledgement() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/edit"))
        .and(query_param("file", "src/main.rs:3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).edit("src/main.rs:3").await.unwrap();
}

#[tokio::test]
async fn server_errors_keep_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary"))
        .respond_with(ResponseTemplate::new(500).set_body_string("no such id"))
        .mount(&server)
        .await;

    let err = client_for(&server).summary("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.endpoint(), "summary");
    match err {
        RequestError::Server { body, .. } => assert_eq!(body, "no such id"),
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_bodies_are_parse_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).find_uses("1").await.unwrap_err();
    assert!(matches!(err, RequestError::Parse { .. }), "{err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let client = BackendClient::new(&format!("http://127.0.0.1:{port}")).unwrap();

    let err = client.summary("1").await.unwrap_err();
    assert!(matches!(err, RequestError::Network { .. }), "{err:?}");
}
