//! Stdio and HTTP transports around the dispatcher.

mod common;

use std::sync::Arc;

use serde_json::{json, Value};

use repo_resources::ExtensionAllowList;
use repo_resources_mcp::transport::StdioTransport;

use common::*;

fn host() -> Arc<FakeGitHub> {
    Arc::new(FakeGitHub::with_files(&[
        ("README.md", "# readme"),
        ("main.py", "print('hello')"),
    ]))
}

async fn run_stdio(input: &str) -> Vec<Value> {
    let handler = Arc::new(fixed_handler(&host(), ExtensionAllowList::source()));
    let transport = StdioTransport::new(handler);

    let mut output = Vec::new();
    transport.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

// ─────────────────────── stdio ───────────────────────

#[tokio::test]
async fn test_stdio_two_lines_two_responses_in_order() {
    let input = format!(
        "{}\n{}\n",
        rpc(1, "resources/list", Value::Null),
        rpc(2, "resources/fetch", json!({ "uri": "github://a/b/main.py" }))
    );

    let responses = run_stdio(&input).await;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"][0]["name"], "main.py");
    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"]["content"], "print('hello')");
}

#[tokio::test]
async fn test_stdio_bad_line_does_not_stop_the_loop() {
    let input = format!(
        "{{not json\n{}\n{}\n",
        rpc(2, "nope", Value::Null),
        rpc(3, "initialize", Value::Null)
    );

    let responses = run_stdio(&input).await;
    assert_eq!(responses.len(), 3);

    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[0]["error"]["code"], -32603);

    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["error"]["code"], -32601);

    assert_eq!(responses[2]["id"], 3);
    assert_eq!(responses[2]["result"]["protocolVersion"], "2024-11-05");
}

#[tokio::test]
async fn test_stdio_blank_lines_and_missing_final_newline() {
    let input = format!("\n   \n{}", rpc(7, "initialize", Value::Null));

    let responses = run_stdio(&input).await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 7);
}

#[tokio::test]
async fn test_stdio_invalid_utf8_answers_and_continues() {
    let handler = Arc::new(fixed_handler(&host(), ExtensionAllowList::source()));
    let transport = StdioTransport::new(handler);

    let mut input = vec![0xff, 0xfe, b'\n'];
    input.extend_from_slice(rpc(1, "initialize", Value::Null).to_string().as_bytes());
    input.push(b'\n');

    let mut output = Vec::new();
    transport.serve(&input[..], &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["error"]["code"], -32603);
    assert_eq!(lines[1]["id"], 1);
}

#[tokio::test]
async fn test_stdio_handler_panic_answers_and_continues() {
    let panicking = Arc::new(FakeGitHub {
        panic_listing: true,
        ..Default::default()
    });
    let transport = StdioTransport::new(Arc::new(fixed_handler(
        &panicking,
        ExtensionAllowList::source(),
    )));
    let input = format!(
        "{}\n{}\n",
        rpc(1, "resources/list", Value::Null),
        rpc(2, "initialize", Value::Null)
    );

    let mut output = Vec::new();
    transport.serve(input.as_bytes(), &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], Value::Null);
    assert_eq!(lines[0]["error"]["code"], -32603);
    assert_eq!(lines[0]["error"]["message"], "tree listing exploded");
    assert_eq!(lines[1]["id"], 2);
    assert_eq!(lines[1]["result"]["protocolVersion"], "2024-11-05");
}

#[tokio::test]
async fn test_stdio_empty_input_ends_cleanly() {
    assert!(run_stdio("").await.is_empty());
}

// ─────────────────────── http ───────────────────────

#[cfg(feature = "http")]
mod http {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    use repo_resources_mcp::transport::http::router;

    async fn call(method: Method, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
        let app = router(Arc::new(fixed_handler(&host(), ExtensionAllowList::source())));
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_post_rpc_returns_envelope() {
        let body = rpc(1, "resources/list", Value::Null).to_string();
        let (status, content_type, text) = call(Method::POST, "/rpc", &body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            v["result"],
            json!([{ "uri": "github://a/b/main.py", "name": "main.py" }])
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_200_with_internal_error() {
        let (status, _, text) = call(Method::POST, "/rpc", "{oops").await;

        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["id"], Value::Null);
        assert_eq!(v["error"]["code"], -32603);
    }

    #[tokio::test]
    async fn test_rpc_error_is_still_200() {
        let body = rpc(4, "resources/delete", Value::Null).to_string();
        let (status, _, text) = call(Method::POST, "/rpc", &body).await;

        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["id"], 4);
        assert_eq!(v["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_200_with_null_id() {
        let failing = Arc::new(FakeGitHub {
            fail_listing: true,
            ..Default::default()
        });
        let app = router(Arc::new(fixed_handler(&failing, ExtensionAllowList::source())));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/rpc")
            .body(Body::from(rpc(6, "resources/list", Value::Null).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["id"], Value::Null);
        assert_eq!(v["error"]["code"], -32603);
        assert!(v["error"]["message"].as_str().unwrap().contains("HTTP 502"));
    }

    #[tokio::test]
    async fn test_handler_panic_is_200_with_internal_error() {
        let panicking = Arc::new(FakeGitHub {
            panic_listing: true,
            ..Default::default()
        });
        let app = router(Arc::new(fixed_handler(&panicking, ExtensionAllowList::source())));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/rpc")
            .body(Body::from(rpc(1, "resources/list", Value::Null).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["id"], Value::Null);
        assert_eq!(v["error"]["code"], -32603);
        assert!(v["error"]["message"]
            .as_str()
            .unwrap()
            .contains("tree listing exploded"));
    }

    #[tokio::test]
    async fn test_other_routes_are_bare_404() {
        for (method, uri) in [
            (Method::GET, "/rpc"),
            (Method::PUT, "/rpc"),
            (Method::POST, "/"),
            (Method::POST, "/rpc/extra"),
            (Method::GET, "/health"),
        ] {
            let (status, _, text) = call(method.clone(), uri, "").await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert!(text.is_empty(), "{method} {uri} body: {text}");
        }
    }
}
