//! Liveness, landing and routing integration tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use super::test_utils::{send, send_json, test_router, TEST_TOKEN};

fn request(method: &str, uri: &str, accept: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(accept) = accept {
        builder = builder.header("accept", accept);
    }
    builder.body(Body::empty()).unwrap()
}

// =============================================================================
// Status
// =============================================================================

#[tokio::test]
async fn test_status_json() {
    let router = test_router().await;

    let (status, json) = send_json(&router, request("GET", "/status", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "up"}));

    let (_, json) = send_json(&router, request("GET", "/status", Some("application/json"))).await;
    assert_eq!(json, json!({"status": "up"}));
}

#[tokio::test]
async fn test_status_html() {
    let router = test_router().await;

    let (status, headers, body) = send(
        &router,
        request("GET", "/status", Some("text/html,application/xhtml+xml")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(String::from_utf8(body).unwrap().contains("We're up!"));
}

#[tokio::test]
async fn test_status_any_method() {
    let router = test_router().await;

    for method in ["POST", "PUT", "DELETE", "PATCH"] {
        let (status, json) = send_json(&router, request(method, "/status", None)).await;
        assert_eq!(status, StatusCode::OK, "{method}");
        assert_eq!(json["status"], "up");
    }
}

// =============================================================================
// Landing
// =============================================================================

#[tokio::test]
async fn test_landing_html() {
    let router = test_router().await;

    for uri in ["/", "/some/unknown/page", "/v1/nothing-here"] {
        let (status, headers, body) = send(&router, request("GET", uri, Some("text/html"))).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(headers["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("Microfibre v1 API"), "{uri}");
        assert!(body.contains("<marquee>Hello World!</marquee>"));
    }
}

#[tokio::test]
async fn test_landing_json() {
    let router = test_router().await;

    let (status, json) = send_json(&router, request("GET", "/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "up"}));
}

#[tokio::test]
async fn test_landing_head() {
    let router = test_router().await;

    let (status, _, _) = send(&router, request("HEAD", "/", None)).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Unmatched Requests
// =============================================================================

#[tokio::test]
async fn test_unknown_path_non_get_is_not_found() {
    let router = test_router().await;

    for method in ["POST", "PUT", "DELETE"] {
        let (status, json) = send_json(&router, request(method, "/nowhere", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(json["status"], "failure");
    }
}

#[tokio::test]
async fn test_wrong_method_on_known_route() {
    let router = test_router().await;

    for (method, uri) in [("GET", "/v1/post"), ("GET", "/v1/update"), ("POST", "/v1/posts")] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-auth-token", TEST_TOKEN)
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
    }
}
