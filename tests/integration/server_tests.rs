//! Tests against a real server bound to a loopback port.
//!
//! Each test serves the router over TCP with a file-backed database and a
//! pooled store, then talks to it with an HTTP client.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};
use tokio::net::TcpListener;

use microfibre::{create_router, PostService, RouterConfig, SqlitePostStore, AUTH_HEADER};

use super::test_utils::TEST_TOKEN;

/// A running server and the database file behind it.
struct TestServer {
    base_url: String,
    db_path: PathBuf,
}

impl TestServer {
    async fn start() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let db_path =
            std::env::temp_dir().join(format!("microfibre-{}-{}.db", std::process::id(), nanos));

        let store = SqlitePostStore::connect(&format!("sqlite://{}", db_path.display()), 5)
            .await
            .expect("file store should open");
        let router = create_router(
            PostService::new(store),
            RouterConfig::new(TEST_TOKEN).with_tracing(false),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            db_path,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.db_path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}

async fn create(client: &reqwest::Client, server: &TestServer, body: String) -> i64 {
    let response = client
        .post(server.url("/v1/post"))
        .header(AUTH_HEADER, TEST_TOKEN)
        .json(&json!({"body": body, "created_timezone": "UTC"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let json: Value = response.json().await.unwrap();
    json["postId"].as_i64().unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_round_trip_over_tcp() {
    let server = TestServer::start().await;
    let client = client();

    let post_id = create(&client, &server, "over the wire".to_string()).await;

    let response = client
        .get(server.url("/v1/posts?page=0&pageSize=10"))
        .header(AUTH_HEADER, TEST_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.headers()["x-total-count"], "1");

    let json: Value = response.json().await.unwrap();
    assert_eq!(json["posts"][0]["id"], post_id);
    assert_eq!(json["posts"][0]["body"], "over the wire");
}

#[tokio::test]
async fn test_unauthenticated_over_tcp() {
    let server = TestServer::start().await;

    let response = client()
        .get(server.url("/v1/posts"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    assert_eq!(
        response.text().await.unwrap(),
        "Unauthenticated! Make sure you are providing the valid auth token!"
    );
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let server = TestServer::start().await;
    let client = client();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let client = client.clone();
            let url = server.url("/v1/post");
            tokio::spawn(async move {
                let response = client
                    .post(url)
                    .header(AUTH_HEADER, TEST_TOKEN)
                    .json(&json!({"body": format!("post {i}")}))
                    .send()
                    .await
                    .unwrap();
                assert_eq!(response.status(), reqwest::StatusCode::OK);
                let json: Value = response.json().await.unwrap();
                (i, json["postId"].as_i64().unwrap())
            })
        })
        .collect();

    let mut created = Vec::new();
    for task in tasks {
        created.push(task.await.unwrap());
    }

    let ids: HashSet<i64> = created.iter().map(|(_, id)| *id).collect();
    assert_eq!(ids.len(), 16, "every create must return its own id");

    // Each returned id must point at the post that request inserted
    let response = client
        .get(server.url("/v1/posts?pageSize=100"))
        .header(AUTH_HEADER, TEST_TOKEN)
        .send()
        .await
        .unwrap();
    let json: Value = response.json().await.unwrap();
    let posts = json["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 16);

    for (i, id) in created {
        let post = posts.iter().find(|p| p["id"] == id).unwrap();
        assert_eq!(post["body"], format!("post {i}"));
    }
}

#[tokio::test]
async fn test_status_over_tcp() {
    let server = TestServer::start().await;

    let response = client().get(server.url("/status")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let json: Value = response.json().await.unwrap();
    assert_eq!(json, json!({"status": "up"}));
}
