use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use std::sync::Arc;
use tempfile::TempDir;
use todo_list::{TodoService, TodoStore};
use todo_list_server::todo::TodoState;
use tower::ServiceExt;

/// Test context holding a router backed by a temporary data directory.
pub struct TestContext {
    #[allow(dead_code)] // dir is kept so the data file is not deleted
    pub dir: TempDir,
    pub app: Router,
}

impl TestContext {
    /// Sends a request with an optional JSON body and returns the status and parsed JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };
        send_request(&self.app, request).await
    }
}

/// Sends a prepared request and parses the JSON response body.
pub async fn send_request(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Builds a router over a fresh, initialized data file.
pub async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let dir = TempDir::new()?;
    let static_dir = dir.path().join("dist");
    std::fs::create_dir_all(&static_dir)?;
    std::fs::write(
        static_dir.join("index.html"),
        "<!doctype html><html><body><div id=\"app\"></div></body></html>",
    )?;
    std::fs::write(static_dir.join("app.js"), "console.log('todo');")?;

    let store = TodoStore::new(dir.path().join("data").join("todos.json"));
    store.initialize().await?;
    let state = Arc::new(TodoState::new(TodoService::new(store)));
    let app = todo_list_server::web::create_app(state, &static_dir);
    Ok(TestContext { dir, app })
}
