use axum::{Json, Router, routing::get};
use std::path::Path;
use std::sync::Arc;
use todo_list::{TodoService, TodoStore};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::Config;
use crate::todo::api::ApiDoc;
use crate::todo::{TodoState, create_api_router};

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let store = TodoStore::new(&config.data_file);
    store.initialize().await?;
    tracing::info!("Data file: {}", store.path().display());

    let todo_state = Arc::new(TodoState::new(TodoService::new(store)));
    let app = create_app(todo_state, &config.static_dir);

    let server_address = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);
    tracing::info!("Serving static files from {}", config.static_dir.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Web server stopped");
    Ok(())
}

/// Builds the full application router: the todos API, health check and
/// OpenAPI document, with every other path served from `static_dir`.
///
/// Unknown paths fall back to `index.html` so the single-page application
/// can handle its own routes.
pub fn create_app(todo_state: Arc<TodoState>, static_dir: &Path) -> Router {
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health_check_handler))
        .route("/api-docs/openapi.json", get(openapi_handler))
        .merge(create_api_router(todo_state))
        .fallback_service(spa)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping web server");
}
