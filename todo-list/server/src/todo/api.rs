use crate::todo::{TodoError, TodoState};
use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use todo_list::{Todo, TodoUpdate};
use utoipa::{OpenApi, ToSchema};

/// JSON representation of a Todo for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoJson {
    /// Unique identifier for the todo
    pub id: String,
    /// Title of the todo
    pub title: String,
    /// Optional due date in ISO 8601 format
    pub due_at: Option<String>,
    /// Whether the todo is done
    pub completed: bool,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
    /// When the todo was last changed
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoJson {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id().to_string(),
            title: todo.title().to_string(),
            due_at: todo.due_at().map(str::to_string),
            completed: todo.is_completed(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
        }
    }
}

/// API response carrying a single todo.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoResponse {
    pub data: TodoJson,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            data: TodoJson::from(todo),
        }
    }
}

/// API response for listing all todos.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodosResponse {
    pub data: Vec<TodoJson>,
}

/// JSON response for API errors
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable description of what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

/// JSON request payload for creating a todo.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    due_at: Option<String>,
}

/// JSON request payload for updating a todo. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default)]
    title: Option<String>,
    /// `null` or an empty string clears the due date
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    due_at: Option<Option<String>>,
    #[serde(default)]
    completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TodoUpdate {
    fn from(request: UpdateTodoRequest) -> Self {
        Self {
            title: request.title,
            due_at: request.due_at,
            completed: request.completed,
        }
    }
}

/// Wraps any present value, including `null`, in `Some` so an explicit `null`
/// can be told apart from a missing field.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Handler for GET /api/todos - Returns all todos in stored order.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "Successfully retrieved todos", body = TodosResponse)
    ),
    tag = "Todos"
)]
pub async fn list_todos_handler(State(state): State<Arc<TodoState>>) -> Json<TodosResponse> {
    let todos = state.service.list_todos().await;
    Json(TodosResponse {
        data: todos.into_iter().map(TodoJson::from).collect(),
    })
}

/// Handler for POST /api/todos - Creates a new todo.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Empty title, invalid due date or malformed body", body = ErrorResponse),
        (status = 500, description = "Failed to persist todos", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn create_todo_handler(
    State(state): State<Arc<TodoState>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), TodoError> {
    let Json(payload) = payload?;
    let todo = state
        .service
        .create_todo(
            payload.title.as_deref().unwrap_or_default(),
            payload.due_at.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

/// Handler for PUT /api/todos/{id} - Updates the provided fields of a todo.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(
        ("id" = String, Path, description = "ID of the todo to update")
    ),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Invalid field or malformed body", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Failed to persist todos", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn update_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoResponse>, TodoError> {
    let Json(payload) = payload?;
    let todo = state
        .service
        .update_todo(&id, TodoUpdate::from(payload))
        .await?;
    Ok(Json(TodoResponse::from(todo)))
}

/// Handler for POST /api/todos/{id}/toggle - Flips the completion state of a todo.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/todos/{id}/toggle",
    params(
        ("id" = String, Path, description = "ID of the todo to toggle")
    ),
    responses(
        (status = 200, description = "Todo toggled", body = TodoResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Failed to persist todos", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn toggle_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, TodoError> {
    let todo = state.service.toggle_todo(&id).await?;
    Ok(Json(TodoResponse::from(todo)))
}

/// Handler for DELETE /api/todos/{id} - Deletes a todo and returns it.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(
        ("id" = String, Path, description = "ID of the todo to delete")
    ),
    responses(
        (status = 200, description = "Todo deleted", body = TodoResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Failed to persist todos", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn delete_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, TodoError> {
    let todo = state.service.delete_todo(&id).await?;
    Ok(Json(TodoResponse::from(todo)))
}

/// OpenAPI document for the todo API.
#[derive(OpenApi)]
#[openapi(
    paths(
        list_todos_handler,
        create_todo_handler,
        update_todo_handler,
        toggle_todo_handler,
        delete_todo_handler
    ),
    components(schemas(
        TodoJson,
        TodoResponse,
        TodosResponse,
        ErrorResponse,
        CreateTodoRequest,
        UpdateTodoRequest
    )),
    tags((name = "Todos", description = "Todo list management"))
)]
pub struct ApiDoc;

/// Creates and returns the todos API router.
pub fn create_api_router(state: Arc<TodoState>) -> Router {
    Router::new()
        .route(
            "/api/todos",
            get(list_todos_handler).post(create_todo_handler),
        )
        .route(
            "/api/todos/{id}",
            put(update_todo_handler).delete(delete_todo_handler),
        )
        .route("/api/todos/{id}/toggle", post(toggle_todo_handler))
        .with_state(state)
}
