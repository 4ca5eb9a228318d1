//! Core persistence and mutation layer for the todo list backend.
//!
//! The whole collection lives in one JSON file. Every mutation reloads it,
//! applies a single validated change and atomically replaces the file.
pub mod service;
pub mod store;
pub mod todo;
pub mod validation;

pub use service::{TodoService, TodoServiceError, TodoUpdate};
pub use store::{StoreError, TodoStore};
pub use todo::Todo;
pub use validation::ValidationError;
