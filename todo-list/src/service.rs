use chrono::Utc;
use tokio::sync::Mutex;

use crate::store::{StoreError, TodoStore};
use crate::todo::Todo;
use crate::validation::{self, ValidationError};

/// Error type for TodoService operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoServiceError {
    /// Represents rejected user input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Represents a todo not found error.
    #[error("Todo with ID {0} not found")]
    NotFound(String),
    /// Represents a failure to persist the collection.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Partial update applied by [`TodoService::update_todo`].
///
/// `None` leaves a field unchanged. For `due_at`, `Some(None)` and `Some(Some(""))`
/// clear the due date.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub due_at: Option<Option<String>>,
    pub completed: Option<bool>,
}

/// Validated field values ready to be applied to a todo.
struct ValidatedUpdate {
    title: Option<String>,
    due_at: Option<Option<String>>,
    completed: Option<bool>,
}

impl TodoUpdate {
    fn validate(self) -> Result<ValidatedUpdate, ValidationError> {
        let title = self
            .title
            .as_deref()
            .map(validation::validate_title)
            .transpose()?;
        let due_at = self
            .due_at
            .map(|due_at| validation::normalize_due_at(due_at.as_deref()))
            .transpose()?;
        Ok(ValidatedUpdate {
            title,
            due_at,
            completed: self.completed,
        })
    }
}

/// Applies todo mutations against the persisted collection.
///
/// Every mutation holds `write_lock` for the whole load, modify and persist
/// sequence, so concurrent requests never overwrite each other's changes.
/// Reads go straight to the store.
pub struct TodoService {
    store: TodoStore,
    write_lock: Mutex<()>,
}

impl TodoService {
    pub fn new(store: TodoStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Retrieves all todos in stored order.
    ///
    /// # Returns
    ///
    /// The whole collection, or an empty vector if it could not be loaded.
    #[tracing::instrument(skip(self))]
    pub async fn list_todos(&self) -> Vec<Todo> {
        self.store.load_all().await
    }

    /// Creates a new todo and appends it to the collection.
    ///
    /// # Arguments
    ///
    /// * `title` - The title, trimmed before storing. Must not be blank.
    /// * `due_at` - Optional due date. An empty string is treated as absent.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Todo` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_todo(
        &self,
        title: &str,
        due_at: Option<&str>,
    ) -> Result<Todo, TodoServiceError> {
        let title = validation::validate_title(title)?;
        let due_at = validation::normalize_due_at(due_at)?;

        let _guard = self.write_lock.lock().await;
        let mut todos = self.store.load_all().await;
        let todo = Todo::new(title, due_at, Utc::now());
        todos.push(todo.clone());
        self.store.replace_all(&todos).await?;

        tracing::info!("Created todo {}", todo.id());
        Ok(todo)
    }

    /// Applies a partial update to a todo.
    ///
    /// All provided fields are validated before anything changes.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the todo to update.
    /// * `update` - The fields to change.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Todo` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_todo(
        &self,
        id: &str,
        update: TodoUpdate,
    ) -> Result<Todo, TodoServiceError> {
        self.mutate(id, move |todo, now| {
            let update = update.validate()?;
            if let Some(title) = update.title {
                todo.set_title(title);
            }
            if let Some(due_at) = update.due_at {
                todo.set_due_at(due_at);
            }
            if let Some(completed) = update.completed {
                todo.set_completed(completed);
            }
            todo.touch(now);
            Ok(())
        })
        .await
    }

    /// Flips the completion state of a todo.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_todo(&self, id: &str) -> Result<Todo, TodoServiceError> {
        self.mutate(id, |todo, now| {
            todo.toggle();
            todo.touch(now);
            Ok(())
        })
        .await
    }

    /// Deletes a todo by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Todo` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_todo(&self, id: &str) -> Result<Todo, TodoServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut todos = self.store.load_all().await;
        let index =
            find_index(&todos, id).ok_or_else(|| TodoServiceError::NotFound(id.to_string()))?;

        let removed = todos.remove(index);
        self.store.replace_all(&todos).await?;

        tracing::info!("Deleted todo {}", id);
        Ok(removed)
    }

    /// Loads the collection, applies `apply` to a copy of the todo with `id`
    /// and writes it back at the same position.
    async fn mutate<F>(&self, id: &str, apply: F) -> Result<Todo, TodoServiceError>
    where
        F: FnOnce(&mut Todo, chrono::DateTime<Utc>) -> Result<(), ValidationError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut todos = self.store.load_all().await;
        let index =
            find_index(&todos, id).ok_or_else(|| TodoServiceError::NotFound(id.to_string()))?;

        let mut todo = todos[index].clone();
        apply(&mut todo, Utc::now())?;
        todos[index] = todo.clone();
        self.store.replace_all(&todos).await?;

        tracing::info!("Updated todo {}", id);
        Ok(todo)
    }
}

/// First position of the todo with `id`, if any.
fn find_index(todos: &[Todo], id: &str) -> Option<usize> {
    todos.iter().position(|todo| todo.id() == id)
}
