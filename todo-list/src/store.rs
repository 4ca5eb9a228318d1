//! JSON file storage for the whole todo collection.
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::todo::Todo;

/// Error type for TodoStore operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Represents a filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Represents a JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stores the todo collection as a single JSON array on disk.
///
/// The file is never modified in place. [`TodoStore::replace_all`] writes a
/// temporary file next to it and renames it over the canonical path, so a
/// reader always sees either the previous or the new collection.
#[derive(Debug, Clone)]
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the collection file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensures the data directory exists and creates an empty collection
    /// if nothing has been persisted yet. Safe to call on every startup.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn initialize(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        if !tokio::fs::try_exists(&self.path).await? {
            self.replace_all(&[]).await?;
            tracing::info!("Created empty todo collection");
        }
        Ok(())
    }

    /// Loads the whole collection.
    ///
    /// Any read or parse failure yields an empty collection. The failure is
    /// logged but not returned, so a corrupt file never takes the API down.
    /// Use [`TodoStore::try_load_all`] to get the error instead.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load_all(&self) -> Vec<Todo> {
        match self.try_load_all().await {
            Ok(todos) => todos,
            Err(err) => {
                tracing::warn!(
                    "Failed to load todos, falling back to an empty collection: {}",
                    err
                );
                Vec::new()
            }
        }
    }

    /// Loads the whole collection, reporting read and parse failures.
    pub async fn try_load_all(&self) -> Result<Vec<Todo>, StoreError> {
        let contents = tokio::fs::read(&self.path).await?;
        let todos = serde_json::from_slice(&contents)?;
        Ok(todos)
    }

    /// Atomically replaces the persisted collection with `todos`.
    ///
    /// On failure the canonical file still holds the last committed collection.
    #[tracing::instrument(skip(self, todos), fields(path = %self.path.display(), count = todos.len()))]
    pub async fn replace_all(&self, todos: &[Todo]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(todos)?;
        let temp_path = self.temp_path();

        if let Err(err) = write_synced(&temp_path, &json).await {
            remove_temp_file(&temp_path).await;
            return Err(err.into());
        }
        if let Err(err) = tokio::fs::rename(&temp_path, &self.path).await {
            remove_temp_file(&temp_path).await;
            return Err(err.into());
        }

        tracing::debug!("Persisted todo collection");
        Ok(())
    }

    /// Unique temporary path in the same directory as the collection file,
    /// so the final rename never crosses filesystems.
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("todos.json");
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
    }
}

async fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    Ok(())
}

async fn remove_temp_file(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove temporary file {}: {}", path.display(), err);
        }
    }
}
