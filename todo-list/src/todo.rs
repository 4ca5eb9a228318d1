use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo item as persisted in the collection file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    id: String,
    title: String,
    #[serde(default)]
    due_at: Option<String>,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new, not yet completed todo with a freshly generated ID.
    ///
    /// `created_at` and `updated_at` are both set to `now`.
    pub fn new(title: String, due_at: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            due_at,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the ID of the todo.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the title of the todo.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the due date string, if one is set.
    pub fn due_at(&self) -> Option<&str> {
        self.due_at.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn set_due_at(&mut self, due_at: Option<String>) {
        self.due_at = due_at;
    }

    pub(crate) fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub(crate) fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_create_new_todo() {
        let now = Utc::now();
        let todo = Todo::new("Buy milk".to_string(), None, now);

        assert_eq!(todo.title(), "Buy milk");
        assert_eq!(todo.due_at(), None);
        assert!(!todo.is_completed());
        assert_eq!(todo.created_at(), now);
        assert_eq!(todo.updated_at(), now);
        assert!(uuid::Uuid::parse_str(todo.id()).is_ok());
    }

    #[test]
    fn new_todos_get_distinct_ids() {
        let now = Utc::now();
        let first = Todo::new("A".to_string(), None, now);
        let second = Todo::new("A".to_string(), None, now);

        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let now = Utc::now();
        let todo = Todo::new(
            "Write report".to_string(),
            Some("2024-01-01T10:00".to_string()),
            now,
        );

        let value = serde_json::to_value(&todo).unwrap();

        assert_eq!(value["title"], "Write report");
        assert_eq!(value["dueAt"], "2024-01-01T10:00");
        assert_eq!(value["completed"], false);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn serializes_missing_due_date_as_null() {
        let todo = Todo::new("A".to_string(), None, Utc::now());

        let value = serde_json::to_value(&todo).unwrap();

        assert!(value["dueAt"].is_null());
    }

    #[test]
    fn deserializes_record_without_optional_fields() {
        let json = r#"
        {
            "id": "abc",
            "title": "Legacy",
            "createdAt": "2023-01-01T00:00:00Z",
            "updatedAt": "2023-01-01T00:00:00Z"
        }
        "#;

        let todo: Todo = serde_json::from_str(json).unwrap();

        assert_eq!(todo.id(), "abc");
        assert_eq!(todo.due_at(), None);
        assert!(!todo.is_completed());
    }
}
