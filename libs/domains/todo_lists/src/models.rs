use crate::error::{TodoListError, TodoListResult};
use crate::ids::random_hex_id;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A single entry on a todo list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoItem {
    /// Opaque unique id within the list
    #[schema(example = "3f9a0c1d2b4e5f60")]
    pub id: String,
    #[schema(example = "Buy milk")]
    pub name: String,
    pub completed: bool,
}

impl TodoItem {
    /// New uncompleted item with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: random_hex_id(),
            name: name.into(),
            completed: false,
        }
    }
}

/// Metadata payload stored next to a list's name embedding.
///
/// Serialized as `{"name", "items", "passwordHash"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListMetadata {
    pub name: String,
    #[serde(default)]
    pub items: Vec<TodoItem>,
    pub password_hash: String,
}

impl TodoListMetadata {
    pub fn to_value(&self) -> TodoListResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_value(value: serde_json::Value) -> TodoListResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Public view of a list. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TodoListView {
    #[schema(example = "Monday todos")]
    pub name: String,
    pub items: Vec<TodoItem>,
}

impl From<TodoListMetadata> for TodoListView {
    fn from(metadata: TodoListMetadata) -> Self {
        Self {
            name: metadata.name,
            items: metadata.items,
        }
    }
}

/// Name and password that together unlock a list
#[derive(Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(length(min = 3, max = 50, message = "Name must be 3-50 characters"))]
    #[schema(example = "Monday todos", min_length = 3, max_length = 50)]
    pub name: String,

    #[validate(length(min = 3, max = 50, message = "Password must be 3-50 characters"))]
    #[schema(example = "secret", min_length = 3, max_length = 50)]
    pub password: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Replacement item sequence for a list
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTodoItems {
    pub items: Vec<TodoItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TodoListId {
    #[schema(example = "9f86d081884c7d65")]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct NameQuery {
    /// Candidate list name
    #[validate(length(min = 3, max = 50, message = "Name must be 3-50 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NameExists {
    pub exists: bool,
}

/// Reject item sequences with blank names or repeated ids.
pub fn validate_items(items: &[TodoItem]) -> TodoListResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.id.trim().is_empty() {
            return Err(TodoListError::Validation(
                "Todo item id must not be empty".to_string(),
            ));
        }
        if item.name.trim().is_empty() {
            return Err(TodoListError::Validation(format!(
                "Todo item {} has an empty name",
                item.id
            )));
        }
        if !seen.insert(item.id.as_str()) {
            return Err(TodoListError::Validation(format!(
                "Duplicate todo item id: {}",
                item.id
            )));
        }
    }
    Ok(())
}
