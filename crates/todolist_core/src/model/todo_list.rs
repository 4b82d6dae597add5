//! Task list record.

use serde::{Deserialize, Serialize};

/// Server-assigned task list identifier.
pub type TodoListId = String;

/// Named, user-owned container of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: TodoListId,
    pub title: String,
    /// Username of the owner. Filled from the fetch filter when the remote
    /// selection set does not include it.
    pub owner: String,
}

impl TodoList {
    pub fn new(
        id: impl Into<TodoListId>,
        title: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            owner: owner.into(),
        }
    }
}
