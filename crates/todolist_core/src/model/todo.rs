//! Task record.

use crate::model::todo_list::TodoListId;
use serde::{Deserialize, Serialize};

/// Server-assigned task identifier.
pub type TodoId = String;

/// Single task belonging to exactly one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub content: String,
    pub done: bool,
    /// Parent list id. Set client-side from the store scope.
    pub list: TodoListId,
}

impl Todo {
    pub fn new(
        id: impl Into<TodoId>,
        content: impl Into<String>,
        done: bool,
        list: impl Into<TodoListId>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            done,
            list: list.into(),
        }
    }
}

/// Task fields echoed back by an update call.
///
/// The remote selection set does not include the parent list, so updates are
/// reconciled into local entries by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedTodo {
    pub id: TodoId,
    pub content: String,
    pub done: bool,
}
