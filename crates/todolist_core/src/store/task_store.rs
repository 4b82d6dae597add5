//! Task collection for the open list.
//!
//! # Responsibility
//! - Load, create, delete and toggle tasks of exactly one list.
//! - Derive progress, done count and the filtered view.
//!
//! # Invariants
//! - Changing the scoping list drops the collection and resets the filter.
//! - `toggle_one` only ever changes `done` of the matching entry.
//! - `toggle_all` applies each confirmed update by id; failed ids keep their
//!   previous state and are reported back.

use crate::api::TodoApi;
use crate::model::todo::{Todo, TodoId, UpdatedTodo};
use crate::model::todo_list::TodoListId;
use crate::store::{StoreError, StoreResult, ToggleAllFailure};
use futures_util::future::join_all;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Display mode for the task list. Derived state, never sent remotely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    #[default]
    All,
    Done,
    Undone,
}

impl TaskFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Done => "done",
            Self::Undone => "undone",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "done" => Some(Self::Done),
            "undone" => Some(Self::Undone),
            _ => None,
        }
    }

    fn accepts(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Done => todo.done,
            Self::Undone => !todo.done,
        }
    }
}

/// Local collection of the tasks of one list.
pub struct TaskStore<A: TodoApi> {
    api: Arc<A>,
    list_id: Option<TodoListId>,
    todos: Vec<Todo>,
    filter: TaskFilter,
}

impl<A: TodoApi> TaskStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            list_id: None,
            todos: Vec::new(),
            filter: TaskFilter::All,
        }
    }

    /// Id of the list this store is scoped to.
    pub fn list_id(&self) -> Option<&TodoListId> {
        self.list_id.as_ref()
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Rescopes the store, resetting local state when the list changes.
    pub fn scope(&mut self, list_id: Option<TodoListId>) {
        if self.list_id == list_id {
            return;
        }
        self.list_id = list_id;
        self.todos.clear();
        self.filter = TaskFilter::All;
    }

    /// Fetches the tasks of `list_id` and replaces the collection.
    pub async fn load(&mut self, list_id: &TodoListId, token: &str) -> StoreResult<&[Todo]> {
        self.scope(Some(list_id.clone()));
        match self.api.todos(list_id, token).await {
            Ok(todos) => {
                info!(
                    "event=todos_load module=task_store status=ok count={}",
                    todos.len()
                );
                self.todos = todos;
                Ok(&self.todos)
            }
            Err(err) => {
                warn!("event=todos_load module=task_store status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Creates a task from the caller's input buffer.
    ///
    /// Blank input is a no-op. The trimmed content is submitted. On success
    /// the task is appended and `input` is cleared; on failure `input` is
    /// kept for another attempt.
    pub async fn create(&mut self, input: &mut String, token: &str) -> StoreResult<Option<Todo>> {
        let list_id = self.list_id.clone().ok_or(StoreError::NoListOpen)?;
        let content = input.trim();
        if content.is_empty() {
            return Ok(None);
        }

        match self.api.create_todo(content, &list_id, token).await {
            Ok(todo) => {
                info!("event=todo_create module=task_store status=ok");
                self.todos.push(todo.clone());
                input.clear();
                Ok(Some(todo))
            }
            Err(err) => {
                warn!("event=todo_create module=task_store status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Deletes one task and drops it locally.
    pub async fn delete(&mut self, id: &TodoId, token: &str) -> StoreResult<()> {
        match self.api.delete_todo(id, token).await {
            Ok(deleted) => {
                info!("event=todo_delete module=task_store status=ok nodes_deleted={deleted}");
                self.todos.retain(|todo| &todo.id != id);
                Ok(())
            }
            Err(err) => {
                warn!("event=todo_delete module=task_store status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Requests `done = !current_done` for one task.
    ///
    /// Only the `done` field of the matching local entry is updated.
    pub async fn toggle_one(
        &mut self,
        id: &TodoId,
        current_done: bool,
        token: &str,
    ) -> StoreResult<()> {
        match self.api.update_todo(id, !current_done, token).await {
            Ok(updated) => {
                info!("event=todo_toggle module=task_store status=ok");
                if let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == updated.id) {
                    todo.done = updated.done;
                }
                Ok(())
            }
            Err(err) => {
                warn!("event=todo_toggle module=task_store status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Sets `done = new_done` on every task with one concurrent request each.
    ///
    /// Waits for all requests. Each confirmed update is applied by id;
    /// entries whose request failed are left as they were and listed in
    /// `StoreError::ToggleAll`. Returns the number of applied updates.
    pub async fn toggle_all(&mut self, new_done: bool, token: &str) -> StoreResult<usize> {
        let ids: Vec<TodoId> = self.todos.iter().map(|todo| todo.id.clone()).collect();
        if ids.is_empty() {
            return Ok(0);
        }

        let api = Arc::clone(&self.api);
        let results = join_all(ids.iter().map(|id| api.update_todo(id, new_done, token))).await;

        let mut updated = 0;
        let mut failed = Vec::new();
        let mut first_message = None;
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(confirmed) => {
                    self.apply_update(confirmed);
                    updated += 1;
                }
                Err(err) => {
                    first_message.get_or_insert_with(|| err.message());
                    failed.push(id);
                }
            }
        }

        if failed.is_empty() {
            info!("event=todos_toggle_all module=task_store status=ok updated={updated}");
            return Ok(updated);
        }

        warn!(
            "event=todos_toggle_all module=task_store status=partial updated={} failed={}",
            updated,
            failed.len()
        );
        Err(StoreError::ToggleAll(ToggleAllFailure {
            updated,
            failed,
            message: first_message.unwrap_or_default(),
        }))
    }

    /// Percentage of done tasks, `0.0` when empty.
    pub fn progress(&self) -> f64 {
        if self.todos.is_empty() {
            return 0.0;
        }
        100.0 * self.count_done() as f64 / self.todos.len() as f64
    }

    pub fn count_done(&self) -> usize {
        self.todos.iter().filter(|todo| todo.done).count()
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    /// Switches between done-only and all.
    pub fn toggle_show_done(&mut self) -> TaskFilter {
        self.filter = if self.filter == TaskFilter::Done {
            TaskFilter::All
        } else {
            TaskFilter::Done
        };
        self.filter
    }

    /// Switches between undone-only and all.
    pub fn toggle_show_undone(&mut self) -> TaskFilter {
        self.filter = if self.filter == TaskFilter::Undone {
            TaskFilter::All
        } else {
            TaskFilter::Undone
        };
        self.filter
    }

    /// Tasks accepted by the active filter, in collection order.
    pub fn visible(&self) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| self.filter.accepts(todo))
            .collect()
    }

    /// Drops the scope, tasks and filter.
    pub fn clear(&mut self) {
        self.scope(None);
    }

    fn apply_update(&mut self, confirmed: UpdatedTodo) {
        if let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == confirmed.id) {
            todo.content = confirmed.content;
            todo.done = confirmed.done;
        }
    }
}
