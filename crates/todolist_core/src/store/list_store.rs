//! Task list collection for the signed-in user.
//!
//! # Responsibility
//! - Load, create and delete the user's lists through `TodoApi`.
//! - Track which list is open (expanded) in the UI.
//!
//! # Invariants
//! - At most one list is open at a time.
//! - Created lists are appended; existing order is never changed.
//! - On failure the local collection and selection are unchanged.

use crate::api::TodoApi;
use crate::model::todo_list::{TodoList, TodoListId};
use crate::store::StoreResult;
use log::{info, warn};
use std::sync::Arc;

/// Local collection of the user's task lists.
pub struct ListStore<A: TodoApi> {
    api: Arc<A>,
    lists: Vec<TodoList>,
    open: Option<TodoListId>,
}

impl<A: TodoApi> ListStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            lists: Vec::new(),
            open: None,
        }
    }

    /// Lists in server-confirmed order.
    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    pub fn get(&self, id: &str) -> Option<&TodoList> {
        self.lists.iter().find(|list| list.id == id)
    }

    /// Fetches every list owned by `username` and replaces the collection.
    pub async fn load(&mut self, username: &str, token: &str) -> StoreResult<&[TodoList]> {
        match self.api.todo_lists(username, token).await {
            Ok(lists) => {
                info!(
                    "event=lists_load module=list_store status=ok count={}",
                    lists.len()
                );
                if let Some(open) = &self.open {
                    if !lists.iter().any(|list| &list.id == open) {
                        self.open = None;
                    }
                }
                self.lists = lists;
                Ok(&self.lists)
            }
            Err(err) => {
                warn!("event=lists_load module=list_store status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Creates one list and appends it.
    ///
    /// Returns `Ok(None)` without a request when `title` is blank.
    pub async fn create(
        &mut self,
        username: &str,
        title: &str,
        token: &str,
    ) -> StoreResult<Option<TodoList>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        match self.api.create_todo_list(username, title, token).await {
            Ok(list) => {
                info!("event=list_create module=list_store status=ok");
                self.lists.push(list.clone());
                Ok(Some(list))
            }
            Err(err) => {
                warn!("event=list_create module=list_store status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Deletes one list by id and drops it locally.
    ///
    /// Closes the list first if it was open.
    pub async fn delete(&mut self, id: &TodoListId, token: &str) -> StoreResult<()> {
        match self.api.delete_todo_list(id, token).await {
            Ok(deleted) => {
                info!("event=list_delete module=list_store status=ok nodes_deleted={deleted}");
                self.lists.retain(|list| &list.id != id);
                if self.open.as_ref() == Some(id) {
                    self.open = None;
                }
                Ok(())
            }
            Err(err) => {
                warn!("event=list_delete module=list_store status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Toggles the expander of list `id`.
    ///
    /// Opening a list closes any other; toggling the open list closes it.
    /// Returns the open list id after the toggle.
    pub fn toggle_open(&mut self, id: &str) -> Option<&TodoListId> {
        if self.open.as_deref() == Some(id) {
            self.open = None;
        } else if self.get(id).is_some() {
            self.open = Some(id.to_string());
        }
        self.open.as_ref()
    }

    pub fn open_list(&self) -> Option<&TodoList> {
        self.open.as_deref().and_then(|id| self.get(id))
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.as_deref() == Some(id)
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    /// Drops every list and the selection.
    pub fn clear(&mut self) {
        self.lists.clear();
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::ListStore;
    use crate::api::memory::InMemoryTodoApi;
    use crate::model::todo_list::TodoList;
    use std::sync::Arc;

    fn store_with(lists: &[(&str, &str)]) -> ListStore<InMemoryTodoApi> {
        let mut store = ListStore::new(Arc::new(InMemoryTodoApi::new()));
        store.lists = lists
            .iter()
            .map(|(id, title)| TodoList::new(*id, *title, "alice"))
            .collect();
        store
    }

    #[test]
    fn opening_second_list_closes_first() {
        let mut store = store_with(&[("a", "A"), ("b", "B")]);
        assert_eq!(store.toggle_open("a").map(String::as_str), Some("a"));
        assert_eq!(store.toggle_open("b").map(String::as_str), Some("b"));
        assert!(!store.is_open("a"));
        assert!(store.is_open("b"));
    }

    #[test]
    fn toggling_open_list_closes_it() {
        let mut store = store_with(&[("a", "A")]);
        store.toggle_open("a");
        assert_eq!(store.toggle_open("a"), None);
        assert!(store.open_list().is_none());
    }

    #[test]
    fn toggling_unknown_list_keeps_selection() {
        let mut store = store_with(&[("a", "A")]);
        store.toggle_open("a");
        assert_eq!(store.toggle_open("zzz").map(String::as_str), Some("a"));
    }
}
