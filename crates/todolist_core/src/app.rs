//! Application facade over session, auth and stores.
//!
//! # Responsibility
//! - Single owner of the `Session`; passes identity to stores explicitly.
//! - Keep the task store scoped to whichever list is open.
//! - Reset all local state on sign-in and sign-out.
//!
//! # Invariants
//! - Store operations require a signed-in session.
//! - The task store scope always equals the open list (or none).

use crate::api::TodoApi;
use crate::model::session::{Identity, Session};
use crate::model::todo::{Todo, TodoId};
use crate::model::todo_list::{TodoList, TodoListId};
use crate::service::auth_service::{AuthAction, AuthResult, AuthService};
use crate::store::list_store::ListStore;
use crate::store::task_store::{TaskFilter, TaskStore};
use crate::store::{StoreError, StoreResult};
use std::sync::Arc;

/// Client state for one process: who is signed in and what they see.
pub struct TodoApp<A: TodoApi> {
    session: Session,
    auth: AuthService<A>,
    lists: ListStore<A>,
    tasks: TaskStore<A>,
}

impl<A: TodoApi> TodoApp<A> {
    pub fn new(api: A) -> Self {
        Self::with_shared_api(Arc::new(api))
    }

    /// Builds the app around an API handle the caller keeps a clone of.
    pub fn with_shared_api(api: Arc<A>) -> Self {
        Self {
            session: Session::new(),
            auth: AuthService::new(Arc::clone(&api)),
            lists: ListStore::new(Arc::clone(&api)),
            tasks: TaskStore::new(api),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn lists(&self) -> &ListStore<A> {
        &self.lists
    }

    pub fn tasks(&self) -> &TaskStore<A> {
        &self.tasks
    }

    pub async fn sign_in(&mut self, username: &str, password: &str) -> AuthResult<()> {
        self.authenticate(AuthAction::SignIn, username, password)
            .await
    }

    pub async fn sign_up(&mut self, username: &str, password: &str) -> AuthResult<()> {
        self.authenticate(AuthAction::SignUp, username, password)
            .await
    }

    /// Clears the session and every store.
    pub fn sign_out(&mut self) {
        self.auth.sign_out(&mut self.session);
        self.reset_stores();
    }

    /// Reloads the signed-in user's lists.
    pub async fn load_lists(&mut self) -> StoreResult<&[TodoList]> {
        let identity = signed_in(&self.session)?;
        self.lists
            .load(&identity.username, &identity.token)
            .await?;
        self.sync_task_scope();
        Ok(self.lists.lists())
    }

    pub async fn create_list(&mut self, title: &str) -> StoreResult<Option<TodoList>> {
        let identity = signed_in(&self.session)?;
        self.lists
            .create(&identity.username, title, &identity.token)
            .await
    }

    pub async fn delete_list(&mut self, id: &TodoListId) -> StoreResult<()> {
        let identity = signed_in(&self.session)?;
        self.lists.delete(id, &identity.token).await?;
        self.sync_task_scope();
        Ok(())
    }

    /// Toggles the expander of list `id` and loads its tasks when opened.
    ///
    /// Returns the open list id after the toggle.
    pub async fn toggle_list(&mut self, id: &str) -> StoreResult<Option<TodoListId>> {
        let identity = signed_in(&self.session)?;
        let open = self.lists.toggle_open(id).cloned();
        self.tasks.scope(open.clone());
        if let Some(list_id) = &open {
            self.tasks.load(list_id, &identity.token).await?;
        }
        Ok(open)
    }

    /// Reloads the tasks of the open list.
    pub async fn load_tasks(&mut self) -> StoreResult<&[Todo]> {
        let identity = signed_in(&self.session)?;
        let list_id = self
            .tasks
            .list_id()
            .cloned()
            .ok_or(StoreError::NoListOpen)?;
        self.tasks.load(&list_id, &identity.token).await
    }

    /// Creates a task in the open list from the caller's input buffer.
    pub async fn create_task(&mut self, input: &mut String) -> StoreResult<Option<Todo>> {
        let identity = signed_in(&self.session)?;
        self.tasks.create(input, &identity.token).await
    }

    pub async fn delete_task(&mut self, id: &TodoId) -> StoreResult<()> {
        let identity = signed_in(&self.session)?;
        self.tasks.delete(id, &identity.token).await
    }

    /// Flips `done` of one task based on its current local state.
    pub async fn toggle_task(&mut self, id: &TodoId) -> StoreResult<()> {
        let identity = signed_in(&self.session)?;
        let current_done = self
            .tasks
            .todos()
            .iter()
            .find(|todo| &todo.id == id)
            .map(|todo| todo.done)
            .ok_or_else(|| StoreError::UnknownEntry(id.clone()))?;
        self.tasks
            .toggle_one(id, current_done, &identity.token)
            .await
    }

    pub async fn toggle_all_tasks(&mut self, done: bool) -> StoreResult<usize> {
        let identity = signed_in(&self.session)?;
        self.tasks.toggle_all(done, &identity.token).await
    }

    pub fn set_task_filter(&mut self, filter: TaskFilter) {
        self.tasks.set_filter(filter);
    }

    pub fn toggle_show_done(&mut self) -> TaskFilter {
        self.tasks.toggle_show_done()
    }

    pub fn toggle_show_undone(&mut self) -> TaskFilter {
        self.tasks.toggle_show_undone()
    }

    async fn authenticate(
        &mut self,
        action: AuthAction,
        username: &str,
        password: &str,
    ) -> AuthResult<()> {
        self.auth
            .authenticate(action, &mut self.session, username, password)
            .await?;
        self.reset_stores();
        Ok(())
    }

    fn sync_task_scope(&mut self) {
        let open = self.lists.open_list().map(|list| list.id.clone());
        self.tasks.scope(open);
    }

    fn reset_stores(&mut self) {
        self.lists.clear();
        self.tasks.clear();
    }
}

fn signed_in(session: &Session) -> StoreResult<Identity> {
    session.identity().cloned().ok_or(StoreError::NotSignedIn)
}
