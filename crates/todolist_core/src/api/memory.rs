//! In-process `TodoApi` implementation.
//!
//! # Responsibility
//! - Mirror the remote API semantics without a network: accounts, bearer
//!   token checks, owner-scoped lists, list-scoped tasks.
//! - Let callers inject failures per operation or per task id.
//! - Count calls so callers can assert that no request was issued.
//!
//! # Invariants
//! - Ids are freshly minted UUID strings and never reused.
//! - Injected failures are consumed by the first matching call.

use crate::api::{ApiError, ApiResult, TodoApi};
use crate::model::todo::{Todo, TodoId, UpdatedTodo};
use crate::model::todo_list::{TodoList, TodoListId};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
pub const USERNAME_TAKEN_MESSAGE: &str = "Username already taken";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Remote operation names, used for call counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    SignIn,
    SignUp,
    CreateTodoList,
    TodoLists,
    DeleteTodoList,
    CreateTodo,
    Todos,
    DeleteTodo,
    UpdateTodo,
}

#[derive(Default)]
struct Account {
    password: String,
    token: String,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    lists: Vec<TodoList>,
    todos: Vec<Todo>,
    calls: BTreeMap<Operation, usize>,
    failing_operations: HashMap<Operation, String>,
    failing_updates: HashMap<TodoId, String>,
}

impl State {
    fn record(&mut self, operation: Operation) -> ApiResult<()> {
        *self.calls.entry(operation).or_insert(0) += 1;
        match self.failing_operations.remove(&operation) {
            Some(message) => Err(ApiError::Graphql(message)),
            None => Ok(()),
        }
    }

    fn authorize(&self, token: &str) -> ApiResult<String> {
        self.accounts
            .iter()
            .find(|(_, account)| account.token == token)
            .map(|(username, _)| username.clone())
            .ok_or_else(|| ApiError::Graphql(UNAUTHORIZED_MESSAGE.to_string()))
    }
}

/// In-memory fake of the remote todo API.
#[derive(Default)]
pub struct InMemoryTodoApi {
    state: Mutex<State>,
}

impl InMemoryTodoApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account that signs in with a fixed token.
    pub fn with_account(self, username: &str, password: &str, token: &str) -> Self {
        self.lock().accounts.insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                token: token.to_string(),
            },
        );
        self
    }

    /// Inserts a list owned by `owner` without counting a call.
    pub fn seed_list(&self, owner: &str, title: &str) -> TodoList {
        let list = TodoList::new(new_id(), title, owner);
        self.lock().lists.push(list.clone());
        list
    }

    /// Inserts a task into `list_id` without counting a call.
    pub fn seed_todo(&self, list_id: &TodoListId, content: &str, done: bool) -> Todo {
        let todo = Todo::new(new_id(), content, done, list_id.clone());
        self.lock().todos.push(todo.clone());
        todo
    }

    /// Makes the next call of `operation` fail with `message`.
    pub fn fail_next(&self, operation: Operation, message: &str) {
        self.lock()
            .failing_operations
            .insert(operation, message.to_string());
    }

    /// Makes the next update of task `id` fail with `message`.
    pub fn fail_update_of(&self, id: &TodoId, message: &str) {
        self.lock()
            .failing_updates
            .insert(id.clone(), message.to_string());
    }

    /// Number of calls made to `operation`, failed ones included.
    pub fn calls(&self, operation: Operation) -> usize {
        self.lock().calls.get(&operation).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Server-side view of one task.
    pub fn stored_todo(&self, id: &TodoId) -> Option<Todo> {
        self.lock().todos.iter().find(|todo| &todo.id == id).cloned()
    }

    /// Server-side view of the lists owned by `owner`.
    pub fn stored_lists(&self, owner: &str) -> Vec<TodoList> {
        self.lock()
            .lists
            .iter()
            .filter(|list| list.owner == owner)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TodoApi for InMemoryTodoApi {
    async fn sign_in(&self, username: &str, password: &str) -> ApiResult<String> {
        let mut state = self.lock();
        state.record(Operation::SignIn)?;
        match state.accounts.get(username) {
            Some(account) if account.password == password => Ok(account.token.clone()),
            _ => Err(ApiError::Graphql(INVALID_CREDENTIALS_MESSAGE.to_string())),
        }
    }

    async fn sign_up(&self, username: &str, password: &str) -> ApiResult<String> {
        let mut state = self.lock();
        state.record(Operation::SignUp)?;
        if state.accounts.contains_key(username) {
            return Err(ApiError::Graphql(USERNAME_TAKEN_MESSAGE.to_string()));
        }
        let token = new_id();
        state.accounts.insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                token: token.clone(),
            },
        );
        Ok(token)
    }

    async fn create_todo_list(
        &self,
        username: &str,
        title: &str,
        token: &str,
    ) -> ApiResult<TodoList> {
        let mut state = self.lock();
        state.record(Operation::CreateTodoList)?;
        state.authorize(token)?;
        let list = TodoList::new(new_id(), title, username);
        state.lists.push(list.clone());
        Ok(list)
    }

    async fn todo_lists(&self, username: &str, token: &str) -> ApiResult<Vec<TodoList>> {
        let mut state = self.lock();
        state.record(Operation::TodoLists)?;
        state.authorize(token)?;
        Ok(state
            .lists
            .iter()
            .filter(|list| list.owner == username)
            .cloned()
            .collect())
    }

    async fn delete_todo_list(&self, id: &TodoListId, token: &str) -> ApiResult<u64> {
        let mut state = self.lock();
        state.record(Operation::DeleteTodoList)?;
        state.authorize(token)?;
        let before = state.lists.len();
        state.lists.retain(|list| &list.id != id);
        Ok((before - state.lists.len()) as u64)
    }

    async fn create_todo(
        &self,
        content: &str,
        list_id: &TodoListId,
        token: &str,
    ) -> ApiResult<Todo> {
        let mut state = self.lock();
        state.record(Operation::CreateTodo)?;
        state.authorize(token)?;
        let todo = Todo::new(new_id(), content, false, list_id.clone());
        state.todos.push(todo.clone());
        Ok(todo)
    }

    async fn todos(&self, list_id: &TodoListId, token: &str) -> ApiResult<Vec<Todo>> {
        let mut state = self.lock();
        state.record(Operation::Todos)?;
        state.authorize(token)?;
        Ok(state
            .todos
            .iter()
            .filter(|todo| &todo.list == list_id)
            .cloned()
            .collect())
    }

    async fn delete_todo(&self, id: &TodoId, token: &str) -> ApiResult<u64> {
        let mut state = self.lock();
        state.record(Operation::DeleteTodo)?;
        state.authorize(token)?;
        let before = state.todos.len();
        state.todos.retain(|todo| &todo.id != id);
        Ok((before - state.todos.len()) as u64)
    }

    async fn update_todo(&self, id: &TodoId, done: bool, token: &str) -> ApiResult<UpdatedTodo> {
        let mut state = self.lock();
        state.record(Operation::UpdateTodo)?;
        state.authorize(token)?;
        if let Some(message) = state.failing_updates.remove(id) {
            return Err(ApiError::Graphql(message));
        }
        let todo = state
            .todos
            .iter_mut()
            .find(|todo| &todo.id == id)
            .ok_or(ApiError::MissingData("updateTodos.todos"))?;
        todo.done = done;
        Ok(UpdatedTodo {
            id: todo.id.clone(),
            content: todo.content.clone(),
            done: todo.done,
        })
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
