//! HTTP implementation of `TodoApi`.
//!
//! # Responsibility
//! - POST `{query, variables}` bodies to the configured endpoint.
//! - Attach `authorization: Bearer <token>` on authenticated operations.
//! - Unwrap the GraphQL envelope into typed results.
//!
//! # Invariants
//! - The body is decoded regardless of HTTP status.
//! - `errors` is checked before `data` is decoded.

use crate::api::documents;
use crate::api::{ApiError, ApiResult, TodoApi, UNKNOWN_GRAPHQL_ERROR};
use crate::config::ClientConfig;
use crate::model::todo::{Todo, TodoId, UpdatedTodo};
use crate::model::todo_list::{TodoList, TodoListId};
use async_trait::async_trait;
use log::debug;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

/// GraphQL-over-HTTP client for the todo API.
pub struct GraphQlClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl GraphQlClient {
    /// Builds a client honoring the configured request timeout.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        document: &str,
        variables: Value,
        token: Option<&str>,
    ) -> ApiResult<T> {
        let body = json!({
            "query": document,
            "variables": variables,
        });

        let mut request = self.http.post(self.config.api_url.as_str()).json(&body);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        debug!(
            "event=graphql_response module=api operation={} status={} bytes={}",
            operation,
            status,
            bytes.len()
        );

        let envelope: Envelope =
            serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode {
                status,
                message: err.to_string(),
            })?;

        if let Some(errors) = envelope.errors {
            let message = errors
                .into_iter()
                .next()
                .map(|error| error.message)
                .unwrap_or_else(|| UNKNOWN_GRAPHQL_ERROR.to_string());
            return Err(ApiError::Graphql(message));
        }

        let data = envelope
            .data
            .filter(|data| !data.is_null())
            .ok_or(ApiError::MissingData(operation))?;
        serde_json::from_value(data).map_err(|err| ApiError::Decode {
            status,
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl TodoApi for GraphQlClient {
    async fn sign_in(&self, username: &str, password: &str) -> ApiResult<String> {
        let data: SignInData = self
            .execute(
                "signIn",
                documents::SIGN_IN,
                json!({ "username": username, "password": password }),
                None,
            )
            .await?;
        Ok(data.sign_in)
    }

    async fn sign_up(&self, username: &str, password: &str) -> ApiResult<String> {
        let data: SignUpData = self
            .execute(
                "signUp",
                documents::SIGN_UP,
                json!({ "username": username, "password": password }),
                None,
            )
            .await?;
        Ok(data.sign_up)
    }

    async fn create_todo_list(
        &self,
        username: &str,
        title: &str,
        token: &str,
    ) -> ApiResult<TodoList> {
        let variables = json!({
            "input": [{
                "owner": { "connect": { "where": { "username": username } } },
                "title": title,
            }]
        });
        let data: CreateTodoListsData = self
            .execute(
                "createTodoLists",
                documents::CREATE_TODO_LIST,
                variables,
                Some(token),
            )
            .await?;
        data.create_todo_lists
            .todo_lists
            .into_iter()
            .next()
            .map(|list| list.into_todo_list(username))
            .ok_or(ApiError::MissingData("createTodoLists.todoLists"))
    }

    async fn todo_lists(&self, username: &str, token: &str) -> ApiResult<Vec<TodoList>> {
        let variables = json!({ "where": { "owner": { "username": username } } });
        let data: TodoListsData = self
            .execute("todoLists", documents::TODO_LISTS, variables, Some(token))
            .await?;
        Ok(data
            .todo_lists
            .into_iter()
            .map(|list| list.into_todo_list(username))
            .collect())
    }

    async fn delete_todo_list(&self, id: &TodoListId, token: &str) -> ApiResult<u64> {
        let data: DeleteTodoListsData = self
            .execute(
                "deleteTodoLists",
                documents::DELETE_TODO_LIST,
                json!({ "where": { "id": id } }),
                Some(token),
            )
            .await?;
        Ok(data.delete_todo_lists.nodes_deleted)
    }

    async fn create_todo(
        &self,
        content: &str,
        list_id: &TodoListId,
        token: &str,
    ) -> ApiResult<Todo> {
        let variables = json!({
            "input": [{
                "content": content,
                "done": false,
                "belongsTo": { "connect": { "where": { "id": list_id } } },
            }]
        });
        let data: CreateTodosData = self
            .execute("createTodos", documents::CREATE_TODO, variables, Some(token))
            .await?;
        data.create_todos
            .todos
            .into_iter()
            .next()
            .map(|todo| todo.into_todo(list_id))
            .ok_or(ApiError::MissingData("createTodos.todos"))
    }

    async fn todos(&self, list_id: &TodoListId, token: &str) -> ApiResult<Vec<Todo>> {
        let data: TodosData = self
            .execute(
                "todos",
                documents::TODOS,
                json!({ "where": { "belongsTo": { "id": list_id } } }),
                Some(token),
            )
            .await?;
        Ok(data
            .todos
            .into_iter()
            .map(|todo| todo.into_todo(list_id))
            .collect())
    }

    async fn delete_todo(&self, id: &TodoId, token: &str) -> ApiResult<u64> {
        let data: DeleteTodosData = self
            .execute(
                "deleteTodos",
                documents::DELETE_TODO,
                json!({ "where": { "id": id } }),
                Some(token),
            )
            .await?;
        Ok(data.delete_todos.nodes_deleted)
    }

    async fn update_todo(&self, id: &TodoId, done: bool, token: &str) -> ApiResult<UpdatedTodo> {
        let variables = json!({
            "where": { "id": id },
            "update": { "done": done },
        });
        let data: UpdateTodosData = self
            .execute("updateTodos", documents::UPDATE_TODO, variables, Some(token))
            .await?;
        data.update_todos
            .todos
            .into_iter()
            .next()
            .map(|todo| UpdatedTodo {
                id: todo.id,
                content: todo.content,
                done: todo.done,
            })
            .ok_or(ApiError::MissingData("updateTodos.todos"))
    }
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInData {
    sign_in: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpData {
    sign_up: String,
}

#[derive(Deserialize)]
struct Owner {
    username: String,
}

#[derive(Deserialize)]
struct RemoteTodoList {
    id: String,
    title: String,
    owner: Option<Owner>,
}

impl RemoteTodoList {
    fn into_todo_list(self, fallback_owner: &str) -> TodoList {
        let owner = self
            .owner
            .map(|owner| owner.username)
            .unwrap_or_else(|| fallback_owner.to_string());
        TodoList::new(self.id, self.title, owner)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoListsPayload {
    todo_lists: Vec<RemoteTodoList>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTodoListsData {
    create_todo_lists: TodoListsPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoListsData {
    todo_lists: Vec<RemoteTodoList>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteInfo {
    nodes_deleted: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteTodoListsData {
    delete_todo_lists: DeleteInfo,
}

#[derive(Deserialize)]
struct RemoteTodo {
    id: String,
    content: String,
    #[serde(default)]
    done: bool,
}

impl RemoteTodo {
    fn into_todo(self, list_id: &TodoListId) -> Todo {
        Todo::new(self.id, self.content, self.done, list_id.clone())
    }
}

#[derive(Deserialize)]
struct TodosPayload {
    todos: Vec<RemoteTodo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTodosData {
    create_todos: TodosPayload,
}

#[derive(Deserialize)]
struct TodosData {
    todos: Vec<RemoteTodo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteTodosData {
    delete_todos: DeleteInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTodosData {
    update_todos: TodosPayload,
}
