//! Remote GraphQL API boundary.
//!
//! # Responsibility
//! - Describe the remote operations the client consumes as one trait.
//! - Normalize transport and GraphQL error payloads into `ApiError`.
//!
//! # Invariants
//! - A response carrying a non-null `errors` array is always a failure and
//!   only the first message is kept.
//! - Implementations never retry.

use crate::model::todo::{Todo, TodoId, UpdatedTodo};
use crate::model::todo_list::{TodoList, TodoListId};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod documents;
pub mod graphql;
pub mod memory;

pub type ApiResult<T> = Result<T, ApiError>;

/// Fallback message when the API reports an empty `errors` array.
pub const UNKNOWN_GRAPHQL_ERROR: &str = "unknown GraphQL error";

/// Failure of one remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Request could not be sent or the response could not be read.
    Transport(String),
    /// API answered with an `errors` payload; holds the first message.
    Graphql(String),
    /// Response body was not a valid GraphQL envelope.
    Decode { status: u16, message: String },
    /// Envelope had neither `errors` nor the expected `data` field.
    MissingData(&'static str),
}

impl ApiError {
    /// Message suitable for direct display to the user.
    pub fn message(&self) -> String {
        match self {
            Self::Graphql(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the API itself rejected the request.
    pub fn is_request_error(&self) -> bool {
        matches!(self, Self::Graphql(_))
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Graphql(message) => write!(f, "{message}"),
            Self::Decode { status, message } => {
                write!(f, "invalid response (status {status}): {message}")
            }
            Self::MissingData(field) => write!(f, "response is missing `{field}` data"),
        }
    }
}

impl Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Remote operations consumed by the client.
///
/// Every authenticated call takes the bearer token explicitly; the caller
/// owns the session.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn sign_in(&self, username: &str, password: &str) -> ApiResult<String>;
    async fn sign_up(&self, username: &str, password: &str) -> ApiResult<String>;

    async fn create_todo_list(
        &self,
        username: &str,
        title: &str,
        token: &str,
    ) -> ApiResult<TodoList>;
    async fn todo_lists(&self, username: &str, token: &str) -> ApiResult<Vec<TodoList>>;
    /// Returns the number of deleted nodes.
    async fn delete_todo_list(&self, id: &TodoListId, token: &str) -> ApiResult<u64>;

    async fn create_todo(&self, content: &str, list_id: &TodoListId, token: &str)
        -> ApiResult<Todo>;
    async fn todos(&self, list_id: &TodoListId, token: &str) -> ApiResult<Vec<Todo>>;
    async fn delete_todo(&self, id: &TodoId, token: &str) -> ApiResult<u64>;
    /// Sets `done` and returns the fields the remote reports back.
    async fn update_todo(&self, id: &TodoId, done: bool, token: &str)
        -> ApiResult<UpdatedTodo>;
}
