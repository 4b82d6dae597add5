//! Client core for the todo-list mobile app.
//! Validation, session and list/task state synchronized with the GraphQL API.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use api::graphql::GraphQlClient;
pub use api::memory::InMemoryTodoApi;
pub use api::{ApiError, ApiResult, TodoApi};
pub use app::TodoApp;
pub use config::{ClientConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::session::{Identity, Session};
pub use model::todo::{Todo, TodoId, UpdatedTodo};
pub use model::todo_list::{TodoList, TodoListId};
pub use service::auth_service::{AuthAction, AuthError, AuthResult, AuthService};
pub use store::list_store::ListStore;
pub use store::task_store::{TaskFilter, TaskStore};
pub use store::{StoreError, StoreResult, ToggleAllFailure};
pub use validation::{validate, ValidationErrors};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
