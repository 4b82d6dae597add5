//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose sign-in, list and task use-cases to Dart via FRB.
//! - Own the process-wide `TodoApp` and the runtime that drives it.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls that touch the app are serialized through one mutex; each store
//!   mutation completes before the next call starts.
//! - Sync calls never take the app mutex. They read the view published after
//!   the last completed call.
//! - Errors are returned as messages inside response envelopes.

use log::warn;
use once_cell::sync::{Lazy, OnceCell};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;
use todolist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    validate, AuthError, ClientConfig, GraphQlClient, StoreError, TaskFilter, TodoApp,
};
use tokio::runtime::Runtime;

static RUNTIME: OnceCell<Runtime> = OnceCell::new();
static API_CONFIG: OnceCell<ClientConfig> = OnceCell::new();
static APP: OnceCell<Mutex<TodoApp<GraphQlClient>>> = OnceCell::new();
static VIEW: Lazy<RwLock<View>> = Lazy::new(|| RwLock::new(View::default()));

/// Last published session and task panel.
#[derive(Clone)]
struct View {
    session: SessionStatus,
    todos: TodosResponse,
}

impl Default for View {
    fn default() -> Self {
        Self {
            session: signed_out_status(),
            todos: empty_todos(true, String::new()),
        }
    }
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may create `log_dir`.
/// - Idempotent for the same `level + log_dir`; conflicting calls fail.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Sets the GraphQL endpoint used by every later call.
///
/// Must run before the first remote call; otherwise `TODOLIST_API_URL` and
/// `TODOLIST_API_TIMEOUT_MS` are read from the environment.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Idempotent for the same values; a different value once set fails.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_api(api_url: String, timeout_ms: Option<u64>) -> String {
    let requested = match build_config(&api_url, timeout_ms) {
        Ok(config) => config,
        Err(err) => return err,
    };
    let active = API_CONFIG.get_or_init(|| requested.clone());
    if *active != requested {
        return format!(
            "api already configured with `{}`; refusing to switch to `{}`",
            active.api_url, requested.api_url
        );
    }
    String::new()
}

/// Field-level validation messages. Empty string means the field passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialErrors {
    pub username_error: String,
    pub password_error: String,
}

/// Result of a sign-in or sign-up attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub ok: bool,
    /// Message for the username field slot.
    pub username_error: String,
    /// Message for the password field slot.
    pub password_error: String,
    /// Whether the failure came from the API rather than local validation.
    pub remote_failure: bool,
}

/// Session as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub signed_in: bool,
    pub username: Option<String>,
}

/// One row of the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListItem {
    pub id: String,
    pub title: String,
    /// Whether the expander of this row is open.
    pub open: bool,
}

/// List screen envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListsResponse {
    pub ok: bool,
    pub items: Vec<TodoListItem>,
    pub message: String,
}

/// One visible task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: String,
    pub content: String,
    pub done: bool,
}

/// Task panel envelope for the open list.
#[derive(Debug, Clone, PartialEq)]
pub struct TodosResponse {
    pub ok: bool,
    /// Open list id, `None` when every list is collapsed.
    pub list_id: Option<String>,
    /// Tasks accepted by the active filter.
    pub items: Vec<TodoItem>,
    /// `all|done|undone`.
    pub filter: String,
    pub done_count: u32,
    pub total_count: u32,
    /// Percentage of done tasks in `[0, 100]`.
    pub progress: f64,
    /// Ids whose update failed in a bulk toggle.
    pub failed_ids: Vec<String>,
    /// Set when a task was created and the input field should be emptied.
    pub clear_input: bool,
    pub message: String,
}

/// Validates credentials without any request.
#[flutter_rust_bridge::frb(sync)]
pub fn validate_credentials(username: String, password: String) -> CredentialErrors {
    let errors = validate(&username, &password);
    CredentialErrors {
        username_error: errors.username_error,
        password_error: errors.password_error,
    }
}

/// Signs in and stores the session on success.
///
/// # FFI contract
/// - Async from Dart; blocks one FRB worker thread while the request runs.
/// - Never panics.
pub fn sign_in(username: String, password: String) -> AuthResponse {
    let result = with_app(|app, runtime| runtime.block_on(app.sign_in(&username, &password)));
    to_auth_response(result)
}

/// Registers and stores the session on success.
///
/// # FFI contract
/// - Async from Dart; blocks one FRB worker thread while the request runs.
/// - Never panics.
pub fn sign_up(username: String, password: String) -> AuthResponse {
    let result = with_app(|app, runtime| runtime.block_on(app.sign_up(&username, &password)));
    to_auth_response(result)
}

/// Clears session, lists and tasks.
///
/// # FFI contract
/// - Async from Dart; waits for any in-flight call to finish first.
pub fn sign_out() -> SessionStatus {
    match with_app(|app, _| {
        app.sign_out();
        session_status_of(app)
    }) {
        Ok(status) => status,
        Err(_) => signed_out_status(),
    }
}

/// Session as of the last completed call.
///
/// # FFI contract
/// - Sync call, non-blocking; never waits on an in-flight request.
#[flutter_rust_bridge::frb(sync)]
pub fn session_status() -> SessionStatus {
    read_view().session
}

/// Reloads the signed-in user's lists.
pub fn load_todo_lists() -> ListsResponse {
    lists_call(|app, runtime| {
        runtime
            .block_on(app.load_lists())
            .map(|_| "Lists loaded.".to_string())
    })
}

/// Creates a list; blank titles are ignored.
pub fn create_todo_list(title: String) -> ListsResponse {
    lists_call(|app, runtime| {
        runtime
            .block_on(app.create_list(&title))
            .map(|created| match created {
                Some(_) => "List created.".to_string(),
                None => "Empty title ignored.".to_string(),
            })
    })
}

pub fn delete_todo_list(id: String) -> ListsResponse {
    lists_call(|app, runtime| {
        runtime
            .block_on(app.delete_list(&id))
            .map(|()| "List deleted.".to_string())
    })
}

/// Opens or closes list `id`; opening loads its tasks.
pub fn toggle_todo_list(id: String) -> TodosResponse {
    todos_call(|app, runtime| {
        runtime
            .block_on(app.toggle_list(&id))
            .map(|open| match open {
                Some(_) => TodosOutcome::message("Tasks loaded."),
                None => TodosOutcome::message("List closed."),
            })
    })
}

/// Reloads the tasks of the open list.
pub fn load_todos() -> TodosResponse {
    todos_call(|app, runtime| {
        runtime
            .block_on(app.load_tasks())
            .map(|_| TodosOutcome::message("Tasks loaded."))
    })
}

/// Creates a task in the open list; blank content is ignored.
pub fn create_todo(content: String) -> TodosResponse {
    todos_call(|app, runtime| {
        let mut input = content;
        runtime
            .block_on(app.create_task(&mut input))
            .map(|created| match created {
                Some(_) => TodosOutcome {
                    message: "Task created.".to_string(),
                    clear_input: true,
                },
                None => TodosOutcome::message("Empty task ignored."),
            })
    })
}

pub fn delete_todo(id: String) -> TodosResponse {
    todos_call(|app, runtime| {
        runtime
            .block_on(app.delete_task(&id))
            .map(|()| TodosOutcome::message("Task deleted."))
    })
}

/// Flips `done` of one task.
pub fn toggle_todo(id: String) -> TodosResponse {
    todos_call(|app, runtime| {
        runtime
            .block_on(app.toggle_task(&id))
            .map(|()| TodosOutcome::message("Task updated."))
    })
}

/// Sets `done` on every task of the open list.
///
/// Partial failures return `ok = false` with `failed_ids` filled; the
/// confirmed updates are already applied.
pub fn toggle_all_todos(done: bool) -> TodosResponse {
    todos_call(|app, runtime| {
        runtime
            .block_on(app.toggle_all_tasks(done))
            .map(|updated| TodosOutcome::message(format!("{updated} task(s) updated.")))
    })
}

/// Selects `all|done|undone`.
///
/// # FFI contract
/// - Async from Dart; waits for any in-flight call to finish first.
/// - Unknown names fail without touching the app.
pub fn set_todo_filter(filter: String) -> TodosResponse {
    let Some(parsed) = TaskFilter::parse(&filter) else {
        let mut response = read_view().todos;
        response.ok = false;
        response.message = format!("unknown filter `{filter}`; expected all, done or undone");
        return response;
    };
    todos_call(|app, _| {
        app.set_task_filter(parsed);
        Ok(TodosOutcome::message("Filter applied."))
    })
}

/// Task panel as of the last completed call, without any request.
///
/// # FFI contract
/// - Sync call, non-blocking; never waits on an in-flight request.
#[flutter_rust_bridge::frb(sync)]
pub fn todos_snapshot() -> TodosResponse {
    read_view().todos
}

struct TodosOutcome {
    message: String,
    clear_input: bool,
}

impl TodosOutcome {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            clear_input: false,
        }
    }
}

fn build_config(api_url: &str, timeout_ms: Option<u64>) -> Result<ClientConfig, String> {
    let config = ClientConfig::new(api_url).map_err(|err| err.to_string())?;
    match timeout_ms {
        Some(ms) => config
            .with_timeout(Duration::from_millis(ms))
            .map_err(|err| err.to_string()),
        None => Ok(config),
    }
}

fn with_app<T>(
    f: impl FnOnce(&mut TodoApp<GraphQlClient>, &Runtime) -> T,
) -> Result<T, String> {
    let runtime = RUNTIME
        .get_or_try_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
        })
        .map_err(|err| format!("runtime init failed: {err}"))?;
    let mut guard = app()?.lock().unwrap_or_else(PoisonError::into_inner);
    let result = f(&mut guard, runtime);
    publish_view(&guard);
    Ok(result)
}

fn app() -> Result<&'static Mutex<TodoApp<GraphQlClient>>, String> {
    APP.get_or_try_init(|| -> Result<_, String> {
        let config = API_CONFIG
            .get_or_try_init(ClientConfig::from_env)
            .map_err(|err| format!("api config invalid: {err}"))?
            .clone();
        let client = GraphQlClient::new(config)
            .map_err(|err| format!("api client init failed: {err}"))?;
        Ok(Mutex::new(TodoApp::new(client)))
    })
}

fn publish_view(app: &TodoApp<GraphQlClient>) {
    let view = View {
        session: session_status_of(app),
        todos: todos_snapshot_of(app),
    };
    *VIEW.write().unwrap_or_else(PoisonError::into_inner) = view;
}

fn read_view() -> View {
    VIEW.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn to_auth_response(result: Result<Result<(), AuthError>, String>) -> AuthResponse {
    match result {
        Ok(Ok(())) => AuthResponse {
            ok: true,
            username_error: String::new(),
            password_error: String::new(),
            remote_failure: false,
        },
        Ok(Err(err)) => {
            let errors = err.field_errors();
            AuthResponse {
                ok: false,
                username_error: errors.username_error,
                password_error: errors.password_error,
                remote_failure: matches!(err, AuthError::Remote(_)),
            }
        }
        Err(message) => AuthResponse {
            ok: false,
            username_error: message.clone(),
            password_error: message,
            remote_failure: true,
        },
    }
}

fn session_status_of(app: &TodoApp<GraphQlClient>) -> SessionStatus {
    SessionStatus {
        signed_in: app.session().is_signed_in(),
        username: app.session().username().map(str::to_string),
    }
}

fn signed_out_status() -> SessionStatus {
    SessionStatus {
        signed_in: false,
        username: None,
    }
}

fn lists_call(
    f: impl FnOnce(&mut TodoApp<GraphQlClient>, &Runtime) -> Result<String, StoreError>,
) -> ListsResponse {
    let result = with_app(|app, runtime| {
        let outcome = f(app, runtime);
        (outcome, list_items(app))
    });
    match result {
        Ok((Ok(message), items)) => ListsResponse {
            ok: true,
            items,
            message,
        },
        Ok((Err(err), items)) => {
            warn!("event=ffi_lists module=ffi status=error error={err}");
            ListsResponse {
                ok: false,
                items,
                message: err.message(),
            }
        }
        Err(message) => ListsResponse {
            ok: false,
            items: Vec::new(),
            message,
        },
    }
}

fn list_items(app: &TodoApp<GraphQlClient>) -> Vec<TodoListItem> {
    app.lists()
        .lists()
        .iter()
        .map(|list| TodoListItem {
            id: list.id.clone(),
            title: list.title.clone(),
            open: app.lists().is_open(&list.id),
        })
        .collect()
}

fn todos_call(
    f: impl FnOnce(&mut TodoApp<GraphQlClient>, &Runtime) -> Result<TodosOutcome, StoreError>,
) -> TodosResponse {
    let result = with_app(|app, runtime| {
        let outcome = f(app, runtime);
        let mut response = todos_snapshot_of(app);
        match outcome {
            Ok(outcome) => {
                response.message = outcome.message;
                response.clear_input = outcome.clear_input;
            }
            Err(err) => {
                warn!("event=ffi_todos module=ffi status=error error={err}");
                response.ok = false;
                response.message = err.message();
                if let StoreError::ToggleAll(failure) = err {
                    response.failed_ids = failure.failed;
                }
            }
        }
        response
    });

    result.unwrap_or_else(|message| empty_todos(false, message))
}

fn empty_todos(ok: bool, message: String) -> TodosResponse {
    TodosResponse {
        ok,
        list_id: None,
        items: Vec::new(),
        filter: TaskFilter::All.as_str().to_string(),
        done_count: 0,
        total_count: 0,
        progress: 0.0,
        failed_ids: Vec::new(),
        clear_input: false,
        message,
    }
}

fn todos_snapshot_of(app: &TodoApp<GraphQlClient>) -> TodosResponse {
    let tasks = app.tasks();
    TodosResponse {
        ok: true,
        list_id: tasks.list_id().cloned(),
        items: tasks
            .visible()
            .into_iter()
            .map(|todo| TodoItem {
                id: todo.id.clone(),
                content: todo.content.clone(),
                done: todo.done,
            })
            .collect(),
        filter: tasks.filter().as_str().to_string(),
        done_count: tasks.count_done() as u32,
        total_count: tasks.todos().len() as u32,
        progress: tasks.progress(),
        failed_ids: Vec::new(),
        clear_input: false,
        message: String::new(),
    }
}
