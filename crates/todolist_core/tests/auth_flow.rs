use std::sync::Arc;
use todolist_core::api::memory::{Operation, INVALID_CREDENTIALS_MESSAGE, USERNAME_TAKEN_MESSAGE};
use todolist_core::validation::{EMPTY_FIELD_MESSAGE, INVALID_USERNAME_MESSAGE};
use todolist_core::{
    ApiError, AuthError, AuthService, InMemoryTodoApi, Session, StoreError, TodoApp,
};

fn app_with_account() -> (Arc<InMemoryTodoApi>, TodoApp<InMemoryTodoApi>) {
    let api = Arc::new(InMemoryTodoApi::new().with_account("jean-paul", "abc_123", "tok1"));
    let app = TodoApp::with_shared_api(Arc::clone(&api));
    (api, app)
}

#[tokio::test]
async fn sign_in_sets_token_and_username() {
    let (api, mut app) = app_with_account();

    app.sign_in("jean-paul", "abc_123").await.unwrap();

    assert_eq!(app.session().token(), Some("tok1"));
    assert_eq!(app.session().username(), Some("jean-paul"));
    assert_eq!(api.calls(Operation::SignIn), 1);
}

#[tokio::test]
async fn sign_in_submits_and_stores_trimmed_username() {
    let (_api, mut app) = app_with_account();

    app.sign_in("  jean-paul ", " abc_123 ").await.unwrap();

    assert_eq!(app.session().username(), Some("jean-paul"));
}

#[tokio::test]
async fn sign_up_with_digits_is_rejected_without_request() {
    let api = Arc::new(InMemoryTodoApi::new());
    let mut app = TodoApp::with_shared_api(Arc::clone(&api));

    let err = app.sign_up("42", "abc_123").await.unwrap_err();

    match err {
        AuthError::Invalid(errors) => {
            assert_eq!(errors.username_error, INVALID_USERNAME_MESSAGE);
            assert_eq!(errors.password_error, "");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(api.total_calls(), 0);
    assert!(!app.session().is_signed_in());
}

#[tokio::test]
async fn empty_fields_report_empty_message_and_skip_request() {
    let api = Arc::new(InMemoryTodoApi::new());
    let service = AuthService::new(Arc::clone(&api));

    let err = service.sign_in("", "   ").await.unwrap_err();

    let errors = err.field_errors();
    assert_eq!(errors.username_error, EMPTY_FIELD_MESSAGE);
    assert_eq!(errors.password_error, EMPTY_FIELD_MESSAGE);
    assert_eq!(api.total_calls(), 0);
}

#[tokio::test]
async fn remote_failure_fills_both_field_slots_and_keeps_session_empty() {
    let (_api, mut app) = app_with_account();

    let err = app.sign_in("jean-paul", "wrong").await.unwrap_err();

    assert_eq!(
        err,
        AuthError::Remote(ApiError::Graphql(INVALID_CREDENTIALS_MESSAGE.to_string()))
    );
    let errors = err.field_errors();
    assert_eq!(errors.username_error, INVALID_CREDENTIALS_MESSAGE);
    assert_eq!(errors.password_error, INVALID_CREDENTIALS_MESSAGE);
    assert!(!app.session().is_signed_in());
}

#[tokio::test]
async fn remote_failure_is_not_retried() {
    let (api, mut app) = app_with_account();
    api.fail_next(Operation::SignIn, "boom");

    let err = app.sign_in("jean-paul", "abc_123").await.unwrap_err();

    assert_eq!(err.field_errors().username_error, "boom");
    assert_eq!(api.calls(Operation::SignIn), 1);
}

#[tokio::test]
async fn sign_up_registers_and_signs_in() {
    let api = Arc::new(InMemoryTodoApi::new());
    let mut app = TodoApp::with_shared_api(Arc::clone(&api));

    app.sign_up("marie-claire", "Secret!1").await.unwrap();
    assert_eq!(app.session().username(), Some("marie-claire"));
    assert!(app.session().token().is_some());

    let mut other = TodoApp::with_shared_api(Arc::clone(&api));
    let err = other.sign_up("marie-claire", "Secret!1").await.unwrap_err();
    assert_eq!(err.field_errors().password_error, USERNAME_TAKEN_MESSAGE);
}

#[tokio::test]
async fn sign_out_clears_session_and_blocks_store_calls() {
    let (api, mut app) = app_with_account();
    api.seed_list("jean-paul", "Groceries");
    app.sign_in("jean-paul", "abc_123").await.unwrap();
    app.load_lists().await.unwrap();
    assert_eq!(app.lists().lists().len(), 1);

    app.sign_out();

    assert!(!app.session().is_signed_in());
    assert!(app.lists().lists().is_empty());
    let err = app.load_lists().await.unwrap_err();
    assert_eq!(err, StoreError::NotSignedIn);
}

#[tokio::test]
async fn failed_authenticate_leaves_existing_session_untouched() {
    let api = Arc::new(InMemoryTodoApi::new().with_account("alice", "pw", "tok-a"));
    let service = AuthService::new(Arc::clone(&api));
    let mut session = Session::new();
    session.set("tok-a", "alice");

    let result = service
        .authenticate(
            todolist_core::AuthAction::SignIn,
            &mut session,
            "alice",
            "bad pw",
        )
        .await;

    assert!(matches!(result, Err(AuthError::Invalid(_))));
    assert_eq!(session.token(), Some("tok-a"));
}
