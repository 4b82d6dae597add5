use std::sync::Arc;
use todolist_core::api::memory::{Operation, UNAUTHORIZED_MESSAGE};
use todolist_core::{ApiError, InMemoryTodoApi, ListStore, StoreError, TodoApp, TodoList};

const TOKEN: &str = "tok1";

fn api_with_lists(titles: &[&str]) -> (Arc<InMemoryTodoApi>, Vec<TodoList>) {
    let api = Arc::new(InMemoryTodoApi::new().with_account("alice", "pw", TOKEN));
    let lists = titles
        .iter()
        .map(|title| api.seed_list("alice", title))
        .collect();
    (api, lists)
}

fn ids(lists: &[TodoList]) -> Vec<String> {
    lists.iter().map(|list| list.id.clone()).collect()
}

#[tokio::test]
async fn load_replaces_collection_with_owner_lists_only() {
    let (api, seeded) = api_with_lists(&["A", "B"]);
    api.seed_list("bob", "not mine");
    let mut store = ListStore::new(Arc::clone(&api));

    let loaded = store.load("alice", TOKEN).await.unwrap();

    assert_eq!(ids(loaded), ids(&seeded));
    assert!(loaded.iter().all(|list| list.owner == "alice"));
}

#[tokio::test]
async fn load_failure_keeps_stale_collection() {
    let (api, seeded) = api_with_lists(&["A"]);
    let mut store = ListStore::new(Arc::clone(&api));
    store.load("alice", TOKEN).await.unwrap();

    api.fail_next(Operation::TodoLists, "server down");
    let err = store.load("alice", TOKEN).await.unwrap_err();

    assert_eq!(err, StoreError::Api(ApiError::Graphql("server down".into())));
    assert_eq!(ids(store.lists()), ids(&seeded));
}

#[tokio::test]
async fn create_appends_in_order() {
    let (api, seeded) = api_with_lists(&["A", "B"]);
    let mut store = ListStore::new(Arc::clone(&api));
    store.load("alice", TOKEN).await.unwrap();

    let created = store
        .create("alice", "C", TOKEN)
        .await
        .unwrap()
        .expect("list should be created");

    let titles: Vec<&str> = store.lists().iter().map(|list| list.title.as_str()).collect();
    assert_eq!(titles, ["A", "B", "C"]);
    assert_eq!(store.lists()[..2], seeded[..]);
    assert_eq!(created.owner, "alice");
    assert!(!created.id.is_empty());
}

#[tokio::test]
async fn create_submits_trimmed_title() {
    let (api, _) = api_with_lists(&[]);
    let mut store = ListStore::new(Arc::clone(&api));

    let created = store
        .create("alice", "  Groceries \t", TOKEN)
        .await
        .unwrap()
        .expect("list should be created");

    assert_eq!(created.title, "Groceries");
    assert_eq!(api.stored_lists("alice")[0].title, "Groceries");
}

#[tokio::test]
async fn create_with_blank_title_is_noop() {
    let (api, _) = api_with_lists(&[]);
    let mut store = ListStore::new(Arc::clone(&api));

    let created = store.create("alice", "   ", TOKEN).await.unwrap();

    assert!(created.is_none());
    assert_eq!(api.calls(Operation::CreateTodoList), 0);
}

#[tokio::test]
async fn create_failure_leaves_collection_unchanged() {
    let (api, _) = api_with_lists(&["A"]);
    let mut store = ListStore::new(Arc::clone(&api));
    store.load("alice", TOKEN).await.unwrap();

    let err = store.create("alice", "B", "bad-token").await.unwrap_err();

    assert_eq!(err.message(), UNAUTHORIZED_MESSAGE);
    assert_eq!(store.lists().len(), 1);
}

#[tokio::test]
async fn delete_removes_by_id_and_closes_open_list() {
    let (api, seeded) = api_with_lists(&["A", "B", "C"]);
    let mut store = ListStore::new(Arc::clone(&api));
    store.load("alice", TOKEN).await.unwrap();
    store.toggle_open(&seeded[1].id);

    store.delete(&seeded[1].id, TOKEN).await.unwrap();

    assert_eq!(ids(store.lists()), vec![seeded[0].id.clone(), seeded[2].id.clone()]);
    assert!(store.open_list().is_none());
    assert_eq!(api.stored_lists("alice").len(), 2);
}

#[tokio::test]
async fn delete_failure_keeps_entry() {
    let (api, seeded) = api_with_lists(&["A"]);
    let mut store = ListStore::new(Arc::clone(&api));
    store.load("alice", TOKEN).await.unwrap();
    api.fail_next(Operation::DeleteTodoList, "nope");

    assert!(store.delete(&seeded[0].id, TOKEN).await.is_err());
    assert_eq!(store.lists().len(), 1);
}

#[tokio::test]
async fn app_toggle_list_opens_one_at_a_time_and_scopes_tasks() {
    let (api, seeded) = api_with_lists(&["A", "B"]);
    api.seed_todo(&seeded[0].id, "milk", false);
    api.seed_todo(&seeded[1].id, "bread", true);
    api.seed_todo(&seeded[1].id, "eggs", false);
    let mut app = TodoApp::with_shared_api(Arc::clone(&api));
    app.sign_in("alice", "pw").await.unwrap();
    app.load_lists().await.unwrap();

    let open = app.toggle_list(&seeded[0].id).await.unwrap();
    assert_eq!(open.as_ref(), Some(&seeded[0].id));
    assert_eq!(app.tasks().todos().len(), 1);

    let open = app.toggle_list(&seeded[1].id).await.unwrap();
    assert_eq!(open.as_ref(), Some(&seeded[1].id));
    assert!(!app.lists().is_open(&seeded[0].id));
    assert_eq!(app.tasks().todos().len(), 2);
    assert!(app.tasks().todos().iter().all(|todo| todo.list == seeded[1].id));

    let open = app.toggle_list(&seeded[1].id).await.unwrap();
    assert_eq!(open, None);
    assert!(app.tasks().todos().is_empty());
    assert_eq!(app.tasks().list_id(), None);
}

#[tokio::test]
async fn app_delete_of_open_list_drops_task_scope() {
    let (api, seeded) = api_with_lists(&["A"]);
    api.seed_todo(&seeded[0].id, "milk", false);
    let mut app = TodoApp::with_shared_api(Arc::clone(&api));
    app.sign_in("alice", "pw").await.unwrap();
    app.load_lists().await.unwrap();
    app.toggle_list(&seeded[0].id).await.unwrap();

    app.delete_list(&seeded[0].id).await.unwrap();

    assert!(app.lists().lists().is_empty());
    assert_eq!(app.tasks().list_id(), None);
    assert!(app.tasks().todos().is_empty());
}
