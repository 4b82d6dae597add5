use serde_json::json;
use todolist_core::api::documents;
use todolist_core::{ApiError, ClientConfig, GraphQlClient, TodoApi, UpdatedTodo};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> GraphQlClient {
    let config = ClientConfig::new(&format!("{}/graphql", server.uri())).unwrap();
    GraphQlClient::new(config).unwrap()
}

#[tokio::test]
async fn sign_in_posts_document_and_variables_without_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "query": documents::SIGN_IN,
            "variables": { "username": "jean-paul", "password": "abc_123" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "signIn": "tok1" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let token = client.sign_in("jean-paul", "abc_123").await.unwrap();

    assert_eq!(token, "tok1");
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn first_graphql_error_message_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "signUp": null },
            "errors": [
                { "message": "Username already taken", "path": ["signUp"] },
                { "message": "second error" }
            ]
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let err = client.sign_up("alice", "pw").await.unwrap_err();

    assert_eq!(err, ApiError::Graphql("Username already taken".to_string()));
    assert!(err.is_request_error());
}

#[tokio::test]
async fn errors_payload_is_read_even_on_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{ "message": "Syntax Error" }]
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let err = client.todo_lists("alice", "tok1").await.unwrap_err();

    assert_eq!(err.message(), "Syntax Error");
}

#[tokio::test]
async fn create_todo_list_sends_bearer_token_and_connect_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer tok1"))
        .and(body_partial_json(json!({
            "variables": {
                "input": [{
                    "owner": { "connect": { "where": { "username": "alice" } } },
                    "title": "Groceries"
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "createTodoLists": {
                    "todoLists": [{
                        "id": "list-1",
                        "owner": { "username": "alice" },
                        "title": "Groceries"
                    }]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let list = client
        .create_todo_list("alice", "Groceries", "tok1")
        .await
        .unwrap();

    assert_eq!(list.id, "list-1");
    assert_eq!(list.title, "Groceries");
    assert_eq!(list.owner, "alice");
}

#[tokio::test]
async fn todo_lists_fills_owner_from_filter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": { "where": { "owner": { "username": "alice" } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "todoLists": [
                { "id": "1", "title": "A" },
                { "id": "2", "title": "B" }
            ] }
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let lists = client.todo_lists("alice", "tok1").await.unwrap();

    let titles: Vec<&str> = lists.iter().map(|list| list.title.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);
    assert!(lists.iter().all(|list| list.owner == "alice"));
}

#[tokio::test]
async fn delete_todo_list_returns_nodes_deleted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "where": { "id": "list-9" } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "deleteTodoLists": { "nodesDeleted": 1 } }
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let deleted = client
        .delete_todo_list(&"list-9".to_string(), "tok1")
        .await
        .unwrap();

    assert_eq!(deleted, 1);
}

#[tokio::test]
async fn todos_are_scoped_to_requested_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": { "where": { "belongsTo": { "id": "list-1" } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "todos": [
                { "id": "t1", "content": "milk", "done": false },
                { "id": "t2", "content": "eggs", "done": true }
            ] }
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let todos = client.todos(&"list-1".to_string(), "tok1").await.unwrap();

    assert_eq!(todos.len(), 2);
    assert!(todos.iter().all(|todo| todo.list == "list-1"));
    assert!(todos[1].done);
}

#[tokio::test]
async fn update_todo_sends_done_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": { "where": { "id": "t1" }, "update": { "done": true } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "updateTodos": { "todos": [
                { "id": "t1", "content": "milk", "done": true }
            ] } }
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let updated = client
        .update_todo(&"t1".to_string(), true, "tok1")
        .await
        .unwrap();

    assert_eq!(
        updated,
        UpdatedTodo {
            id: "t1".to_string(),
            content: "milk".to_string(),
            done: true,
        }
    );
}

#[tokio::test]
async fn empty_update_result_is_missing_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "updateTodos": { "todos": [] } }
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let err = client
        .update_todo(&"gone".to_string(), true, "tok1")
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::MissingData("updateTodos.todos"));
}

#[tokio::test]
async fn non_json_body_is_decode_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let err = client.sign_in("alice", "pw").await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { status: 502, .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let config = ClientConfig::new("http://127.0.0.1:9/graphql").unwrap();
    let client = GraphQlClient::new(config).unwrap();

    let err = client.sign_in("alice", "pw").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
}
