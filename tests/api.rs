use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use task_tracker::{
    app_state::AppState,
    data_access::{data_context::DataContext, local_file_store::LocalFileStore},
    map_routes,
    services::task_service::TaskService,
};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalFileStore::new(dir.path().join("tasks.json")));
        let state = Arc::new(AppState {
            task_service: TaskService::new(DataContext::with_store(store)),
        });
        Self { router: map_routes(state), dir }
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn create(&self, body: Value) -> Value {
        let (status, task) = self.call(Method::POST, "/tasks", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {task}");
        task
    }
}

#[tokio::test]
async fn welcome_and_about() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "To-Do Task Tracker API");

    let (status, body) = app.call(Method::GET, "/about", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "This is the about page.");
    assert_eq!(body["backend"], "local-file");
}

#[tokio::test]
async fn create_then_fetch() {
    let app = TestApp::new();
    let created = app
        .create(json!({
            "task_name": "Fix login",
            "due_date": "2020-01-01",
            "priority": "High",
            "assignee": "Jeeva"
        }))
        .await;
    assert_eq!(created["task_id"], 1);
    assert_eq!(created["status"], "Not Started");
    assert_eq!(created["past_due"], true);
    assert_eq!(created["comments"], json!([]));

    let (status, fetched) = app.call(Method::GET, "/tasks/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, all) = app.call(Method::GET, "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert!(app.dir.path().join("tasks.json").exists());
}

#[tokio::test]
async fn done_clears_past_due_and_leaves_active_list() {
    let app = TestApp::new();
    app.create(json!({ "task_name": "Fix login", "due_date": "2020-01-01" })).await;
    app.create(json!({ "task_name": "Write docs" })).await;

    let (status, done) = app
        .call(Method::PATCH, "/tasks/1/status", Some(json!({ "status": "Done" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "Done");
    assert_eq!(done["past_due"], false);

    let (_, active) = app.call(Method::GET, "/tasks/active", None).await;
    let names: Vec<&str> = active
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["task_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Write docs"]);
}

#[tokio::test]
async fn comments_and_links() {
    let app = TestApp::new();
    app.create(json!({ "task_name": "Review" })).await;

    app.call(Method::PATCH, "/tasks/1/comment", Some(json!({ "comment": "first" }))).await;
    let (status, task) = app
        .call(Method::PATCH, "/tasks/1/comment", Some(json!({ "text": "x" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["comments"], json!(["first", "x"]));

    let (status, task) = app
        .call(Method::PATCH, "/tasks/1/link", Some(json!({ "url": "https://example.com/pr/1" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["link"], "https://example.com/pr/1");
    assert_eq!(task["comments"], json!(["first", "x"]));
}

#[tokio::test]
async fn put_updates_only_given_fields() {
    let app = TestApp::new();
    app.create(json!({ "task_name": "Draft", "description": "keep" })).await;

    let (status, task) = app
        .call(Method::PUT, "/tasks/1", Some(json!({ "task_name": "Final", "effort_level": "Large" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["task_name"], "Final");
    assert_eq!(task["effort_level"], "Large");
    assert_eq!(task["description"], "keep");
}

#[tokio::test]
async fn put_null_clears_optional_fields() {
    let app = TestApp::new();
    let created = app
        .create(json!({ "task_name": "Typo", "due_date": "2020-01-01", "link": "https://example.com/x" }))
        .await;
    assert_eq!(created["past_due"], true);

    let (status, task) = app
        .call(Method::PUT, "/tasks/1", Some(json!({ "due_date": null, "link": null })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["due_date"], Value::Null);
    assert_eq!(task["link"], Value::Null);
    assert_eq!(task["past_due"], false);
    assert_eq!(task["task_name"], "Typo");

    let (_, fetched) = app.call(Method::GET, "/tasks/1", None).await;
    assert_eq!(fetched["past_due"], false);
}

#[tokio::test]
async fn unknown_task_is_404_everywhere() {
    let app = TestApp::new();
    let cases = [
        (Method::GET, "/tasks/99", None),
        (Method::PUT, "/tasks/99", Some(json!({ "task_name": "x" }))),
        (Method::PATCH, "/tasks/99/status", Some(json!({ "status": "Done" }))),
        (Method::PATCH, "/tasks/99/comment", Some(json!({ "comment": "x" }))),
        (Method::PATCH, "/tasks/99/link", Some(json!({ "url": "https://example.com" }))),
    ];
    for (method, uri, body) in cases {
        let (status, _) = app.call(method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
    }
}

#[tokio::test]
async fn invalid_payloads_are_client_errors() {
    let app = TestApp::new();

    let (status, body) = app
        .call(Method::POST, "/tasks", Some(json!({ "task_name": " ", "due_date": "2020-02-30" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let message = body.as_str().unwrap();
    assert!(message.contains("task_name"));
    assert!(message.contains("due_date"));

    app.create(json!({ "task_name": "ok" })).await;
    let (status, _) = app
        .call(Method::PATCH, "/tasks/1/link", Some(json!({ "url": "not a url" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.call(Method::GET, "/tasks/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn corrupted_store_is_a_server_error() {
    let app = TestApp::new();
    std::fs::write(app.dir.path().join("tasks.json"), "not json").unwrap();
    let (status, _) = app.call(Method::GET, "/tasks", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
