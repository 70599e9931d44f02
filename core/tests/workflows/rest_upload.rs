// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Uploading local edits to a mock REST backend.

use serde_json::json;
use todosync_core::{DrainError, DrainSummary, ListDraft, TodoApp, TodoDraft, TodoList};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TestConfigBuilder, setup_temp_dirs};

async fn app_with_list(server: &MockServer, state_dir: &std::path::Path) -> (TodoApp, String) {
    let config = TestConfigBuilder::new(state_dir)
        .user("u1")
        .backend(&server.uri())
        .build();
    let app = TodoApp::new(config).await.unwrap();
    let list = app
        .new_list(ListDraft {
            name: "Groceries".to_string(),
        })
        .await
        .unwrap();
    let id = list.id().into_owned();
    (app, id)
}

async fn add_todo(app: &TodoApp, list_id: &str, description: &str) -> String {
    let todo = app
        .new_todo(TodoDraft {
            list_id: list_id.to_string(),
            description: description.to_string(),
        })
        .await
        .unwrap();
    todosync_core::Todo::id(&todo).into_owned()
}

#[tokio::test]
async fn upload_replays_edits_in_order() {
    let server = MockServer::start().await;
    let dirs = setup_temp_dirs().await.unwrap();
    let (mut app, list_id) = app_with_list(&server, &dirs.state_dir).await;
    let todo_id = add_todo(&app, &list_id, "Milk").await;
    app.toggle_todo(&todo_id).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/rest/v1/lists"))
        .and(body_partial_json(json!({"id": list_id, "name": "Groceries", "owner_id": "u1"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .and(body_partial_json(json!({"id": todo_id, "list_id": list_id, "completed": false})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/todos"))
        .and(query_param("id", format!("eq.{todo_id}")))
        .and(body_partial_json(json!({"completed": true, "completed_by": "u1"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let summary = app.upload().await.unwrap();
    assert_eq!(
        summary,
        DrainSummary {
            uploaded: 3,
            discarded: 0
        }
    );
    assert_eq!(app.pending_uploads().await.unwrap(), 0);

    let requests = server.received_requests().await.unwrap();
    let order: Vec<_> = requests
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("POST".to_string(), "/rest/v1/lists".to_string()),
            ("POST".to_string(), "/rest/v1/todos".to_string()),
            ("PATCH".to_string(), "/rest/v1/todos".to_string()),
        ]
    );
    app.close().await.unwrap();
}

#[tokio::test]
async fn constraint_violation_discards_the_batch() {
    let server = MockServer::start().await;
    let dirs = setup_temp_dirs().await.unwrap();
    let (mut app, list_id) = app_with_list(&server, &dirs.state_dir).await;
    add_todo(&app, &list_id, "Eggs").await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/lists"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"lists_pkey\"",
            "details": null,
            "hint": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let summary = app.upload().await.unwrap();
    assert_eq!(
        summary,
        DrainSummary {
            uploaded: 1,
            discarded: 1
        }
    );
    assert_eq!(app.pending_uploads().await.unwrap(), 0);
    app.close().await.unwrap();
}

#[tokio::test]
async fn unavailable_backend_keeps_the_queue() {
    let server = MockServer::start().await;
    let dirs = setup_temp_dirs().await.unwrap();
    let (mut app, list_id) = app_with_list(&server, &dirs.state_dir).await;
    add_todo(&app, &list_id, "Bread").await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = app.upload().await.unwrap_err();
    assert!(err.to_string().contains("HTTP503"), "{err}");
    assert_eq!(app.pending_uploads().await.unwrap(), 2);
    app.close().await.unwrap();
}

#[tokio::test]
async fn failed_upload_reports_batches_sent_before_the_fault() {
    let server = MockServer::start().await;
    let dirs = setup_temp_dirs().await.unwrap();
    let (mut app, list_id) = app_with_list(&server, &dirs.state_dir).await;
    add_todo(&app, &list_id, "Eggs").await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/lists"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = app.upload().await.unwrap_err();
    let drain = err.downcast_ref::<DrainError>().unwrap();
    assert_eq!(
        drain.summary,
        DrainSummary {
            uploaded: 1,
            discarded: 0
        }
    );
    assert_eq!(app.pending_uploads().await.unwrap(), 1);
    app.close().await.unwrap();
}

#[tokio::test]
async fn configured_code_is_discarded_instead_of_retried() {
    let server = MockServer::start().await;
    let dirs = setup_temp_dirs().await.unwrap();
    let config = TestConfigBuilder::new(&dirs.state_dir)
        .backend(&server.uri())
        .permanent_code("^PGRST204$")
        .build();
    let mut app = TodoApp::new(config).await.unwrap();
    app.new_list(ListDraft {
        name: "Inbox".to_string(),
    })
    .await
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/rest/v1/lists"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "PGRST204",
            "message": "Could not find the 'owner_id' column of 'lists' in the schema cache",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = app.upload().await.unwrap();
    assert_eq!(summary.discarded, 1);
    assert_eq!(app.pending_uploads().await.unwrap(), 0);
    app.close().await.unwrap();
}
