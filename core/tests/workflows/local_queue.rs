// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The queue written by local edits, read back as batches.

use jiff::Timestamp;
use serde_json::json;
use todosync_core::{
    ListDraft, ListRecord, LocalDb, MutationKind, Todo, TodoDraft, TodoList, TodoRecord,
};

async fn db_with_list(name: &str) -> (LocalDb, ListRecord) {
    let db = LocalDb::open(None).await.unwrap();
    let draft = ListDraft {
        name: name.to_string(),
    };
    let list = ListRecord::new(&draft, Some("u1".to_string()), &Timestamp::now());
    db.lists.insert(&list).await.unwrap();
    (db, list)
}

fn todo_draft(list: &ListRecord, description: &str) -> TodoDraft {
    TodoDraft {
        list_id: list.id().into_owned(),
        description: description.to_string(),
    }
}

#[tokio::test]
async fn each_write_is_its_own_batch() {
    let (db, list) = db_with_list("Groceries").await;
    let todo = TodoRecord::new(&todo_draft(&list, "Milk"), None, &Timestamp::now());
    db.todos.insert(&todo).await.unwrap();

    assert_eq!(db.queue.pending_count().await.unwrap(), 2);

    let first = db.queue.next_batch().await.unwrap().unwrap();
    assert_eq!(first.len(), 1);
    let put = &first.mutations[0];
    assert_eq!(put.kind, MutationKind::Put);
    assert_eq!(put.table, "lists");
    assert_eq!(put.row_id, list.id());
    let payload = put.payload.as_ref().unwrap();
    assert_eq!(payload["name"], json!("Groceries"));
    assert_eq!(payload["owner_id"], json!("u1"));
    assert!(!payload.contains_key("id"));

    // stays pending until completed
    assert_eq!(db.queue.next_batch().await.unwrap(), Some(first.clone()));

    db.queue.complete(&first).await.unwrap();
    let second = db.queue.next_batch().await.unwrap().unwrap();
    assert!(second.tx_id > first.tx_id);
    assert_eq!(second.mutations[0].table, "todos");
    assert_eq!(second.mutations[0].payload.as_ref().unwrap()["completed"], json!(false));

    db.queue.complete(&second).await.unwrap();
    assert_eq!(db.queue.next_batch().await.unwrap(), None);
}

#[tokio::test]
async fn completing_records_a_patch_of_the_completion_columns() {
    let (db, list) = db_with_list("Work").await;
    let todo = TodoRecord::new(&todo_draft(&list, "Report"), None, &Timestamp::now());
    db.todos.insert(&todo).await.unwrap();
    for _ in 0..2 {
        let batch = db.queue.next_batch().await.unwrap().unwrap();
        db.queue.complete(&batch).await.unwrap();
    }

    let id = todo.id().into_owned();
    let done = db
        .todos
        .set_completed(&id, true, Some("u2"), &Timestamp::now())
        .await
        .unwrap()
        .unwrap();
    assert!(done.completed());
    assert_eq!(done.completed_by().as_deref(), Some("u2"));

    let batch = db.queue.next_batch().await.unwrap().unwrap();
    let patch = &batch.mutations[0];
    assert_eq!(patch.kind, MutationKind::Patch);
    let payload = patch.payload.as_ref().unwrap();
    assert_eq!(payload.len(), 3);
    assert_eq!(payload["completed"], json!(true));
    assert_eq!(payload["completed_by"], json!("u2"));

    let missing = db
        .todos
        .set_completed("missing", true, None, &Timestamp::now())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn deleting_a_list_queues_its_items_first_in_one_batch() {
    let (db, list) = db_with_list("Trip").await;
    for description in ["Passport", "Tickets"] {
        let todo = TodoRecord::new(&todo_draft(&list, description), None, &Timestamp::now());
        db.todos.insert(&todo).await.unwrap();
    }
    for _ in 0..3 {
        let batch = db.queue.next_batch().await.unwrap().unwrap();
        db.queue.complete(&batch).await.unwrap();
    }

    assert!(db.lists.delete(&list.id()).await.unwrap());
    assert!(!db.lists.delete(&list.id()).await.unwrap());
    assert!(db.todos.list(&list.id()).await.unwrap().is_empty());

    let batch = db.queue.next_batch().await.unwrap().unwrap();
    let kinds: Vec<_> = batch.mutations.iter().map(|m| (m.kind, m.table.as_str())).collect();
    assert_eq!(
        kinds,
        vec![
            (MutationKind::Delete, "todos"),
            (MutationKind::Delete, "todos"),
            (MutationKind::Delete, "lists"),
        ]
    );
}

#[tokio::test]
async fn list_counts_follow_items() {
    let (db, list) = db_with_list("Home").await;
    let mut ids = Vec::new();
    for description in ["Dishes", "Laundry", "Plants"] {
        let todo = TodoRecord::new(&todo_draft(&list, description), None, &Timestamp::now());
        db.todos.insert(&todo).await.unwrap();
        ids.push(todo.id().into_owned());
    }
    db.todos
        .set_completed(&ids[0], true, None, &Timestamp::now())
        .await
        .unwrap();

    let lists = db.lists.list().await.unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].total(), 3);
    assert_eq!(lists[0].done(), 1);

    let todos = db.todos.list(&list.id()).await.unwrap();
    let descriptions: Vec<_> = todos.iter().map(|t| t.description()).collect();
    assert_eq!(descriptions, vec!["Dishes", "Laundry", "Plants"]);
}
