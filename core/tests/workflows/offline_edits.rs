// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Editing without a backend: everything lands locally and in the queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use todosync_core::{
    ListDraft, Listeners, SyncEventKind, Todo, TodoApp, TodoDraft, TodoList,
};

use crate::common::{TestConfigBuilder, setup_temp_dirs};

#[tokio::test]
async fn edits_are_stored_and_queued_offline() {
    let dirs = setup_temp_dirs().await.unwrap();
    let config = TestConfigBuilder::new(&dirs.state_dir).user("u1").build();
    let mut app = TodoApp::new(config).await.unwrap();
    assert!(!app.is_connected());

    let list = app
        .new_list(ListDraft {
            name: "Groceries".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(list.owner_id().as_deref(), Some("u1"));
    assert_eq!(list.total(), 0);

    let milk = app
        .new_todo(TodoDraft {
            list_id: list.id().into_owned(),
            description: "Milk".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(milk.created_by().as_deref(), Some("u1"));

    let milk = app.toggle_todo(&milk.id()).await.unwrap();
    assert!(milk.completed());
    assert_eq!(milk.completed_by().as_deref(), Some("u1"));
    assert!(milk.completed_at().is_some());

    let milk = app.toggle_todo(&milk.id()).await.unwrap();
    assert!(!milk.completed());
    assert!(milk.completed_at().is_none());

    let lists = app.lists().await.unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].total(), 1);

    // list, item, two toggles
    assert_eq!(app.pending_uploads().await.unwrap(), 4);
    assert!(app.upload().await.is_err());

    app.close().await.unwrap();
}

#[tokio::test]
async fn data_survives_reopening() {
    let dirs = setup_temp_dirs().await.unwrap();
    let config = TestConfigBuilder::new(&dirs.state_dir).build();

    let app = TodoApp::new(config.clone()).await.unwrap();
    let list = app
        .new_list(ListDraft {
            name: "Inbox".to_string(),
        })
        .await
        .unwrap();
    app.close().await.unwrap();

    let app = TodoApp::new(config).await.unwrap();
    let lists = app.lists().await.unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].id(), list.id());
    assert_eq!(app.pending_uploads().await.unwrap(), 1);
    app.close().await.unwrap();
}

#[tokio::test]
async fn ids_resolve_by_unique_prefix() {
    let dirs = setup_temp_dirs().await.unwrap();
    let config = TestConfigBuilder::new(&dirs.state_dir).build();
    let app = TodoApp::new(config).await.unwrap();

    let list = app
        .new_list(ListDraft {
            name: "Work".to_string(),
        })
        .await
        .unwrap();
    let id = list.id().into_owned();

    assert_eq!(app.resolve_list_id(&id[..8]).await.unwrap(), id);
    assert_eq!(app.resolve_list_id(&id).await.unwrap(), id);
    assert!(app.resolve_list_id("not-an-id").await.is_err());
    assert!(app.resolve_todo_id(&id[..8]).await.is_err());

    let todo = app
        .new_todo(TodoDraft {
            list_id: id[..8].to_string(),
            description: "Plan".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(todo.list_id(), id);

    app.remove_list(&id[..8]).await.unwrap();
    assert!(app.lists().await.unwrap().is_empty());
    assert!(app.toggle_todo(&todo.id()).await.is_err());
    app.close().await.unwrap();
}

#[tokio::test]
async fn invalid_drafts_are_rejected() {
    let dirs = setup_temp_dirs().await.unwrap();
    let config = TestConfigBuilder::new(&dirs.state_dir).build();
    let app = TodoApp::new(config).await.unwrap();

    let blank = ListDraft {
        name: "   ".to_string(),
    };
    assert!(app.new_list(blank).await.is_err());

    let orphan = TodoDraft {
        list_id: "missing".to_string(),
        description: "Nowhere".to_string(),
    };
    assert!(app.new_todo(orphan).await.is_err());
    assert_eq!(app.pending_uploads().await.unwrap(), 0);
    app.close().await.unwrap();
}

#[tokio::test]
async fn subscribers_see_initialization() {
    let dirs = setup_temp_dirs().await.unwrap();
    let config = TestConfigBuilder::new(&dirs.state_dir).build();

    let listeners = Listeners::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    listeners.subscribe(SyncEventKind::Initialized, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let app = TodoApp::with_listeners(config, listeners).await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(app.listeners().count(SyncEventKind::Initialized), 1);
    app.close().await.unwrap();
}
