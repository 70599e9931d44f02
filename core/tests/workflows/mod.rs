// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end workflow tests for the todosync-core crate.
//!
//! These tests go through the local database and its queue, and upload
//! against a mock backend speaking the REST protocol.

mod local_queue;
mod offline_edits;
mod rest_upload;
