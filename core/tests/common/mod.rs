// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - In-memory queue and backend doubles
//! - Test data factories (fixtures)
//! - Temporary directory management with auto-cleanup

mod doubles;
mod fixtures;
mod temp_dir;

#[allow(unused_imports)]
pub use doubles::{MemoryQueue, RecordingBackend, TableBackend};
#[allow(unused_imports)]
pub use fixtures::{TestConfigBuilder, batch, delete_row, patch_todo, put_list, put_todo};
#[allow(unused_imports)]
pub use temp_dir::setup_temp_dirs;
