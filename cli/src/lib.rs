// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod arg;
mod cli;
mod cmd_list;
mod cmd_sync;
mod cmd_todo;
mod config;
mod list_formatter;
mod table;
mod todo_formatter;

pub use crate::cli::{Cli, Commands, run};
pub use crate::config::parse_config;
