// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use colored::Color;
use todosync_core::Todo;

use crate::arg::{OutputFormat, short_id};
use crate::table::{Table, TableColumn};

#[derive(Debug)]
pub struct TodoFormatter {
    columns: Vec<TodoColumn>,
    format: OutputFormat,
}

impl TodoFormatter {
    pub fn new(format: OutputFormat) -> Self {
        let columns = match format {
            OutputFormat::Table => vec![TodoColumn::Status, TodoColumn::Id, TodoColumn::Description],
            OutputFormat::Json => vec![
                TodoColumn::Uid,
                TodoColumn::ListId,
                TodoColumn::Status,
                TodoColumn::Description,
                TodoColumn::CreatedAt,
                TodoColumn::CompletedAt,
            ],
        };
        Self { columns, format }
    }

    pub fn format<'a, T: Todo>(&'a self, todos: &'a [T]) -> impl fmt::Display + 'a {
        Table::new(self.format, &self.columns, todos)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TodoColumn {
    Id,
    Uid,
    ListId,
    Status,
    Description,
    CreatedAt,
    CompletedAt,
}

impl<T: Todo> TableColumn<T> for TodoColumn {
    fn name(&self) -> &'static str {
        match self {
            TodoColumn::Id | TodoColumn::Uid => "id",
            TodoColumn::ListId => "list_id",
            TodoColumn::Status => "status",
            TodoColumn::Description => "description",
            TodoColumn::CreatedAt => "created_at",
            TodoColumn::CompletedAt => "completed_at",
        }
    }

    fn format(&self, todo: &T) -> String {
        match self {
            TodoColumn::Id => short_id(&todo.id()).to_string(),
            TodoColumn::Uid => todo.id().to_string(),
            TodoColumn::ListId => todo.list_id().to_string(),
            TodoColumn::Status => match todo.completed() {
                true => "[x]",
                false => "[ ]",
            }
            .to_string(),
            TodoColumn::Description => todo.description().to_string(),
            TodoColumn::CreatedAt => todo.created_at().to_string(),
            TodoColumn::CompletedAt => todo.completed_at().unwrap_or_default().to_string(),
        }
    }

    fn get_color(&self, todo: &T) -> Option<Color> {
        match self {
            TodoColumn::Status | TodoColumn::Description if todo.completed() => {
                Some(Color::BrightBlack)
            }
            _ => None,
        }
    }
}
