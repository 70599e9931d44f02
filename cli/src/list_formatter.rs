// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use colored::Color;
use todosync_core::TodoList;

use crate::arg::{OutputFormat, short_id};
use crate::table::{PaddingDirection, Table, TableColumn};

#[derive(Debug)]
pub struct ListFormatter {
    columns: Vec<ListColumn>,
    format: OutputFormat,
}

impl ListFormatter {
    pub fn new(format: OutputFormat) -> Self {
        let columns = match format {
            OutputFormat::Table => vec![ListColumn::Id, ListColumn::Progress, ListColumn::Name],
            OutputFormat::Json => vec![
                ListColumn::Uid,
                ListColumn::Name,
                ListColumn::Progress,
                ListColumn::CreatedAt,
            ],
        };
        Self { columns, format }
    }

    pub fn format<'a, L: TodoList>(&'a self, lists: &'a [L]) -> impl fmt::Display + 'a {
        Table::new(self.format, &self.columns, lists)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ListColumn {
    Id,
    Uid,
    Name,
    Progress,
    CreatedAt,
}

impl<L: TodoList> TableColumn<L> for ListColumn {
    fn name(&self) -> &'static str {
        match self {
            ListColumn::Id | ListColumn::Uid => "id",
            ListColumn::Name => "name",
            ListColumn::Progress => "progress",
            ListColumn::CreatedAt => "created_at",
        }
    }

    fn format(&self, list: &L) -> String {
        match self {
            ListColumn::Id => short_id(&list.id()).to_string(),
            ListColumn::Uid => list.id().to_string(),
            ListColumn::Name => list.name().to_string(),
            ListColumn::Progress => format!("{}/{}", list.done(), list.total()),
            ListColumn::CreatedAt => list.created_at().to_string(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            ListColumn::Progress => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn get_color(&self, list: &L) -> Option<Color> {
        match self {
            ListColumn::Progress if list.total() > 0 && list.done() == list.total() => {
                Some(Color::Green)
            }
            _ => None,
        }
    }
}
