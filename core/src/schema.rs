// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Declaration of the synced tables.

use std::fmt::Write;

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// UTF-8 text; ids and timestamps are stored as text too.
    Text,
    /// 64-bit integer; booleans are stored as 0/1.
    Integer,
}

impl ColumnType {
    fn sql_keyword(self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
        }
    }
}

/// A column of a synced table. The `id` column is implicit.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Column name.
    pub name: &'static str,
    /// Storage type.
    pub ty: ColumnType,
}

/// A secondary index.
#[derive(Debug, Clone, Copy)]
pub struct Index {
    /// Index name, unique per table.
    pub name: &'static str,
    /// Indexed columns.
    pub columns: &'static [&'static str],
}

/// A synced table.
#[derive(Debug, Clone, Copy)]
pub struct Table {
    /// Table name, identical locally and remotely.
    pub name: &'static str,
    /// Columns besides `id`.
    pub columns: &'static [Column],
    /// Secondary indexes.
    pub indexes: &'static [Index],
}

impl Table {
    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Statements creating the table and its indexes, if missing.
    pub fn create_sql(&self) -> Vec<String> {
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    id TEXT PRIMARY KEY NOT NULL",
            self.name
        );
        for column in self.columns {
            let _ = write!(sql, ",\n    {} {}", column.name, column.ty.sql_keyword());
        }
        sql += "\n);";

        let mut statements = vec![sql];
        for index in self.indexes {
            statements.push(format!(
                "CREATE INDEX IF NOT EXISTS {}_{} ON {} ({});",
                self.name,
                index.name,
                self.name,
                index.columns.join(", ")
            ));
        }
        statements
    }
}

/// The set of synced tables.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Tables, in creation order.
    pub tables: &'static [Table],
}

impl Schema {
    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Table of to-do lists.
pub const LISTS: Table = Table {
    name: "lists",
    columns: &[
        Column { name: "created_at", ty: ColumnType::Text },
        Column { name: "name", ty: ColumnType::Text },
        Column { name: "owner_id", ty: ColumnType::Text },
    ],
    indexes: &[],
};

/// Table of to-do items.
pub const TODOS: Table = Table {
    name: "todos",
    columns: &[
        Column { name: "list_id", ty: ColumnType::Text },
        Column { name: "created_at", ty: ColumnType::Text },
        Column { name: "completed_at", ty: ColumnType::Text },
        Column { name: "description", ty: ColumnType::Text },
        Column { name: "completed", ty: ColumnType::Integer },
        Column { name: "created_by", ty: ColumnType::Text },
        Column { name: "completed_by", ty: ColumnType::Text },
    ],
    indexes: &[Index {
        name: "list",
        columns: &["list_id"],
    }],
};

/// The application schema.
pub const SCHEMA: Schema = Schema {
    tables: &[LISTS, TODOS],
};
