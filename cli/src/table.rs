// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use colored::{Color, Colorize};
use serde_json::{Map, Value};
use unicode_width::UnicodeWidthStr;

use crate::arg::OutputFormat;

pub trait TableColumn<T> {
    /// The key of the column in JSON output.
    fn name(&self) -> &'static str;

    fn format(&self, data: &T) -> String;

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }

    fn get_color(&self, _data: &T) -> Option<Color> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

pub struct Table<'a, T, C: TableColumn<T>> {
    format: OutputFormat,
    columns: &'a [C],
    data: &'a [T],
}

impl<'a, T, C: TableColumn<T>> Table<'a, T, C> {
    pub fn new(format: OutputFormat, columns: &'a [C], data: &'a [T]) -> Self {
        Self {
            format,
            columns,
            data,
        }
    }

    fn write_basic(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SEPARATOR: &str = " ";

        let table: Vec<Vec<String>> = self
            .data
            .iter()
            .map(|row| self.columns.iter().map(|col| col.format(row)).collect())
            .collect();
        let widths = column_max_width(self.columns.len(), &table);

        for (cells, row) in table.into_iter().zip(self.data) {
            let last = cells.len().saturating_sub(1);
            for (i, (col, cell)) in self.columns.iter().zip(cells).enumerate() {
                let width = widths.get(i).copied().unwrap_or(0);
                let cell = match col.padding_direction() {
                    // last column does not need padding if it's left-aligned
                    PaddingDirection::Left if i == last => cell,
                    PaddingDirection::Left => format!("{cell:<width$}"),
                    PaddingDirection::Right => format!("{cell:>width$}"),
                };
                match col.get_color(row) {
                    Some(color) => write!(f, "{}", cell.color(color))?,
                    None => write!(f, "{cell}")?,
                }
                if i < last {
                    write!(f, "{SEPARATOR}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_json(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<Value> = self
            .data
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .columns
                    .iter()
                    .map(|col| (col.name().to_string(), Value::String(col.format(row))))
                    .collect();
                Value::Object(obj)
            })
            .collect();

        let json = serde_json::to_string_pretty(&rows).map_err(|_| fmt::Error)?;
        writeln!(f, "{json}")
    }
}

impl<T, C: TableColumn<T>> fmt::Display for Table<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            OutputFormat::Table => self.write_basic(f),
            OutputFormat::Json => self.write_json(f),
        }
    }
}

fn column_max_width(columns: usize, table: &[Vec<String>]) -> Vec<usize> {
    let mut max_width = vec![0; columns];
    for row in table {
        for (max, cell) in max_width.iter_mut().zip(row) {
            *max = (*max).max(cell.width());
        }
    }
    max_width
}
