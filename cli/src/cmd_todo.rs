// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use todosync_core::{TodoApp, TodoDraft};

use crate::arg::{CommonArgs, IdArgs, OutputFormat, short_id};
use crate::todo_formatter::TodoFormatter;

#[derive(Debug, Clone)]
pub struct CmdTodoList {
    pub list: String,
    pub output_format: OutputFormat,
}

impl CmdTodoList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List the items of a list")
            .arg(arg!(list: <LIST> "The id of the list, or a unique prefix of it"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            list: get_list(matches),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, app: &mut TodoApp) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing todos...");
        let todos = app.todos(&self.list).await?;
        let formatter = TodoFormatter::new(self.output_format);
        print!("{}", formatter.format(&todos));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdTodoNew {
    pub list: String,
    pub description: String,
    pub output_format: OutputFormat,
}

impl CmdTodoNew {
    pub const NAME: &str = "new";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("add")
            .about("Add a new item to a list")
            .arg(arg!(list: <LIST> "The id of the list, or a unique prefix of it"))
            .arg(arg!(description: <DESCRIPTION> "What needs to be done"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            list: get_list(matches),
            description: matches
                .get_one::<String>("description")
                .expect("description is required")
                .clone(),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, app: &mut TodoApp) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "adding todo...");
        let draft = TodoDraft {
            list_id: self.list,
            description: self.description,
        };
        let todo = app.new_todo(draft).await?;
        let formatter = TodoFormatter::new(self.output_format);
        print!("{}", formatter.format(&[todo]));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdTodoDone {
    pub ids: Vec<String>,
    pub output_format: OutputFormat,
}

impl CmdTodoDone {
    pub const NAME: &str = "done";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Mark items as completed")
            .arg(IdArgs::TODO.ids())
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            ids: IdArgs::get_ids(matches),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, app: &mut TodoApp) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "marking todos as done...");
        set_completed(app, &self.ids, true, self.output_format).await
    }
}

#[derive(Debug, Clone)]
pub struct CmdTodoUndo {
    pub ids: Vec<String>,
    pub output_format: OutputFormat,
}

impl CmdTodoUndo {
    pub const NAME: &str = "undo";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Mark items as not completed")
            .arg(IdArgs::TODO.ids())
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            ids: IdArgs::get_ids(matches),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, app: &mut TodoApp) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "marking todos as undone...");
        set_completed(app, &self.ids, false, self.output_format).await
    }
}

#[derive(Debug, Clone)]
pub struct CmdTodoRemove {
    pub ids: Vec<String>,
}

impl CmdTodoRemove {
    pub const NAME: &str = "remove";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("rm")
            .about("Delete items")
            .arg(IdArgs::TODO.ids())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            ids: IdArgs::get_ids(matches),
        }
    }

    pub async fn run(self, app: &mut TodoApp) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "removing todos...");
        for id in &self.ids {
            let id = app.resolve_todo_id(id).await?;
            app.remove_todo(&id).await?;
            println!("Removed todo {}", short_id(&id));
        }
        Ok(())
    }
}

async fn set_completed(
    app: &TodoApp,
    ids: &[String],
    completed: bool,
    output_format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let mut todos = Vec::with_capacity(ids.len());
    for id in ids {
        todos.push(app.set_todo_completed(id, completed).await?);
    }
    let formatter = TodoFormatter::new(output_format);
    print!("{}", formatter.format(&todos));
    Ok(())
}

fn get_list(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("list")
        .expect("list is required")
        .clone()
}
