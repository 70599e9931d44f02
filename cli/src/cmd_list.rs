// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use todosync_core::{ListDraft, TodoApp};

use crate::arg::{CommonArgs, IdArgs, OutputFormat, short_id};
use crate::list_formatter::ListFormatter;

#[derive(Debug, Clone)]
pub struct CmdListList {
    pub output_format: OutputFormat,
}

impl CmdListList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List all lists with their progress")
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn new() -> Self {
        Self {
            output_format: OutputFormat::Table,
        }
    }

    pub async fn run(self, app: &mut TodoApp) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing lists...");
        let lists = app.lists().await?;
        let formatter = ListFormatter::new(self.output_format);
        print!("{}", formatter.format(&lists));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdListNew {
    pub name: String,
    pub output_format: OutputFormat,
}

impl CmdListNew {
    pub const NAME: &str = "new";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("add")
            .about("Create a new list")
            .arg(arg!(name: <NAME> "Name of the list"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            name: matches
                .get_one::<String>("name")
                .expect("name is required")
                .clone(),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, app: &mut TodoApp) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "creating list...");
        let list = app.new_list(ListDraft { name: self.name }).await?;
        let formatter = ListFormatter::new(self.output_format);
        print!("{}", formatter.format(&[list]));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdListRemove {
    pub ids: Vec<String>,
}

impl CmdListRemove {
    pub const NAME: &str = "remove";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("rm")
            .about("Delete lists together with their items")
            .arg(IdArgs::LIST.ids())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            ids: IdArgs::get_ids(matches),
        }
    }

    pub async fn run(self, app: &mut TodoApp) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "removing lists...");
        for id in &self.ids {
            let id = app.resolve_list_id(id).await?;
            app.remove_list(&id).await?;
            println!("Removed list {}", short_id(&id));
        }
        Ok(())
    }
}
