// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use futures::{FutureExt, future::BoxFuture};
use todosync_core::{APP_NAME, Listeners, SyncEvent, SyncEventKind, TodoApp};
use tracing_subscriber::EnvFilter;

use crate::cmd_list::{CmdListList, CmdListNew, CmdListRemove};
use crate::cmd_sync::{CmdStatus, CmdSync};
use crate::cmd_todo::{CmdTodoDone, CmdTodoList, CmdTodoNew, CmdTodoRemove, CmdTodoUndo};
use crate::config::parse_config;

/// Run the command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run().await {
                println!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    };
    Ok(())
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Offline-first to-do lists, uploaded when the backend is reachable.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(false) // allow default to the lists
            .arg_required_else_help(false)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $XDG_CONFIG_HOME/todosync/config.toml on Linux and MacOS, \
%LOCALAPPDATA%/todosync/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(
                Command::new("list")
                    .alias("l")
                    .about("Manage your lists")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdListList::command())
                    .subcommand(CmdListNew::command())
                    .subcommand(CmdListRemove::command()),
            )
            .subcommand(
                Command::new("todo")
                    .alias("t")
                    .about("Manage the items of a list")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdTodoList::command())
                    .subcommand(CmdTodoNew::command())
                    .subcommand(CmdTodoDone::command())
                    .subcommand(CmdTodoUndo::command())
                    .subcommand(CmdTodoRemove::command()),
            )
            .subcommand(CmdTodoDone::command())
            .subcommand(CmdTodoUndo::command())
            .subcommand(CmdSync::command())
            .subcommand(CmdStatus::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some(("list", matches)) => match matches.subcommand() {
                Some((CmdListList::NAME, matches)) => ListList(CmdListList::from(matches)),
                Some((CmdListNew::NAME, matches)) => ListNew(CmdListNew::from(matches)),
                Some((CmdListRemove::NAME, matches)) => ListRemove(CmdListRemove::from(matches)),
                _ => unreachable!(),
            },
            Some(("todo", matches)) => match matches.subcommand() {
                Some((CmdTodoList::NAME, matches)) => TodoList(CmdTodoList::from(matches)),
                Some((CmdTodoNew::NAME, matches)) => TodoNew(CmdTodoNew::from(matches)),
                Some((CmdTodoDone::NAME, matches)) => TodoDone(CmdTodoDone::from(matches)),
                Some((CmdTodoUndo::NAME, matches)) => TodoUndo(CmdTodoUndo::from(matches)),
                Some((CmdTodoRemove::NAME, matches)) => TodoRemove(CmdTodoRemove::from(matches)),
                _ => unreachable!(),
            },
            Some((CmdTodoDone::NAME, matches)) => TodoDone(CmdTodoDone::from(matches)),
            Some((CmdTodoUndo::NAME, matches)) => TodoUndo(CmdTodoUndo::from(matches)),
            Some((CmdSync::NAME, matches)) => Sync(CmdSync::from(matches)),
            Some((CmdStatus::NAME, _)) => Status(CmdStatus),
            None => ListList(CmdListList::new()),
            _ => unreachable!(),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// List all lists
    ListList(CmdListList),

    /// Create a list
    ListNew(CmdListNew),

    /// Delete lists
    ListRemove(CmdListRemove),

    /// List the items of a list
    TodoList(CmdTodoList),

    /// Add an item
    TodoNew(CmdTodoNew),

    /// Mark items as completed
    TodoDone(CmdTodoDone),

    /// Mark items as not completed
    TodoUndo(CmdTodoUndo),

    /// Delete items
    TodoRemove(CmdTodoRemove),

    /// Upload pending changes
    Sync(CmdSync),

    /// Show the upload state
    Status(CmdStatus),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            ListList(a)   => Self::run_with(config, |x| a.run(x).boxed()).await,
            ListNew(a)    => Self::run_with(config, |x| a.run(x).boxed()).await,
            ListRemove(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            TodoList(a)   => Self::run_with(config, |x| a.run(x).boxed()).await,
            TodoNew(a)    => Self::run_with(config, |x| a.run(x).boxed()).await,
            TodoDone(a)   => Self::run_with(config, |x| a.run(x).boxed()).await,
            TodoUndo(a)   => Self::run_with(config, |x| a.run(x).boxed()).await,
            TodoRemove(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            Sync(a)       => Self::run_with(config, |x| a.run(x).boxed()).await,
            Status(a)     => Self::run_with(config, |x| a.run(x).boxed()).await,
        }
    }

    async fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a mut TodoApp) -> BoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration...");
        let config = parse_config(config).await?;
        let mut app = TodoApp::with_listeners(config, report_discards()).await?;

        let result = f(&mut app).await;

        app.close().await?;
        result
    }
}

/// Listeners telling the user about changes the backend refused for good.
fn report_discards() -> Listeners {
    let listeners = Listeners::new();
    listeners.subscribe(SyncEventKind::BatchDiscarded, |event| {
        if let SyncEvent::BatchDiscarded { tx_id, fault } = event {
            println!(
                "{} change {tx_id} was rejected by the backend and dropped: {fault}",
                "Warning:".yellow(),
            );
        }
    });
    listeners
}
