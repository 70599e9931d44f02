// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use todosync_core::{DrainError, DrainSummary, TodoApp};

#[derive(Debug, Clone)]
pub struct CmdSync {
    pub watch: bool,
}

impl CmdSync {
    pub const NAME: &str = "sync";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Upload pending changes to the backend")
            .arg(arg!(-w --watch "Keep uploading in the background until interrupted"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            watch: matches.get_flag("watch"),
        }
    }

    pub async fn run(self, app: &mut TodoApp) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "uploading pending changes...");
        let summary = if self.watch {
            println!("Watching for changes, press Ctrl-C to stop");
            app.watch(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(err = %e, "failed to listen for ctrl-c");
                }
            })
            .await?
        } else {
            match app.upload().await {
                Ok(summary) => summary,
                Err(err) => {
                    if let Some(drain) = err.downcast_ref::<DrainError>() {
                        print_summary(&drain.summary);
                    }
                    return Err(err);
                }
            }
        };

        print_summary(&summary);
        let pending = app.pending_uploads().await?;
        if pending > 0 {
            println!("{} {pending} changes still pending", "Warning:".yellow());
        }
        Ok(())
    }
}

fn print_summary(summary: &DrainSummary) {
    println!("Uploaded {} batches", summary.uploaded);
    if summary.discarded > 0 {
        println!(
            "{} discarded {} batches rejected by the backend",
            "Warning:".yellow(),
            summary.discarded
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdStatus;

impl CmdStatus {
    pub const NAME: &str = "status";

    pub fn command() -> Command {
        Command::new(Self::NAME).about("Show the upload queue and backend state")
    }

    pub async fn run(self, app: &mut TodoApp) -> Result<(), Box<dyn Error>> {
        let pending = app.pending_uploads().await?;
        let backend = match app.is_connected() {
            true => "configured".green(),
            false => "not configured".yellow(),
        };
        println!("Backend: {backend}");
        println!("Pending changes: {pending}");
        Ok(())
    }
}
