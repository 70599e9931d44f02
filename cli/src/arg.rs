// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgMatches, arg, value_parser};

/// The output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn output_format() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(OutputFormat))
            .default_value("table")
    }

    pub fn get_output_format(matches: &ArgMatches) -> OutputFormat {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(OutputFormat::Table)
    }
}

/// Arguments naming lists or items by id, or by a unique id prefix.
#[derive(Debug, Clone, Copy)]
pub struct IdArgs {
    kind: &'static str,
}

impl IdArgs {
    pub const LIST: IdArgs = IdArgs { kind: "list" };
    pub const TODO: IdArgs = IdArgs { kind: "todo" };

    pub fn id(self) -> Arg {
        let help = format!("The id of the {}, or a unique prefix of it", self.kind);
        arg!(id: <ID>).help(help)
    }

    pub fn get_id(matches: &ArgMatches) -> String {
        matches
            .get_one::<String>("id")
            .expect("id is required")
            .clone()
    }

    pub fn ids(self) -> Arg {
        let help = format!("The ids of the {}s, or unique prefixes of them", self.kind);
        arg!(id: <ID>).help(help).num_args(1..)
    }

    pub fn get_ids(matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>("id")
            .expect("id is required")
            .cloned()
            .collect()
    }
}

/// Shortens an id for display. Any prefix resolves back as long as it is unique.
pub fn short_id(id: &str) -> &str {
    const LEN: usize = 8;
    id.get(..LEN).unwrap_or(id)
}
