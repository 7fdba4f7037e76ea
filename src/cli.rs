// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, crate_version, value_parser};

fn batch_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("limit")
            .long("limit")
            .value_parser(value_parser!(usize))
            .help("Newest N movements to process (defaults to the batch_limit setting)"),
    )
    .arg(
        Arg::new("all")
            .long("all")
            .action(ArgAction::SetTrue)
            .help("Process every matching movement"),
    )
    .group(ArgGroup::new("bound").args(["limit", "all"]))
    .arg(
        Arg::new("dry_run")
            .long("dry-run")
            .action(ArgAction::SetTrue)
            .help("Report what would change without writing"),
    )
    .arg(json_flag())
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true)
}

pub fn build_cli() -> Command {
    Command::new("ledgersweep")
        .version(crate_version!())
        .about("Clean bank concepts and assign movements to properties by keyword rules")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("SQLite file (overrides LEDGERSWEEP_DB)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging unless RUST_LOG is set"),
        )
        .arg(
            Arg::new("remote")
                .long("remote")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Work against the REST backend configured as api_url"),
        )
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(batch_args(
            Command::new("clean").about("Strip bank boilerplate from movement concepts"),
        ))
        .subcommand(batch_args(
            Command::new("classify").about("Assign unassigned movements using active rules"),
        ))
        .subcommand(
            batch_args(Command::new("sweep").about("Clean concepts, then classify")).arg(
                Arg::new("verify")
                    .long("verify")
                    .action(ArgAction::SetTrue)
                    .help("Count remaining unclean/unassigned movements afterwards"),
            ),
        )
        .subcommand(
            Command::new("rules")
                .about("Manage classification rules")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("property")
                                .long("property")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("keyword").long("keyword").required(true))
                        .arg(Arg::new("tenant").long("tenant"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("subcategory").long("subcategory")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include inactive rules"),
                        )
                        .arg(json_flag()),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(Command::new("enable").arg(id_arg()))
                .subcommand(Command::new("disable").arg(id_arg()))
                .subcommand(
                    Command::new("test")
                        .about("Show which rule a concept would be assigned by")
                        .arg(Arg::new("concept").long("concept").required(true))
                        .arg(json_flag()),
                ),
        )
        .subcommand(
            Command::new("movements").about("Inspect movements").subcommand(
                Command::new("list")
                    .arg(
                        Arg::new("unassigned")
                            .long("unassigned")
                            .action(ArgAction::SetTrue),
                    )
                    .arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    )
                    .arg(json_flag()),
            ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Report movements and rules that need manual follow-up")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("config")
                .about("Read and write settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("list")),
        )
}
