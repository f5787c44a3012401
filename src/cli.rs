// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn as_of(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("as_of")
            .long("as-of")
            .value_name("YYYY-MM-DD")
            .help("Reference date (defaults to today)"),
    )
}

fn range_arg() -> Arg {
    Arg::new("range")
        .long("range")
        .short('r')
        .default_value("current_month")
        .help("current_month | last_3_months | last_year | lifetime")
}

fn report_cmd(name: &'static str, about: &'static str) -> Command {
    json_flags(as_of(Command::new(name).about(about)))
}

pub fn build_cli() -> Command {
    Command::new("subtally")
        .about("Track subscriptions and what they cost you")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("sub")
                .about("Manage subscriptions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("price")
                                .long("price")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("cycle").long("cycle").default_value("monthly"))
                        .arg(Arg::new("start").long("start").required(true).value_name("YYYY-MM-DD"))
                        .arg(Arg::new("category").long("category").default_value("Other"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(
                            Arg::new("price")
                                .long("price")
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("cycle").long("cycle"))
                        .arg(Arg::new("start").long("start").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(as_of(
                    Command::new("upcoming").about("Renewals due soon").arg(
                        Arg::new("days")
                            .long("days")
                            .value_parser(value_parser!(u32))
                            .default_value("7"),
                    ),
                ))),
        )
        .subcommand(
            Command::new("report")
                .about("Spending analytics")
                .subcommand(
                    report_cmd("categories", "Spend per category for a range").arg(range_arg()),
                )
                .subcommand(report_cmd("total", "Total spend for a range").arg(range_arg()))
                .subcommand(
                    report_cmd("change", "Change against the previous period").arg(range_arg()),
                )
                .subcommand(
                    report_cmd("trend", "Monthly run-rate series")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("range")
                                .long("range")
                                .short('r')
                                .help("Only include months inside this range"),
                        ),
                )
                .subcommand(report_cmd("extremes", "Highest and lowest lifetime spend"))
                .subcommand(
                    report_cmd("summary", "All analytics for one range").arg(range_arg()),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set-currency")
                        .arg(Arg::new("symbol").long("symbol").required(true)),
                )
                .subcommand(
                    Command::new("set-pro").arg(
                        Arg::new("enabled")
                            .long("enabled")
                            .required(true)
                            .value_parser(value_parser!(bool)),
                    ),
                )
                .subcommand(
                    Command::new("set-trend-months").arg(
                        Arg::new("months")
                            .long("months")
                            .required(true)
                            .value_parser(value_parser!(usize)),
                    ),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Exchange snapshots with another device")
                .subcommand(Command::new("push").arg(Arg::new("out").long("out").required(true)))
                .subcommand(Command::new("pull").arg(Arg::new("file").long("file").required(true))),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("subscriptions")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("subscriptions")
                    .arg(Arg::new("format").long("format").default_value("csv"))
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for oddities"))
}
