// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

pub const DEFAULT_USER: &str = "default";

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn as_of_arg() -> Arg {
    Arg::new("as_of")
        .long("as-of")
        .value_name("DATE")
        .help("Evaluate as if now were DATE (YYYY-MM-DD[THH:MM])")
}

fn tx_fields(required: bool) -> [Arg; 5] {
    [
        Arg::new("type")
            .long("type")
            .required(required)
            .value_parser(["expense", "income"]),
        Arg::new("category").long("category").required(required),
        Arg::new("amount").long("amount").required(required),
        Arg::new("date")
            .long("date")
            .value_name("DATE")
            .help("YYYY-MM-DD or YYYY-MM-DDTHH:MM, defaults to now"),
        Arg::new("notes").long("notes"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .about("Personal finance tracking: transactions, period budgets, savings goals")
        .version(clap::crate_version!())
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .default_value(DEFAULT_USER)
                .help("Whose records to read and write"),
        )
        .subcommand(Command::new("init").about("Create the database and print its location"))
        .subcommand(
            Command::new("tx")
                .about("Income and expense transactions")
                .subcommand(Command::new("add").args(tx_fields(true)))
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["expense", "income"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("from").long("from").value_name("DATE"))
                        .arg(Arg::new("to").long("to").value_name("DATE"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("replace")
                        .about("Replace every field of a transaction")
                        .arg(id_arg())
                        .args(tx_fields(true)),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("budget")
                .about("Category budgets")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .default_value("monthly")
                                .value_parser(["weekly", "monthly", "quarterly", "yearly"]),
                        )
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .value_name("DATE")
                                .requires("end"),
                        )
                        .arg(
                            Arg::new("end")
                                .long("end")
                                .value_name("DATE")
                                .requires("start"),
                        ),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("status")
                        .about("Spent, remaining and status for every budget")
                        .arg(as_of_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("current").long("current").default_value("0"))
                        .arg(
                            Arg::new("deadline")
                                .long("deadline")
                                .value_name("DATE")
                                .required(true),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .default_value("general"),
                        ),
                )
                .subcommand(Command::new("list").arg(as_of_arg()).args(json_args()))
                .subcommand(
                    Command::new("contribute")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("report")
                .about("Totals across transactions")
                .subcommand(Command::new("overview").args(json_args()))
                .subcommand(
                    Command::new("spend-by-category")
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .value_parser(["weekly", "monthly", "quarterly", "yearly"])
                                .help("Limit to the current period, default all time"),
                        )
                        .arg(as_of_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("trend")
                        .about("Income and expense per month, oldest first")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .default_value("6")
                                .value_parser(value_parser!(u32).range(1..=120)),
                        )
                        .arg(as_of_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("ask")
                .about("Ask a question about your spending")
                .arg(
                    Arg::new("message")
                        .required(true)
                        .num_args(1..)
                        .trailing_var_arg(true),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .help("csv or json, guessed from the extension when omitted"),
                        ),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Display settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("currency")
                        .arg(Arg::new("code").required(true).help("ISO code, e.g. INR")),
                ),
        )
}

/// The `--user` value; global, so any subcommand's matches carry it.
pub fn user_of(m: &ArgMatches) -> String {
    m.get_one::<String>("user")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_USER.to_string())
}
