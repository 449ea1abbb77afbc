// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

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
            .help("Print one JSON object per line"),
    )
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn user_arg(required: bool) -> Arg {
    Arg::new("user")
        .long("user")
        .required(required)
        .value_parser(value_parser!(i64))
        .help("User id")
}

pub fn build_cli() -> Command {
    Command::new("famledger")
        .version(crate_version!())
        .about("Family finance ledger: users, transactions, budgets, reports")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Path of the store file (overrides FAMLEDGER_DB)"),
        )
        .subcommand(Command::new("init").about("Create and seed the store"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(Arg::new("phone").long("phone")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(
                    Command::new("passwd")
                        .arg(id_arg("User id"))
                        .arg(Arg::new("current").long("current").required(true))
                        .arg(Arg::new("new").long("new").required(true)),
                )
                .subcommand(
                    Command::new("update")
                        .arg(id_arg("User id"))
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("phone").long("phone")),
                )
                .subcommand(Command::new("rm").arg(id_arg("User id"))),
        )
        .subcommand(
            Command::new("otp")
                .about("Issue and verify one-time codes")
                .subcommand(
                    Command::new("send")
                        .arg(Arg::new("contact").long("contact").required(true))
                        .arg(
                            Arg::new("user")
                                .long("user")
                                .value_parser(value_parser!(i64))
                                .help("Owning user id, if the account exists"),
                        ),
                )
                .subcommand(
                    Command::new("verify")
                        .arg(Arg::new("contact").long("contact").required(true))
                        .arg(Arg::new("code").long("code").required(true)),
                )
                .subcommand(Command::new("purge").about("Delete used and expired codes")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("icon").long("icon")),
                )
                .subcommand(Command::new("rm").arg(id_arg("Category id"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Negative for expenses"),
                        )
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("date").long("date").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(user_arg(false))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg("Transaction id"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(Command::new("rm").arg(id_arg("Transaction id"))),
        )
        .subcommand(
            Command::new("budget")
                .about("Category budgets")
                .subcommand(
                    Command::new("set")
                        .arg(user_arg(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .default_value("monthly"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").arg(user_arg(false))))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg("Budget id"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("period").long("period")),
                )
                .subcommand(Command::new("rm").arg(id_arg("Budget id")))
                .subcommand(json_flags(
                    Command::new("status")
                        .arg(user_arg(true))
                        .arg(Arg::new("date").long("date").help("Reference day, default today")),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated reports")
                .subcommand(json_flags(
                    Command::new("totals")
                        .arg(user_arg(true))
                        .arg(Arg::new("month").long("month")),
                ))
                .subcommand(json_flags(
                    Command::new("cashflow").arg(user_arg(true)).arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize))
                            .default_value("12"),
                    ),
                ))
                .subcommand(json_flags(
                    Command::new("spend-by-category")
                        .arg(user_arg(true))
                        .arg(Arg::new("month").long("month")),
                )),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(user_arg(true))
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("query")
                .about("Run a command-text query against the store")
                .arg(Arg::new("text").required(true))
                .arg(
                    Arg::new("params")
                        .num_args(0..)
                        .allow_hyphen_values(true)
                        .help("Positional params, parsed as JSON when possible"),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}
