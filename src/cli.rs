// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::fx::DEFAULT_RATES_URL;
use crate::models::CATEGORIES;
use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

pub fn build_cli() -> Command {
    Command::new("kopilka")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track income and expenses in UAH, view them in USD, EUR or PLN")
        .arg(
            Arg::new("db")
                .long("db")
                .env("KOPILKA_DB")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("SQLite file holding the operations (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .env("KOPILKA_API_KEY")
                .global(true)
                .hide_env_values(true)
                .help("CurrencyFreaks API key"),
        )
        .arg(
            Arg::new("rates-url")
                .long("rates-url")
                .env("KOPILKA_RATES_URL")
                .global(true)
                .default_value(DEFAULT_RATES_URL),
        )
        .arg(
            Arg::new("rates-ttl")
                .long("rates-ttl")
                .env("KOPILKA_RATES_TTL")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Seconds a fetched rate snapshot stays valid [default: 600]"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommands(operation_commands())
        .subcommand(Command::new("doctor").about("Check stored data and rate service"))
        .subcommand(Command::new("shell").about("Interactive session over one store"))
}

/// Commands accepted inside `kopilka shell`, one per line.
pub fn build_shell_cli() -> Command {
    Command::new("kopilka")
        .no_binary_name(true)
        .disable_version_flag(true)
        .subcommand_required(true)
        .subcommands(operation_commands())
        .subcommand(Command::new("quit").alias("exit").about("Leave the shell"))
}

fn currency_arg() -> Arg {
    Arg::new("currency")
        .long("currency")
        .short('c')
        .help("UAH, USD, EUR or PLN")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
        .arg(
            Arg::new("jsonl")
                .long("jsonl")
                .action(ArgAction::SetTrue)
                .conflicts_with("json"),
        )
}

fn operation_commands() -> Vec<Command> {
    vec![
        Command::new("add")
            .about("Record an operation")
            .arg(
                Arg::new("amount")
                    .required(true)
                    .allow_hyphen_values(true)
                    .help("Amount in the chosen currency"),
            )
            .arg(currency_arg())
            .arg(
                Arg::new("category")
                    .long("category")
                    .short('k')
                    .value_parser(CATEGORIES)
                    .default_value(CATEGORIES[0]),
            )
            .arg(
                Arg::new("income")
                    .long("income")
                    .action(ArgAction::SetTrue)
                    .conflicts_with("expense"),
            )
            .arg(Arg::new("expense").long("expense").action(ArgAction::SetTrue)),
        Command::new("rm")
            .about("Remove an operation by id")
            .arg(Arg::new("id").required(true)),
        json_flags(
            Command::new("list")
                .about("Operations in insertion order")
                .arg(currency_arg()),
        ),
        json_flags(
            Command::new("summary")
                .about("Income, expenses and balance")
                .arg(currency_arg()),
        ),
        json_flags(
            Command::new("stats")
                .about("Statistics view")
                .arg(currency_arg())
                .arg(
                    Arg::new("display")
                        .long("display")
                        .short('d')
                        .help("Currency the statistics view shows (defaults to --currency)"),
                ),
        ),
        Command::new("fx")
            .about("Exchange rates")
            .subcommand_required(true)
            .subcommand(Command::new("rates").about("Show the current snapshot"))
            .subcommand(
                Command::new("convert")
                    .about("Convert an amount between supported currencies")
                    .arg(Arg::new("amount").required(true))
                    .arg(Arg::new("from").long("from").required(true))
                    .arg(Arg::new("to").long("to").required(true)),
            ),
        Command::new("export")
            .about("Write all operations to a file")
            .arg(Arg::new("format").long("format").required(true).help("csv|json"))
            .arg(Arg::new("out").long("out").required(true)),
    ]
}
