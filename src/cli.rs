// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("branch")
            .long("branch")
            .default_value("Home")
            .help("Branch path, e.g. Home/Food"),
    )
    .arg(Arg::new("from").long("from").help("First day, YYYY-MM-DD"))
    .arg(Arg::new("to").long("to").help("Last day, YYYY-MM-DD"))
}

fn period_arg() -> Arg {
    Arg::new("period")
        .long("period")
        .value_parser(value_parser!(u32))
        .default_value("1")
        .help("Bucket length in months")
}

pub fn build_cli() -> Command {
    Command::new("branchbook")
        .version(crate_version!())
        .about("Hierarchical family ledger: branches, transactions and reports")
        .arg(
            Arg::new("url")
                .long("url")
                .global(true)
                .help("Backend base URL (overrides BRANCHBOOK_URL and the stored setting)"),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .global(true)
                .help("Directory for generated reports"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand(
            Command::new("config")
                .about("Local settings")
                .subcommand(Command::new("show").arg(json_flag()))
                .subcommand(Command::new("set-url").arg(Arg::new("value").required(true)))
                .subcommand(Command::new("set-out-dir").arg(Arg::new("value").required(true)))
                .subcommand(
                    Command::new("set-page-size").arg(
                        Arg::new("value")
                            .required(true)
                            .value_parser(value_parser!(usize)),
                    ),
                )
                .subcommand(
                    Command::new("set-font")
                        .about("TrueType font used for PDF text (needed for non-Latin names)")
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("ping").about("Check that the backend answers")),
        )
        .subcommand(
            Command::new("auth")
                .about("Sign-up, sign-in and passwords")
                .subcommand(
                    Command::new("send-code")
                        .about("Email a verification code (sign-up step 1)")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("verify")
                        .about("Check the emailed code (sign-up step 2)")
                        .arg(Arg::new("code").long("code").required(true)),
                )
                .subcommand(
                    Command::new("signup")
                        .about("Create the account (sign-up step 3)")
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(Arg::new("confirm").long("confirm").required(true)),
                )
                .subcommand(
                    Command::new("signin")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(Command::new("signout"))
                .subcommand(
                    Command::new("forgot")
                        .about("Send a password reset email")
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(
                    Command::new("passwd")
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(Arg::new("confirm").long("confirm").required(true)),
                ),
        )
        .subcommand(
            Command::new("user")
                .about("Account details")
                .subcommand(Command::new("info").arg(json_flag()))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(
                            Arg::new("use-ai")
                                .long("use-ai")
                                .value_parser(value_parser!(bool))
                                .help("true|false; keeps the current value when omitted"),
                        ),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete the account; type your email to confirm")
                        .arg(Arg::new("confirm").long("confirm").required(true)),
                ),
        )
        .subcommand(
            Command::new("branch")
                .about("Branch hierarchy")
                .subcommand(
                    Command::new("tree")
                        .arg(Arg::new("root").long("root").default_value("Home"))
                        .arg(
                            Arg::new("fallback")
                                .long("fallback")
                                .action(ArgAction::SetTrue)
                                .help("Show a bare Home tree if the fetch fails"),
                        )
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("parent").required(true))
                        .arg(Arg::new("child").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("path").required(true))
                        .arg(
                            Arg::new("confirm")
                                .long("confirm")
                                .required(true)
                                .help("Type the branch name to confirm"),
                        ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    range_args(Command::new("list"))
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .value_parser(value_parser!(usize))
                                .default_value("1"),
                        )
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("branch").long("branch").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Positive for income, negative for outcome"),
                        )
                        .arg(Arg::new("description").long("description").default_value(""))
                        .arg(Arg::new("receipt").long("receipt").help("Image file")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("tid")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("branch").long("branch"))
                        .arg(Arg::new("amount").long("amount").allow_hyphen_values(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("receipt").long("receipt")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("tid")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("receipt")
                        .arg(
                            Arg::new("tid")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("out").long("out").help("Save the image here")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Spreadsheet and PDF reports")
                .subcommand(range_args(Command::new("daily")))
                .subcommand(range_args(Command::new("periodic")).arg(period_arg()))
                .subcommand(
                    range_args(Command::new("tree"))
                        .arg(period_arg())
                        .arg(
                            Arg::new("flat")
                                .long("flat")
                                .action(ArgAction::SetTrue)
                                .help("One sheet, own transactions only"),
                        )
                        .arg(
                            Arg::new("max-depth")
                                .long("max-depth")
                                .value_parser(value_parser!(usize))
                                .default_value("10"),
                        ),
                )
                .subcommand(
                    range_args(Command::new("receipts"))
                        .arg(period_arg())
                        .arg(
                            Arg::new("font")
                                .long("font")
                                .help("TrueType font file; overrides the stored setting"),
                        ),
                )
                .subcommand(range_args(Command::new("summary")).arg(json_flag())),
        )
        .subcommand(
            Command::new("export").subcommand(
                range_args(Command::new("transactions"))
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
}
