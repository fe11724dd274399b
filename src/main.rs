// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use env_logger::Env;

use branchbook::commands::{self, Ctx};
use branchbook::config::{Config, Overrides};
use branchbook::session::Session;
use branchbook::{cli, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let level = if matches.get_flag("verbose") { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let conn = db::open_or_init()?;
    let config = Config::resolve(&conn, &Overrides::from_matches(&matches))?;
    let session = Session::load(&conn, &config)?;
    let ctx = Ctx::new(&conn, config, session);

    match matches.subcommand() {
        Some(("config", sub)) => commands::settings::handle(&ctx, sub)?,
        Some(("auth", sub)) => commands::auth::handle(&ctx, sub)?,
        Some(("user", sub)) => commands::user::handle(&ctx, sub)?,
        Some(("branch", sub)) => commands::branch::handle(&ctx, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&ctx, sub)?,
        Some(("report", sub)) => commands::report::handle(&ctx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ctx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
