// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Ctx;
use crate::error::ApiError;
use crate::session::Session;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{bail, Result};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("info", sub)) => {
            let info = ctx.client()?.get_user_info()?;
            if !maybe_print_json(sub.get_flag("json"), false, &info)? {
                let rows = vec![
                    vec!["Email".into(), info.email.clone().unwrap_or_default()],
                    vec!["Name".into(), info.username.clone().unwrap_or_default()],
                    vec![
                        "AI assist".into(),
                        if info.useai.unwrap_or(false) { "on" } else { "off" }.into(),
                    ],
                ];
                println!("{}", pretty_table(&["Field", "Value"], rows));
            }
            Ok(())
        }
        Some(("update", sub)) => {
            let username = sub.get_one::<String>("username").unwrap().trim();
            if username.is_empty() {
                bail!("Username cannot be empty.");
            }
            let client = ctx.client()?;
            let use_ai = match sub.get_one::<bool>("use-ai") {
                Some(v) => *v,
                None => client.get_user_info()?.useai.unwrap_or(false),
            };
            client.update_user_info(username, use_ai)?;
            println!("Profile updated.");
            Ok(())
        }
        Some(("delete", sub)) => delete(ctx, sub.get_one::<String>("confirm").unwrap()),
        _ => Ok(()),
    }
}

fn delete(ctx: &Ctx, confirm: &str) -> Result<()> {
    let email = match (&ctx.session.email, ctx.session.is_signed_in()) {
        (Some(e), true) => e.clone(),
        _ => return Err(ApiError::NotLoggedIn.into()),
    };
    if confirm != email {
        bail!("The input does not match your email.");
    }
    ctx.client()?.delete_account()?;
    Session::clear(ctx.conn)?;
    println!("Account {} deleted.", email);
    Ok(())
}
