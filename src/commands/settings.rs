// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Ctx;
use crate::config::{KEY_BASE_URL, KEY_FONT_PATH, KEY_OUT_DIR, KEY_PAGE_SIZE};
use crate::utils::{maybe_print_json, pretty_table, set_setting};
use anyhow::{bail, Context, Result};
use reqwest::Url;
use serde_json::json;

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(ctx, sub.get_flag("json")),
        Some(("set-url", sub)) => set_url(ctx, sub.get_one::<String>("value").unwrap()),
        Some(("set-out-dir", sub)) => {
            let dir = sub.get_one::<String>("value").unwrap();
            set_setting(ctx.conn, KEY_OUT_DIR, dir)?;
            println!("Reports will be written to {}", dir);
            Ok(())
        }
        Some(("set-page-size", sub)) => {
            let n = *sub.get_one::<usize>("value").unwrap();
            if n == 0 {
                bail!("Page size must be at least 1");
            }
            set_setting(ctx.conn, KEY_PAGE_SIZE, &n.to_string())?;
            println!("Page size set to {}", n);
            Ok(())
        }
        Some(("set-font", sub)) => {
            let path = sub.get_one::<String>("value").unwrap();
            if !std::path::Path::new(path).is_file() {
                bail!("Font file '{}' not found", path);
            }
            set_setting(ctx.conn, KEY_FONT_PATH, path)?;
            println!("PDF text will use {}", path);
            Ok(())
        }
        Some(("ping", _)) => {
            let reply = ctx.client()?.ping().context("Backend did not answer")?;
            println!("{} is up: {}", ctx.config.base_url, reply);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn set_url(ctx: &Ctx, raw: &str) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("Invalid URL '{}'", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Backend URL must be http or https, got '{}'", url.scheme());
    }
    let value = raw.trim_end_matches('/');
    set_setting(ctx.conn, KEY_BASE_URL, value)?;
    println!("Backend set to {}", value);
    Ok(())
}

fn show(ctx: &Ctx, as_json: bool) -> Result<()> {
    let signed_in = ctx.session.email.clone().filter(|_| ctx.session.is_signed_in());
    let v = json!({
        "base_url": ctx.config.base_url,
        "out_dir": ctx.config.out_dir,
        "page_size": ctx.config.page_size,
        "font_path": ctx.config.font_path,
        "signed_in_as": signed_in,
    });
    if !maybe_print_json(as_json, false, &v)? {
        let rows = vec![
            vec!["Backend".into(), ctx.config.base_url.clone()],
            vec!["Output dir".into(), ctx.config.out_dir.display().to_string()],
            vec!["Page size".into(), ctx.config.page_size.to_string()],
            vec![
                "PDF font".into(),
                ctx.config
                    .font_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "Helvetica (builtin)".into()),
            ],
            vec![
                "Signed in as".into(),
                signed_in.unwrap_or_else(|| "-".into()),
            ],
        ];
        println!("{}", pretty_table(&["Setting", "Value"], rows));
    }
    Ok(())
}
