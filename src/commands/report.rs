// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{range_query, Ctx};
use crate::error::ReportError;
use crate::ledger::{date_bounds, summarize};
use crate::periods::Period;
use crate::report::tree::TreeLayout;
use crate::report::{artifact_name, daily, periodic, receipts, tree, ReportKind};
use crate::tree::ROOT;
use crate::utils::{format_number, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("daily", sub)) => generate(ctx, ReportKind::Daily, sub),
        Some(("periodic", sub)) => generate(ctx, ReportKind::Periodic, sub),
        Some(("tree", sub)) => generate(ctx, ReportKind::Tree, sub),
        Some(("receipts", sub)) => generate(ctx, ReportKind::Receipts, sub),
        Some(("summary", sub)) => summary(ctx, sub),
        _ => Ok(()),
    }
}

fn generate(ctx: &Ctx, kind: ReportKind, sub: &clap::ArgMatches) -> Result<()> {
    let query = range_query(sub)?;
    let client = ctx.client()?;
    let txs = client.refer_daily(&query)?;
    let Some((first, last)) = date_bounds(&txs) else {
        println!("{}", ReportError::NoTransactions);
        return Ok(());
    };
    let begin = query.begin.unwrap_or(first);
    let end = query.end.unwrap_or(last);
    let months = sub
        .try_get_one::<u32>("period")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(1);
    let period = Period::months(months)?;

    let rendered = match kind {
        ReportKind::Daily => daily::render(&txs, begin, end),
        ReportKind::Periodic => periodic::render(&txs, begin, end, period),
        ReportKind::Tree => {
            let branches = client.get_tree().context("Failed to load branch tree")?;
            let root = query.branch.as_deref().unwrap_or(ROOT);
            let layout = if sub.get_flag("flat") {
                TreeLayout::Flat
            } else {
                TreeLayout::Rollup
            };
            let max_depth = *sub.get_one::<usize>("max-depth").unwrap();
            tree::render(&branches, root, &txs, begin, end, period, layout, max_depth)
        }
        ReportKind::Receipts => {
            let font = match font_path(ctx, sub) {
                Some(p) => Some(
                    fs::read(&p).with_context(|| format!("Read font {}", p.display()))?,
                ),
                None => None,
            };
            receipts::plan(&txs, begin, end, period).and_then(|plan| {
                let images = client
                    .fetch_receipts(&plan.receipt_tids())
                    .map_err(|e| ReportError::Pdf(format!("fetching receipts: {}", e)))?;
                receipts::render(&plan, &images, font.as_deref())
            })
        }
    };

    match rendered {
        Ok(bytes) => {
            let path = write_artifact(&ctx.config.out_dir, &artifact_name(kind, begin, end), &bytes)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        Err(ReportError::NoTransactions) => {
            println!("{}", ReportError::NoTransactions);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// `--font` wins over the stored `font_path` setting.
fn font_path(ctx: &Ctx, sub: &clap::ArgMatches) -> Option<PathBuf> {
    sub.try_get_one::<String>("font")
        .ok()
        .flatten()
        .map(PathBuf::from)
        .or_else(|| ctx.config.font_path.clone())
}

pub fn write_artifact(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Create {}", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("Write {}", path.display()))?;
    info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

fn summary(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let query = range_query(sub)?;
    let txs = ctx.client()?.refer_daily(&query)?;
    let Some((first, last)) = date_bounds(&txs) else {
        println!("{}", ReportError::NoTransactions);
        return Ok(());
    };
    let branch = query.branch.as_deref().unwrap_or(ROOT);
    let s = summarize(
        &txs,
        branch,
        query.begin.unwrap_or(first),
        query.end.unwrap_or(last),
    );
    if maybe_print_json(sub.get_flag("json"), false, &s)? {
        return Ok(());
    }

    println!(
        "{}",
        pretty_table(
            &["Branch", "Income", "Outcome", "Balance"],
            vec![vec![
                branch.to_string(),
                format_number(&s.total.income),
                format_number(&s.total.outcome),
                format_number(&s.total.balance()),
            ]],
        )
    );
    let rows: Vec<Vec<String>> = s
        .children
        .iter()
        .map(|(name, f)| {
            vec![
                name.clone(),
                format_number(&f.income),
                format_number(&f.outcome),
                format_number(&f.balance()),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Child", "Income", "Outcome", "Balance"], rows));
    let rows: Vec<Vec<String>> = s
        .months
        .iter()
        .map(|m| {
            vec![
                m.month.clone(),
                format_number(&m.income),
                format_number(&m.outcome),
                format_number(&m.balance),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Income", "Outcome", "Balance"], rows));
    Ok(())
}
