// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{range_query, Ctx};
use crate::ledger::paginate;
use crate::models::{Transaction, TransactionDraft};
use crate::utils::{format_number, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("rm", sub)) => {
            let tid = *sub.get_one::<i64>("tid").unwrap();
            ctx.client()?.delete_transaction(tid)?;
            println!("Deleted transaction {}", tid);
        }
        Some(("receipt", sub)) => receipt(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let branch = sub.get_one::<String>("branch").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap();
    let receipt = sub.get_one::<String>("receipt").map(PathBuf::from);
    if let Some(p) = &receipt {
        check_file(p)?;
    }

    ctx.client()?
        .upload_transaction(date, branch, amount, description, receipt.as_deref())?;
    println!(
        "Recorded {} on {} in '{}'",
        format_number(&amount),
        date,
        branch
    );
    Ok(())
}

fn edit(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let tid = *sub.get_one::<i64>("tid").unwrap();
    let draft = TransactionDraft {
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        branch: sub.get_one::<String>("branch").cloned(),
        cash_flow: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        description: sub.get_one::<String>("description").cloned(),
        receipt: sub.get_one::<String>("receipt").map(PathBuf::from),
    };
    if is_empty(&draft) {
        bail!("Nothing to change: pass at least one of --date, --branch, --amount, --description, --receipt");
    }
    if let Some(p) = &draft.receipt {
        check_file(p)?;
    }
    ctx.client()?.modify_transaction(tid, &draft)?;
    println!("Updated transaction {}", tid);
    Ok(())
}

fn is_empty(d: &TransactionDraft) -> bool {
    d.date.is_none()
        && d.branch.is_none()
        && d.cash_flow.is_none()
        && d.description.is_none()
        && d.receipt.is_none()
}

fn check_file(p: &Path) -> Result<()> {
    if !p.is_file() {
        bail!("Receipt file {} not found", p.display());
    }
    Ok(())
}

fn list(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let query = range_query(sub)?;
    let txs = ctx.client()?.refer_daily(&query)?;
    let page = paginate(&txs, *sub.get_one::<usize>("page").unwrap(), ctx.config.page_size);
    if maybe_print_json(sub.get_flag("json"), false, &page)? {
        return Ok(());
    }
    if txs.is_empty() {
        println!("No transactions.");
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Branch", "Income", "Outcome", "Balance", "Receipt", "Description"],
            table_rows(page.items),
        )
    );
    let (first, last) = page.window;
    println!(
        "Page {} of {} (pages {}-{} shown in this group)",
        page.number, page.total_pages, first, last
    );
    Ok(())
}

pub fn table_rows(items: &[Transaction]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|t| {
            vec![
                t.tid.to_string(),
                t.date.to_string(),
                t.branch.clone(),
                format_number(&t.income()),
                format_number(&t.outcome()),
                format_number(&t.balance),
                if t.has_receipt() { "yes" } else { "" }.to_string(),
                t.description.clone(),
            ]
        })
        .collect()
}

fn receipt(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let tid = *sub.get_one::<i64>("tid").unwrap();
    let client = ctx.client()?;
    let url = client.get_receipt(tid)?;
    match sub.get_one::<String>("out") {
        Some(out) => {
            let bytes = client.fetch_bytes(&url)?;
            std::fs::write(out, &bytes).with_context(|| format!("Write {}", out))?;
            println!("Saved receipt of transaction {} to {}", tid, out);
        }
        None => println!("{}", url),
    }
    Ok(())
}
