// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{range_query, Ctx};
use crate::models::Transaction;
use anyhow::{bail, Result};
use serde_json::json;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => bail!("Unknown format: {} (use csv|json)", other),
        }
    }
}

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(ctx, sub),
        _ => Ok(()),
    }
}

fn export_transactions(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    // Reject the format before any network round trip.
    let fmt = ExportFormat::parse(sub.get_one::<String>("format").unwrap())?;
    let out = sub.get_one::<String>("out").unwrap();
    let query = range_query(sub)?;
    let txs = ctx.client()?.refer_daily(&query)?;
    write_transactions(&txs, fmt, Path::new(out))?;
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}

pub fn write_transactions(txs: &[Transaction], fmt: ExportFormat, out: &Path) -> Result<()> {
    match fmt {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "tid", "date", "branch", "cash_flow", "balance", "receipt", "description",
            ])?;
            for t in txs {
                wtr.write_record([
                    t.tid.to_string(),
                    t.date.to_string(),
                    t.branch.clone(),
                    t.cash_flow.to_string(),
                    t.balance.to_string(),
                    t.receipt.clone().unwrap_or_default(),
                    t.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "tid": t.tid,
                        "date": t.date.to_string(),
                        "branch": t.branch,
                        "cash_flow": t.cash_flow.to_string(),
                        "balance": t.balance.to_string(),
                        "receipt": t.receipt,
                        "description": t.description,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    Ok(())
}
