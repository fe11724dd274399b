// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Downloadable artifacts. Every renderer is a pure function from
//! transactions (plus range and period) to file bytes, and refuses to
//! produce anything when there are no transactions.

pub mod daily;
pub mod periodic;
pub mod receipts;
pub mod tree;

use crate::error::ReportError;
use crate::models::Transaction;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

pub const HEADER_BLUE: u32 = 0x4F81BD;
pub const TOTAL_FILL: u32 = 0xDBE7F1;
pub const NUM_FORMAT: &str = "#,##0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Periodic,
    Tree,
    Receipts,
}

pub fn artifact_name(kind: ReportKind, begin: NaiveDate, end: NaiveDate) -> String {
    match kind {
        ReportKind::Daily => "daily.xlsx".to_string(),
        ReportKind::Periodic => format!("transactions_{}_{}.xlsx", begin, end),
        ReportKind::Tree => format!("tree_transactions_{}_{}.xlsx", begin, end),
        ReportKind::Receipts => "accounting_ledger.pdf".to_string(),
    }
}

pub(crate) fn ensure_any(txs: &[Transaction]) -> Result<(), ReportError> {
    if txs.is_empty() {
        return Err(ReportError::NoTransactions);
    }
    Ok(())
}

/// Grey shade for a branch row: deeper branches are darker, never below 55.
pub fn depth_color(depth: usize, max_depth: usize) -> u32 {
    let max_depth = max_depth.max(1) as f64;
    let value = (255.0 - depth as f64 * (200.0 / max_depth)).max(55.0).floor() as u32;
    (value << 16) | (value << 8) | value
}

pub(crate) fn num(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

pub(crate) fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(12.0)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_BLUE))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Medium)
}

pub(crate) fn cell_format() -> Format {
    Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
}

pub(crate) fn number_format() -> Format {
    cell_format().set_num_format(NUM_FORMAT)
}
