// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{cell_format, ensure_any, header_format, num, number_format, TOTAL_FILL};
use crate::error::ReportError;
use crate::ledger::{filter_range, Flow};
use crate::models::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, FormatBorder, Workbook};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub branch: String,
    pub income: Decimal,
    pub outcome: Decimal,
    /// Running total over the emitted rows only.
    pub balance: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyLedger {
    pub rows: Vec<DailyRow>,
    pub total: Flow,
}

pub fn build(
    txs: &[Transaction],
    begin: NaiveDate,
    end: NaiveDate,
) -> Result<DailyLedger, ReportError> {
    ensure_any(txs)?;
    let mut total = Flow::default();
    let rows = filter_range(txs, begin, end)
        .into_iter()
        .map(|t| {
            total.add(t);
            DailyRow {
                date: t.date,
                branch: t.branch.clone(),
                income: t.income(),
                outcome: t.outcome(),
                balance: total.balance(),
                description: t.description.clone(),
            }
        })
        .collect();
    Ok(DailyLedger { rows, total })
}

const HEADERS: [(&str, f64); 6] = [
    ("Date", 15.0),
    ("Branch", 40.0),
    ("Income", 15.0),
    ("Outcome", 15.0),
    ("Balance", 15.0),
    ("Description", 30.0),
];

pub fn render(txs: &[Transaction], begin: NaiveDate, end: NaiveDate) -> Result<Vec<u8>, ReportError> {
    let ledger = build(txs, begin, end)?;

    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet();
    sheet.set_name("Transactions")?;

    let head = header_format();
    for (c, (name, width)) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, *name, &head)?;
        sheet.set_column_width(c as u16, *width)?;
    }
    sheet.set_row_height(0, 20)?;

    let text = cell_format();
    let money = number_format();
    for (i, r) in ledger.rows.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string_with_format(row, 0, r.date.to_string(), &text)?;
        sheet.write_string_with_format(row, 1, &r.branch, &text)?;
        sheet.write_number_with_format(row, 2, num(r.income), &money)?;
        sheet.write_number_with_format(row, 3, num(r.outcome), &money)?;
        sheet.write_number_with_format(row, 4, num(r.balance), &money)?;
        sheet.write_string_with_format(row, 5, &r.description, &text)?;
        sheet.set_row_height(row, 18)?;
    }

    let total_row = (ledger.rows.len() + 1) as u32;
    let total_text = cell_format()
        .set_bold()
        .set_border(FormatBorder::Medium)
        .set_background_color(Color::RGB(TOTAL_FILL));
    let total_money = total_text.clone().set_num_format(super::NUM_FORMAT);
    sheet.write_blank(total_row, 0, &total_text)?;
    sheet.write_string_with_format(total_row, 1, "Total", &total_text)?;
    sheet.write_number_with_format(total_row, 2, num(ledger.total.income), &total_money)?;
    sheet.write_number_with_format(total_row, 3, num(ledger.total.outcome), &total_money)?;
    sheet.write_number_with_format(total_row, 4, num(ledger.total.balance()), &total_money)?;
    sheet.write_blank(total_row, 5, &total_text)?;

    Ok(wb.save_to_buffer()?)
}
