// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{cell_format, ensure_any, header_format, num, number_format};
use crate::error::ReportError;
use crate::models::Transaction;
use crate::periods::{bucketize, Period};
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;

pub fn render(
    txs: &[Transaction],
    begin: NaiveDate,
    end: NaiveDate,
    period: Period,
) -> Result<Vec<u8>, ReportError> {
    ensure_any(txs)?;
    let bucketed = bucketize(txs, begin, end, period)?;

    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet();
    sheet.set_name("Transactions")?;

    let head = header_format();
    for (c, name) in ["Start Date", "End Date", "Income", "Outcome", "Balance"]
        .iter()
        .enumerate()
    {
        sheet.write_string_with_format(0, c as u16, *name, &head)?;
        sheet.set_column_width(c as u16, 15)?;
    }

    let text = cell_format();
    let money = number_format();
    for (i, b) in bucketed.buckets.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string_with_format(row, 0, b.start.to_string(), &text)?;
        sheet.write_string_with_format(row, 1, b.end.to_string(), &text)?;
        sheet.write_number_with_format(row, 2, num(b.income), &money)?;
        sheet.write_number_with_format(row, 3, num(b.outcome), &money)?;
        sheet.write_number_with_format(row, 4, num(b.balance), &money)?;
    }

    let total_row = (bucketed.buckets.len() + 1) as u32;
    let bold = cell_format().set_bold();
    let bold_money = number_format().set_bold();
    sheet.write_string_with_format(total_row, 0, "Total", &bold)?;
    sheet.write_blank(total_row, 1, &bold)?;
    sheet.write_number_with_format(total_row, 2, num(bucketed.totals.income), &bold_money)?;
    sheet.write_number_with_format(total_row, 3, num(bucketed.totals.outcome), &bold_money)?;
    sheet.write_number_with_format(total_row, 4, num(bucketed.totals.balance()), &bold_money)?;

    Ok(wb.save_to_buffer()?)
}
