// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{cell_format, depth_color, ensure_any, header_format, num, number_format};
use crate::error::ReportError;
use crate::ledger::Flow;
use crate::models::Transaction;
use crate::periods::{flat, rollup, Period, Rollup};
use crate::tree::BranchTree;
use chrono::NaiveDate;
use rust_xlsxwriter::{Color, FormatAlign, Workbook, Worksheet};

pub const DEFAULT_MAX_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeLayout {
    /// "Income" and "Outcome" sheets; every branch includes its descendants.
    #[default]
    Rollup,
    /// One "Tree Transactions" sheet; each branch counts only its own entries.
    Flat,
}

#[allow(clippy::too_many_arguments)]
pub fn render(
    tree: &BranchTree,
    root: &str,
    txs: &[Transaction],
    begin: NaiveDate,
    end: NaiveDate,
    period: Period,
    layout: TreeLayout,
    max_depth: usize,
) -> Result<Vec<u8>, ReportError> {
    ensure_any(txs)?;
    let mut wb = Workbook::new();
    match layout {
        TreeLayout::Rollup => {
            let data = rollup(tree, root, txs, begin, end, period)?;
            wb.push_worksheet(flow_sheet(&data, "Income", max_depth, |f| f.income)?);
            wb.push_worksheet(flow_sheet(&data, "Outcome", max_depth, |f| f.outcome)?);
        }
        TreeLayout::Flat => {
            let data = flat(tree, root, txs, begin, end, period)?;
            wb.push_worksheet(flat_sheet(&data)?);
        }
    }
    Ok(wb.save_to_buffer()?)
}

fn short_date(d: NaiveDate) -> String {
    d.format("%y.%m.%d").to_string()
}

fn flow_sheet<F>(
    data: &Rollup,
    name: &str,
    max_depth: usize,
    pick: F,
) -> Result<Worksheet, ReportError>
where
    F: Fn(&Flow) -> rust_decimal::Decimal,
{
    let mut sheet = Worksheet::new();
    sheet.set_name(name)?;
    sheet.set_freeze_panes(0, 1)?;

    let head = header_format();
    let small = cell_format().set_font_size(8.0);
    let small_num = number_format().set_font_size(8.0);
    let small_bold_num = small_num.clone().set_bold();

    sheet.merge_range(0, 0, 1, 0, "Branch", &head)?;
    let mut col: u16 = 1;
    for (i, span) in data.spans.iter().enumerate() {
        sheet.merge_range(0, col, 0, col + 1, &format!("Period {}", i + 1), &head)?;
        sheet.write_string_with_format(1, col, short_date(span.start), &small)?;
        sheet.write_string_with_format(1, col + 1, short_date(span.end), &small)?;
        col += 2;
    }
    let total_col = col;
    sheet.merge_range(0, total_col, 1, total_col, "Total", &head)?;

    for (i, row) in data.rows.iter().enumerate() {
        let r = (i + 2) as u32;
        let shade = cell_format()
            .set_bold()
            .set_font_size(8.0)
            .set_align(FormatAlign::Left)
            .set_background_color(Color::RGB(depth_color(row.depth, max_depth)));
        sheet.write_string_with_format(r, 0, &row.path, &shade)?;

        let mut c: u16 = 1;
        for cell in &row.cells {
            sheet.merge_range(r, c, r, c + 1, "", &small_num)?;
            sheet.write_number_with_format(r, c, num(pick(cell)), &small_num)?;
            c += 2;
        }
        sheet.write_number_with_format(r, total_col, num(pick(&row.total())), &small_bold_num)?;
    }

    sheet.set_column_width(0, 30)?;
    for c in 1..=total_col {
        sheet.set_column_width(c, 9)?;
    }
    Ok(sheet)
}

fn flat_sheet(data: &Rollup) -> Result<Worksheet, ReportError> {
    let mut sheet = Worksheet::new();
    sheet.set_name("Tree Transactions")?;

    let head = header_format();
    for (c, (title, width)) in [
        ("Branch", 30),
        ("Start Date", 15),
        ("End Date", 15),
        ("Income", 15),
        ("Outcome", 15),
    ]
    .iter()
    .enumerate()
    {
        sheet.write_string_with_format(0, c as u16, *title, &head)?;
        sheet.set_column_width(c as u16, *width)?;
    }

    let text = cell_format();
    let money = number_format();
    let mut r: u32 = 1;
    for row in &data.rows {
        for (span, cell) in data.spans.iter().zip(&row.cells) {
            sheet.write_string_with_format(r, 0, &row.path, &text)?;
            sheet.write_string_with_format(r, 1, span.start.to_string(), &text)?;
            sheet.write_string_with_format(r, 2, span.end.to_string(), &text)?;
            sheet.write_number_with_format(r, 3, num(cell.income), &money)?;
            sheet.write_number_with_format(r, 4, num(cell.outcome), &money)?;
            r += 1;
        }
    }
    Ok(sheet)
}
