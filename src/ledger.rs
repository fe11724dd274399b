// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! View-model transactions built from one backend fetch, plus the
//! filtering, paging and summary helpers the reports and tables share.

use crate::models::{Transaction, TransactionRecord};
use crate::tree::is_within;
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bucket name for transactions booked directly on the summarised branch.
pub const OWN_BRANCH: &str = "Extra";
pub const OUTSIDE_BRANCH: &str = "Unknown";
pub const PAGE_WINDOW: usize = 5;

/// Balance restarts at zero for every fetch and follows response order.
pub fn from_records(records: Vec<TransactionRecord>) -> Vec<Transaction> {
    let mut balance = Decimal::ZERO;
    records
        .into_iter()
        .map(|r| {
            balance += r.cashflow;
            Transaction {
                tid: r.tid,
                branch: r.branch,
                date: r.t_date,
                cash_flow: r.cashflow,
                balance,
                receipt: r.receipt.filter(|s| !s.is_empty()),
                description: r.description.unwrap_or_default(),
            }
        })
        .collect()
}

pub fn filter_range(txs: &[Transaction], begin: NaiveDate, end: NaiveDate) -> Vec<&Transaction> {
    txs.iter().filter(|t| begin <= t.date && t.date <= end).collect()
}

/// Earliest and latest transaction dates; the default report range.
pub fn date_bounds(txs: &[Transaction]) -> Option<(NaiveDate, NaiveDate)> {
    let min = txs.iter().map(|t| t.date).min()?;
    let max = txs.iter().map(|t| t.date).max()?;
    Some((min, max))
}

#[derive(Debug, Serialize)]
pub struct Page<'a> {
    pub number: usize,
    pub total_pages: usize,
    pub items: &'a [Transaction],
    /// First and last page number of the navigation group holding `number`.
    pub window: (usize, usize),
}

/// 1-based paging. Out-of-range page numbers yield an empty slice.
pub fn paginate(txs: &[Transaction], page: usize, per_page: usize) -> Page<'_> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_pages = txs.len().div_ceil(per_page);
    let start = ((page - 1) * per_page).min(txs.len());
    let end = (start + per_page).min(txs.len());
    Page {
        number: page,
        total_pages,
        items: &txs[start..end],
        window: page_window(page, total_pages),
    }
}

pub fn page_window(page: usize, total_pages: usize) -> (usize, usize) {
    if total_pages == 0 {
        return (0, 0);
    }
    let group = (page.max(1) - 1) / PAGE_WINDOW;
    let first = group * PAGE_WINDOW + 1;
    let last = (first + PAGE_WINDOW - 1).min(total_pages);
    (first.min(total_pages), last)
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Flow {
    pub income: Decimal,
    pub outcome: Decimal,
}

impl Flow {
    pub fn add(&mut self, t: &Transaction) {
        self.income += t.income();
        self.outcome += t.outcome();
    }

    pub fn balance(&self) -> Decimal {
        self.income - self.outcome
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthFlow {
    /// `YYYY-MM`
    pub month: String,
    pub income: Decimal,
    pub outcome: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total: Flow,
    /// Keyed by the first path segment below the summarised branch.
    pub children: BTreeMap<String, Flow>,
    /// Twelve calendar months ending with `end`'s month, oldest first.
    pub months: Vec<MonthFlow>,
}

pub fn summarize(txs: &[Transaction], branch: &str, begin: NaiveDate, end: NaiveDate) -> Summary {
    let mut total = Flow::default();
    let mut children: BTreeMap<String, Flow> = BTreeMap::new();
    let mut monthly: BTreeMap<String, Flow> = BTreeMap::new();

    for t in filter_range(txs, begin, end) {
        total.add(t);
        children.entry(child_key(&t.branch, branch)).or_default().add(t);
        monthly
            .entry(t.date.format("%Y-%m").to_string())
            .or_default()
            .add(t);
    }

    let mut months = Vec::with_capacity(12);
    let mut cursor = NaiveDate::from_ymd_opt(end.year(), end.month(), 1).unwrap_or(end);
    for _ in 0..12 {
        let key = cursor.format("%Y-%m").to_string();
        let flow = monthly.get(&key).cloned().unwrap_or_default();
        months.push(MonthFlow {
            month: key,
            income: flow.income,
            outcome: flow.outcome,
            balance: flow.balance(),
        });
        match cursor.checked_sub_months(Months::new(1)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    months.reverse();

    Summary {
        total,
        children,
        months,
    }
}

fn child_key(tx_branch: &str, branch: &str) -> String {
    if tx_branch == branch {
        return OWN_BRANCH.to_string();
    }
    if !is_within(tx_branch, branch) {
        return OUTSIDE_BRANCH.to_string();
    }
    tx_branch[branch.len() + 1..]
        .split('/')
        .next()
        .unwrap_or(OUTSIDE_BRANCH)
        .to_string()
}
