// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Splits a date range into whole-month periods and aggregates
//! transactions into them, optionally rolled up a branch subtree.

use crate::error::ReportError;
use crate::ledger::Flow;
use crate::models::Transaction;
use crate::tree::{ancestors_within, depth, is_within, BranchTree};
use crate::utils::{first_of_next_month, span_end};
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period(u32);

impl Period {
    pub fn months(n: u32) -> Result<Self, ReportError> {
        if n == 0 {
            return Err(ReportError::InvalidPeriod(n));
        }
        Ok(Self(n))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Span {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodBucket<'a> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub transactions: Vec<&'a Transaction>,
    pub income: Decimal,
    pub outcome: Decimal,
    /// Income minus outcome accumulated from `begin` through `end`.
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bucketed<'a> {
    pub buckets: Vec<PeriodBucket<'a>>,
    pub totals: Flow,
    /// Transactions dated outside the report range.
    pub dropped: usize,
}

/// Consecutive spans covering `[begin, end]`. The first starts at `begin`;
/// each ends on the last day of its `period`-month span, the final one on
/// `end`.
pub fn spans(begin: NaiveDate, end: NaiveDate, period: Period) -> Result<Vec<Span>, ReportError> {
    if begin > end {
        return Err(ReportError::EmptyRange { begin, end });
    }
    let mut out = Vec::new();
    let mut front = begin;
    loop {
        let back = span_end(front, period.get()).map_or(end, |b| b.min(end));
        out.push(Span { start: front, end: back });
        if back >= end {
            break;
        }
        match first_of_next_month(back) {
            Some(next) => front = next,
            None => break,
        }
    }
    Ok(out)
}

/// Index of the span holding `date`, by binary search on end dates.
pub fn span_index(spans: &[Span], date: NaiveDate) -> Option<usize> {
    let first = spans.first()?;
    let last = spans.last()?;
    if date < first.start || date > last.end {
        return None;
    }
    Some(spans.partition_point(|s| s.end < date))
}

/// Input order does not matter: transactions are placed by date, and kept
/// chronological (stable for equal dates) inside each bucket.
pub fn bucketize<'a>(
    txs: &'a [Transaction],
    begin: NaiveDate,
    end: NaiveDate,
    period: Period,
) -> Result<Bucketed<'a>, ReportError> {
    let spans = spans(begin, end, period)?;
    let mut buckets: Vec<PeriodBucket<'a>> = spans
        .iter()
        .map(|s| PeriodBucket {
            start: s.start,
            end: s.end,
            transactions: Vec::new(),
            income: Decimal::ZERO,
            outcome: Decimal::ZERO,
            balance: Decimal::ZERO,
        })
        .collect();

    let mut sorted: Vec<&'a Transaction> = txs.iter().collect();
    sorted.sort_by_key(|t| t.date);

    let mut totals = Flow::default();
    let mut dropped = 0;
    for t in sorted {
        match span_index(&spans, t.date) {
            Some(i) => {
                let b = &mut buckets[i];
                b.income += t.income();
                b.outcome += t.outcome();
                b.transactions.push(t);
                totals.add(t);
            }
            None => {
                debug!("tid {} on {} is outside {}..{}", t.tid, t.date, begin, end);
                dropped += 1;
            }
        }
    }

    let mut running = Decimal::ZERO;
    for b in &mut buckets {
        running += b.income - b.outcome;
        b.balance = running;
    }

    Ok(Bucketed {
        buckets,
        totals,
        dropped,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct RollupRow {
    pub path: String,
    pub depth: usize,
    /// One entry per span.
    pub cells: Vec<Flow>,
}

impl RollupRow {
    pub fn total(&self) -> Flow {
        let mut f = Flow::default();
        for c in &self.cells {
            f.income += c.income;
            f.outcome += c.outcome;
        }
        f
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Rollup {
    pub root: String,
    pub spans: Vec<Span>,
    /// Subtree in pre-order; the first row is the root.
    pub rows: Vec<RollupRow>,
    /// In-range transactions booked outside the root's subtree.
    pub skipped: usize,
}

/// Each transaction counts toward its own branch and every ancestor up to
/// `root`, so the root row totals the whole subtree.
pub fn rollup(
    tree: &BranchTree,
    root: &str,
    txs: &[Transaction],
    begin: NaiveDate,
    end: NaiveDate,
    period: Period,
) -> Result<Rollup, ReportError> {
    aggregate(tree, root, txs, begin, end, period, true)
}

/// Per-branch figures without propagation to ancestors.
pub fn flat(
    tree: &BranchTree,
    root: &str,
    txs: &[Transaction],
    begin: NaiveDate,
    end: NaiveDate,
    period: Period,
) -> Result<Rollup, ReportError> {
    aggregate(tree, root, txs, begin, end, period, false)
}

fn aggregate(
    tree: &BranchTree,
    root: &str,
    txs: &[Transaction],
    begin: NaiveDate,
    end: NaiveDate,
    period: Period,
    propagate: bool,
) -> Result<Rollup, ReportError> {
    if !tree.contains(root) {
        return Err(ReportError::UnknownBranch(root.to_string()));
    }
    let spans = spans(begin, end, period)?;
    let paths = tree.subtree_paths(root);
    let index: HashMap<&str, usize> = paths
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_str(), i))
        .collect();
    let mut rows: Vec<RollupRow> = paths
        .iter()
        .map(|p| RollupRow {
            path: p.clone(),
            depth: depth(p),
            cells: vec![Flow::default(); spans.len()],
        })
        .collect();

    let mut skipped = 0;
    for t in txs {
        let Some(col) = span_index(&spans, t.date) else {
            continue;
        };
        if !is_within(&t.branch, root) {
            warn!("tid {} on '{}' is outside '{}'", t.tid, t.branch, root);
            skipped += 1;
            continue;
        }
        let mut targets = vec![t.branch.as_str()];
        if propagate {
            targets.extend(ancestors_within(&t.branch, root));
        }
        for path in targets {
            match index.get(path) {
                Some(&row) => rows[row].cells[col].add(t),
                None => debug!("branch '{}' missing from tree", path),
            }
        }
    }

    Ok(Rollup {
        root: root.to_string(),
        spans,
        rows,
        skipped,
    })
}
