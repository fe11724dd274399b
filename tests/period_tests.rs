// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use branchbook::error::ReportError;
use branchbook::models::BranchRecord;
use branchbook::periods::{bucketize, flat, rollup, span_index, spans, Period};
use branchbook::tree::BranchTree;
use common::{date, tx};
use rust_decimal::Decimal;

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

#[test]
fn spans_are_contiguous_and_end_on_range_end() {
    for months in [1, 2, 3, 5, 12] {
        let period = Period::months(months).unwrap();
        let s = spans(date("2023-03-17"), date("2024-08-09"), period).unwrap();
        assert_eq!(s.first().unwrap().start, date("2023-03-17"));
        assert_eq!(s.last().unwrap().end, date("2024-08-09"));
        for pair in s.windows(2) {
            assert_eq!(pair[0].end.succ_opt().unwrap(), pair[1].start);
            assert!(pair[0].start <= pair[0].end);
        }
    }
}

#[test]
fn quarterly_spans_end_on_month_ends() {
    let s = spans(date("2024-01-10"), date("2024-07-15"), Period::months(3).unwrap()).unwrap();
    let ends: Vec<_> = s.iter().map(|x| x.end.to_string()).collect();
    assert_eq!(ends, vec!["2024-03-31", "2024-06-30", "2024-07-15"]);
    assert_eq!(s[1].start, date("2024-04-01"));
}

#[test]
fn single_day_range_is_one_span() {
    let s = spans(date("2024-05-05"), date("2024-05-05"), Period::months(1).unwrap()).unwrap();
    assert_eq!(s.len(), 1);
    assert_eq!(s[0].start, s[0].end);
}

#[test]
fn rejects_bad_period_and_reversed_range() {
    assert!(matches!(Period::months(0), Err(ReportError::InvalidPeriod(0))));
    let err = spans(date("2024-02-01"), date("2024-01-01"), Period::months(1).unwrap()).unwrap_err();
    assert!(matches!(err, ReportError::EmptyRange { .. }));
}

#[test]
fn end_date_belongs_to_its_own_bucket() {
    let s = spans(date("2024-01-01"), date("2024-03-31"), Period::months(1).unwrap()).unwrap();
    assert_eq!(span_index(&s, date("2024-01-31")), Some(0));
    assert_eq!(span_index(&s, date("2024-02-01")), Some(1));
    assert_eq!(span_index(&s, date("2024-02-29")), Some(1));
    assert_eq!(span_index(&s, date("2024-04-01")), None);
    assert_eq!(span_index(&s, date("2023-12-31")), None);
}

#[test]
fn january_february_scenario() {
    let txs = vec![
        tx(1, "Home", "2024-01-15", 100),
        tx(2, "Home", "2024-02-10", -40),
    ];
    let b = bucketize(&txs, date("2024-01-01"), date("2024-02-29"), Period::months(1).unwrap()).unwrap();
    assert_eq!(b.buckets.len(), 2);

    let jan = &b.buckets[0];
    assert_eq!((jan.start, jan.end), (date("2024-01-01"), date("2024-01-31")));
    assert_eq!((jan.income, jan.outcome, jan.balance), (d(100), d(0), d(100)));

    let feb = &b.buckets[1];
    assert_eq!((feb.start, feb.end), (date("2024-02-01"), date("2024-02-29")));
    assert_eq!((feb.income, feb.outcome, feb.balance), (d(0), d(40), d(60)));

    assert_eq!(b.totals.balance(), d(60));
    assert_eq!(b.dropped, 0);
}

#[test]
fn unsorted_input_lands_in_the_right_buckets() {
    let txs = vec![
        tx(3, "Home", "2024-03-02", 7),
        tx(1, "Home", "2024-01-31", 5),
        tx(4, "Home", "2024-05-01", 9),
        tx(2, "Home", "2024-01-01", 3),
    ];
    let b = bucketize(&txs, date("2024-01-01"), date("2024-03-31"), Period::months(1).unwrap()).unwrap();
    let tids: Vec<Vec<i64>> = b
        .buckets
        .iter()
        .map(|x| x.transactions.iter().map(|t| t.tid).collect())
        .collect();
    assert_eq!(tids, vec![vec![2, 1], vec![], vec![3]]);
    assert_eq!(b.dropped, 1);
    assert_eq!(b.totals.income, d(15));
}

fn tree() -> BranchTree {
    let recs: Vec<BranchRecord> = [
        ("Home", 1),
        ("Home/Food", 2),
        ("Home/Food/Groceries", 3),
        ("Home/Car", 4),
    ]
    .iter()
    .map(|(p, b)| BranchRecord {
        path: p.to_string(),
        bid: *b,
    })
    .collect();
    BranchTree::from_records(&recs).unwrap()
}

#[test]
fn rollup_root_equals_bucket_totals() {
    let txs = vec![
        tx(1, "Home/Food/Groceries", "2024-01-03", -30),
        tx(2, "Home/Food", "2024-01-20", -10),
        tx(3, "Home/Car", "2024-02-11", -50),
        tx(4, "Home", "2024-02-12", 500),
    ];
    let (begin, end) = (date("2024-01-01"), date("2024-02-29"));
    let period = Period::months(1).unwrap();
    let r = rollup(&tree(), "Home", &txs, begin, end, period).unwrap();
    let b = bucketize(&txs, begin, end, period).unwrap();

    assert_eq!(r.rows[0].path, "Home");
    for (i, bucket) in b.buckets.iter().enumerate() {
        assert_eq!(r.rows[0].cells[i].income, bucket.income);
        assert_eq!(r.rows[0].cells[i].outcome, bucket.outcome);
    }
    let food = r.rows.iter().find(|x| x.path == "Home/Food").unwrap();
    assert_eq!(food.cells[0].outcome, d(40));
    assert_eq!(food.depth, 1);
    assert_eq!(r.skipped, 0);
}

#[test]
fn rollup_below_root_skips_outsiders() {
    let txs = vec![
        tx(1, "Home/Food/Groceries", "2024-01-03", -30),
        tx(2, "Home/Car", "2024-01-04", -50),
    ];
    let r = rollup(
        &tree(),
        "Home/Food",
        &txs,
        date("2024-01-01"),
        date("2024-01-31"),
        Period::months(1).unwrap(),
    )
    .unwrap();
    assert_eq!(r.rows.len(), 2);
    assert_eq!(r.rows[0].total().outcome, d(30));
    assert_eq!(r.skipped, 1);
}

#[test]
fn flat_does_not_propagate() {
    let txs = vec![tx(1, "Home/Food/Groceries", "2024-01-03", -30)];
    let r = flat(
        &tree(),
        "Home",
        &txs,
        date("2024-01-01"),
        date("2024-01-31"),
        Period::months(1).unwrap(),
    )
    .unwrap();
    let home = &r.rows[0];
    assert_eq!(home.cells[0].outcome, d(0));
    let groceries = r.rows.iter().find(|x| x.path == "Home/Food/Groceries").unwrap();
    assert_eq!(groceries.cells[0].outcome, d(30));
}

#[test]
fn unknown_root_is_an_error() {
    let txs = vec![tx(1, "Home", "2024-01-03", 1)];
    let err = rollup(
        &tree(),
        "Home/Boat",
        &txs,
        date("2024-01-01"),
        date("2024-01-31"),
        Period::months(1).unwrap(),
    )
    .unwrap_err();
    assert!(matches!(err, ReportError::UnknownBranch(p) if p == "Home/Boat"));
}
