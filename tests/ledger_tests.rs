// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use branchbook::ledger::{
    date_bounds, filter_range, from_records, page_window, paginate, summarize, OUTSIDE_BRANCH,
    OWN_BRANCH,
};
use branchbook::models::TransactionRecord;
use common::{date, tx};
use rust_decimal::Decimal;

#[test]
fn running_balance_follows_response_order() {
    let body = r#"[
        {"tid": 1, "branch": "Home", "t_date": "2024-01-02T00:00:00", "cashflow": 1000, "receipt": "", "description": "salary"},
        {"tid": 2, "branch": "Home/Food", "t_date": "2024-01-01", "cashflow": -250.5, "receipt": null, "description": null},
        {"tid": 3, "branch": "Home/Car", "t_date": "2024-01-05", "cashflow": -100, "receipt": "r/3.png"}
    ]"#;
    let records: Vec<TransactionRecord> = serde_json::from_str(body).unwrap();
    let txs = from_records(records);
    let balances: Vec<String> = txs.iter().map(|t| t.balance.to_string()).collect();
    assert_eq!(balances, vec!["1000", "749.5", "649.5"]);
    assert_eq!(txs[0].date, date("2024-01-02"));
    assert_eq!(txs[0].receipt, None);
    assert!(!txs[1].has_receipt());
    assert!(txs[2].has_receipt());
    assert_eq!(txs[1].description, "");
    assert_eq!(txs[1].outcome().to_string(), "250.5");
    assert_eq!(txs[1].income(), Decimal::ZERO);
}

#[test]
fn range_filter_and_bounds_are_inclusive() {
    let txs = vec![
        tx(1, "Home", "2024-01-01", 1),
        tx(2, "Home", "2024-01-15", 1),
        tx(3, "Home", "2024-02-01", 1),
    ];
    let hits = filter_range(&txs, date("2024-01-01"), date("2024-01-15"));
    assert_eq!(hits.len(), 2);
    assert_eq!(date_bounds(&txs), Some((date("2024-01-01"), date("2024-02-01"))));
    assert_eq!(date_bounds(&[]), None);
}

#[test]
fn pages_of_ten_with_five_page_window() {
    let txs: Vec<_> = (1..=63)
        .map(|i| tx(i, "Home", "2024-01-01", 1))
        .collect();
    let p = paginate(&txs, 1, 10);
    assert_eq!(p.total_pages, 7);
    assert_eq!(p.items.len(), 10);
    assert_eq!(p.window, (1, 5));

    let last = paginate(&txs, 7, 10);
    assert_eq!(last.items.len(), 3);
    assert_eq!(last.items[0].tid, 61);
    assert_eq!(last.window, (6, 7));

    assert!(paginate(&txs, 9, 10).items.is_empty());
    assert_eq!(page_window(5, 12), (1, 5));
    assert_eq!(page_window(11, 12), (11, 12));
    assert_eq!(page_window(1, 0), (0, 0));
}

#[test]
fn summary_groups_by_first_child_segment() {
    let txs = vec![
        tx(1, "Home/Food", "2024-03-01", 300),
        tx(2, "Home/Food/Groceries", "2024-03-04", -40),
        tx(3, "Home/Food/Dining", "2024-02-10", -60),
        tx(4, "Home", "2024-03-05", -5),
        tx(5, "Home/Car", "2024-03-06", -70),
    ];
    let s = summarize(&txs, "Home/Food", date("2024-01-01"), date("2024-03-31"));
    assert_eq!(s.children[OWN_BRANCH].income, Decimal::from(300));
    assert_eq!(s.children["Groceries"].outcome, Decimal::from(40));
    assert_eq!(s.children["Dining"].outcome, Decimal::from(60));
    assert_eq!(s.children[OUTSIDE_BRANCH].outcome, Decimal::from(75));
    assert_eq!(s.total.income, Decimal::from(300));
    assert_eq!(s.total.outcome, Decimal::from(175));

    assert_eq!(s.months.len(), 12);
    assert_eq!(s.months[0].month, "2023-04");
    let march = s.months.last().unwrap();
    assert_eq!(march.month, "2024-03");
    assert_eq!(march.balance, Decimal::from(300 - 40 - 5 - 70));
    assert_eq!(s.months[10].outcome, Decimal::from(60));
}
