// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::ApiClient;
use crate::error::ApiError;
use crate::ledger;
use crate::models::{Transaction, TransactionDraft, TransactionRecord};
use crate::tree::ROOT;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::blocking::multipart::Form;
use reqwest::Method;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;

pub const OPEN_BEGIN: &str = "0001-01-01";
pub const OPEN_END: &str = "9999-12-31";

/// Query for `/db/refer-daily-transaction`; unset fields widen to the
/// whole ledger.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub branch: Option<String>,
    pub begin: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl TransactionQuery {
    fn pairs(&self) -> [(&'static str, String); 3] {
        [
            ("branch", self.branch.clone().unwrap_or_else(|| ROOT.to_string())),
            (
                "begin_date",
                self.begin.map(|d| d.to_string()).unwrap_or_else(|| OPEN_BEGIN.into()),
            ),
            (
                "end_date",
                self.end.map(|d| d.to_string()).unwrap_or_else(|| OPEN_END.into()),
            ),
        ]
    }
}

impl ApiClient {
    pub fn refer_daily_records(&self, q: &TransactionQuery) -> Result<Vec<TransactionRecord>, ApiError> {
        Self::json(
            self.authed(Method::GET, "/db/refer-daily-transaction")?
                .query(&q.pairs()),
        )
    }

    /// Fetch and attach running balances in response order.
    pub fn refer_daily(&self, q: &TransactionQuery) -> Result<Vec<Transaction>, ApiError> {
        let records = self.refer_daily_records(q)?;
        info!("fetched {} transactions", records.len());
        Ok(ledger::from_records(records))
    }

    pub fn upload_transaction(
        &self,
        date: NaiveDate,
        branch: &str,
        cash_flow: Decimal,
        description: &str,
        receipt: Option<&Path>,
    ) -> Result<serde_json::Value, ApiError> {
        let mut form = Form::new()
            .text("t_date", date.to_string())
            .text("branch", branch.to_string())
            .text("cashflow", cash_flow.to_string())
            .text("description", description.to_string());
        if let Some(p) = receipt {
            form = form.file("receipt", p)?;
        }
        Self::json(self.authed(Method::POST, "/db/upload-transaction")?.multipart(form))
    }

    /// Only the fields set on `draft` are sent.
    pub fn modify_transaction(
        &self,
        tid: i64,
        draft: &TransactionDraft,
    ) -> Result<serde_json::Value, ApiError> {
        let mut form = Form::new().text("tid", tid.to_string());
        if let Some(d) = draft.date {
            form = form.text("t_date", d.to_string());
        }
        if let Some(b) = &draft.branch {
            form = form.text("branch", b.clone());
        }
        if let Some(c) = draft.cash_flow {
            form = form.text("cashflow", c.to_string());
        }
        if let Some(d) = &draft.description {
            form = form.text("description", d.clone());
        }
        if let Some(p) = &draft.receipt {
            form = form.file("receipt", p)?;
        }
        Self::json(self.authed(Method::PUT, "/db/modify-transaction")?.multipart(form))
    }

    pub fn delete_transaction(&self, tid: i64) -> Result<(), ApiError> {
        Self::unit(
            self.authed(Method::DELETE, "/db/delete-transaction")?
                .query(&[("tid", tid)]),
        )
    }

    /// URL of the stored receipt image.
    pub fn get_receipt(&self, tid: i64) -> Result<String, ApiError> {
        Self::json(
            self.authed(Method::GET, "/db/get-receipt")?
                .query(&[("tid", tid)]),
        )
    }

    /// tid → URL for every requested transaction that has a receipt.
    pub fn get_receipt_multiple(&self, tids: &[i64]) -> Result<HashMap<i64, String>, ApiError> {
        if tids.is_empty() {
            return Ok(HashMap::new());
        }
        let query: Vec<(&str, i64)> = tids.iter().map(|t| ("tid_list", *t)).collect();
        let raw: HashMap<String, Option<String>> = Self::json(
            self.authed(Method::GET, "/db/get-receipt-multiple")?
                .query(&query),
        )?;
        let mut out = HashMap::with_capacity(raw.len());
        for (k, v) in raw {
            match (k.parse::<i64>(), v) {
                (Ok(tid), Some(url)) if !url.is_empty() => {
                    out.insert(tid, url);
                }
                (Err(_), _) => warn!("ignoring receipt entry with key '{}'", k),
                _ => {}
            }
        }
        Ok(out)
    }

    /// Download every receipt image for `tids`. Individual failures are
    /// logged and left out; the PDF marks those slots as missing.
    pub fn fetch_receipts(&self, tids: &[i64]) -> Result<HashMap<i64, Vec<u8>>, ApiError> {
        let urls = self.get_receipt_multiple(tids)?;
        let mut images = HashMap::with_capacity(urls.len());
        for (tid, url) in urls {
            match self.fetch_bytes(&url) {
                Ok(bytes) => {
                    images.insert(tid, bytes);
                }
                Err(e) => warn!("receipt for transaction {} unavailable: {}", tid, e),
            }
        }
        Ok(images)
    }
}
