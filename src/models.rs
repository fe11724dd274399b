// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// One row of `/db/get-tree`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRecord {
    pub path: String,
    pub bid: i64,
}

/// One row of `/db/refer-daily-transaction` as the backend sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub tid: i64,
    pub branch: String,
    #[serde(deserialize_with = "de_date")]
    pub t_date: NaiveDate,
    pub cashflow: Decimal,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub tid: i64,
    pub branch: String,
    pub date: NaiveDate,
    pub cash_flow: Decimal,
    /// Running total over the fetch this transaction came from.
    pub balance: Decimal,
    pub receipt: Option<String>,
    pub description: String,
}

impl Transaction {
    pub fn income(&self) -> Decimal {
        if self.cash_flow > Decimal::ZERO {
            self.cash_flow
        } else {
            Decimal::ZERO
        }
    }

    pub fn outcome(&self) -> Decimal {
        if self.cash_flow < Decimal::ZERO {
            -self.cash_flow
        } else {
            Decimal::ZERO
        }
    }

    pub fn has_receipt(&self) -> bool {
        self.receipt.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// Fields for `/db/upload-transaction` and `/db/modify-transaction`.
/// On modify, `None` leaves the backend value untouched.
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    pub date: Option<NaiveDate>,
    pub branch: Option<String>,
    pub cash_flow: Option<Decimal>,
    pub description: Option<String>,
    pub receipt: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignIn {
    pub access_token: String,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub useai: Option<bool>,
}

// Backend dates sometimes carry a time part; only the calendar day matters.
fn de_date<'de, D>(d: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    let day = s.get(..10).unwrap_or(&s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}
