// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use thiserror::Error;

/// Failures talking to the ledger backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Login is required.")]
    NotLoggedIn,
    /// Non-2xx response; `detail` is the backend's message, shown verbatim.
    #[error("{detail} (HTTP {status})")]
    Status { status: u16, detail: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backend URL '{0}'")]
    InvalidUrl(String),
    #[error("cannot read receipt file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed branch list: {0}")]
    Tree(#[from] TreeError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("branch list has no 'Home' root")]
    MissingRoot,
    #[error("branch '{0}' is not under 'Home'")]
    OrphanPath(String),
    #[error("branch '{0}' appears more than once")]
    DuplicatePath(String),
    #[error("branch path '{0}' has an empty segment")]
    BadSegment(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No transactions.")]
    NoTransactions,
    #[error("no reporting period between {begin} and {end}")]
    EmptyRange { begin: NaiveDate, end: NaiveDate },
    #[error("period must be at least one month (got {0})")]
    InvalidPeriod(u32),
    #[error("branch '{0}' is not in the tree")]
    UnknownBranch(String),
    #[error("spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("pdf: {0}")]
    Pdf(String),
}
