// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod branch;
pub mod exporter;
pub mod report;
pub mod settings;
pub mod transactions;
pub mod user;

use crate::api::transaction::TransactionQuery;
use crate::api::ApiClient;
use crate::config::Config;
use crate::session::Session;
use crate::utils::parse_date;
use anyhow::{Context, Result};
use rusqlite::Connection;

/// Everything a handler needs: the settings store, resolved configuration
/// and the current session.
pub struct Ctx<'a> {
    pub conn: &'a Connection,
    pub config: Config,
    pub session: Session,
}

impl<'a> Ctx<'a> {
    pub fn new(conn: &'a Connection, config: Config, session: Session) -> Self {
        Self {
            conn,
            config,
            session,
        }
    }

    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.session).context("Invalid backend configuration")
    }
}

/// `--branch/--from/--to` as a backend query.
pub(crate) fn range_query(sub: &clap::ArgMatches) -> Result<TransactionQuery> {
    let date = |k: &str| -> Result<_> {
        sub.get_one::<String>(k).map(|s| parse_date(s)).transpose()
    };
    Ok(TransactionQuery {
        branch: sub.get_one::<String>("branch").cloned(),
        begin: date("from")?,
        end: date("to")?,
    })
}
