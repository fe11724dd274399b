// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::get_setting;
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub const KEY_BASE_URL: &str = "base_url";
pub const KEY_OUT_DIR: &str = "out_dir";
pub const KEY_PAGE_SIZE: &str = "page_size";
pub const KEY_FONT_PATH: &str = "font_path";

pub const ENV_BASE_URL: &str = "BRANCHBOOK_URL";
pub const ENV_OUT_DIR: &str = "BRANCHBOOK_OUT_DIR";

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub base_url: String,
    pub out_dir: PathBuf,
    pub page_size: usize,
    /// TrueType font for PDF text; builtin Helvetica when unset.
    pub font_path: Option<PathBuf>,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub url: Option<String>,
    pub out_dir: Option<String>,
}

impl Overrides {
    pub fn from_matches(m: &clap::ArgMatches) -> Self {
        Self {
            url: m.get_one::<String>("url").cloned(),
            out_dir: m.get_one::<String>("out-dir").cloned(),
        }
    }
}

impl Config {
    pub fn resolve(conn: &Connection, overrides: &Overrides) -> Result<Self> {
        Self::resolve_with(conn, overrides, |k| std::env::var(k).ok())
    }

    /// Flag > environment > stored setting > default.
    pub fn resolve_with<F>(conn: &Connection, overrides: &Overrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match overrides.url.clone().or_else(|| env(ENV_BASE_URL)) {
            Some(u) => u,
            None => get_setting(conn, KEY_BASE_URL)?.unwrap_or_else(|| DEFAULT_BASE_URL.into()),
        };
        let out_dir = match overrides.out_dir.clone().or_else(|| env(ENV_OUT_DIR)) {
            Some(d) => d,
            None => get_setting(conn, KEY_OUT_DIR)?.unwrap_or_else(|| ".".into()),
        };
        let page_size = match get_setting(conn, KEY_PAGE_SIZE)? {
            Some(s) => s
                .parse::<usize>()
                .with_context(|| format!("Invalid stored page size '{}'", s))?,
            None => DEFAULT_PAGE_SIZE,
        };
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            out_dir: PathBuf::from(out_dir),
            page_size: page_size.max(1),
            font_path: get_setting(conn, KEY_FONT_PATH)?.map(PathBuf::from),
        })
    }
}

