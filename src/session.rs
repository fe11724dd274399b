// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::SignIn;
use crate::utils::{clear_settings, get_setting, set_setting};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

const SESSION_PREFIX: &str = "session.";
const SIGNUP_PREFIX: &str = "signup.";

/// Who is signed in against which backend. Handed to every command that
/// talks to the server instead of being read from global state.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

impl Session {
    pub fn anonymous(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            email: None,
            username: None,
        }
    }

    pub fn load(conn: &Connection, cfg: &Config) -> Result<Self> {
        Ok(Self {
            base_url: cfg.base_url.clone(),
            token: get_setting(conn, "session.token")?,
            email: get_setting(conn, "session.email")?,
            username: get_setting(conn, "session.username")?,
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn store(conn: &Connection, base_url: &str, signin: &SignIn) -> Result<Self> {
        set_setting(conn, "session.token", &signin.access_token)?;
        set_setting(conn, "session.email", &signin.email)?;
        set_setting(conn, "session.username", &signin.username)?;
        Ok(Self {
            base_url: base_url.to_string(),
            token: Some(signin.access_token.clone()),
            email: Some(signin.email.clone()),
            username: Some(signin.username.clone()),
        })
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        clear_settings(conn, SESSION_PREFIX)
    }
}

/// Progress of the email-verified sign-up, kept between invocations.
/// The password is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignupDraft {
    pub email: Option<String>,
    pub name: Option<String>,
    pub code_sent: bool,
    pub verified: bool,
}

impl SignupDraft {
    pub fn load(conn: &Connection) -> Result<Self> {
        let flag = |k: &str| -> Result<bool> { Ok(get_setting(conn, k)?.as_deref() == Some("1")) };
        Ok(Self {
            email: get_setting(conn, "signup.email")?,
            name: get_setting(conn, "signup.name")?,
            code_sent: flag("signup.code_sent")?,
            verified: flag("signup.verified")?,
        })
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        clear_settings(conn, SIGNUP_PREFIX)?;
        if let Some(e) = &self.email {
            set_setting(conn, "signup.email", e)?;
        }
        if let Some(n) = &self.name {
            set_setting(conn, "signup.name", n)?;
        }
        set_setting(conn, "signup.code_sent", if self.code_sent { "1" } else { "0" })?;
        set_setting(conn, "signup.verified", if self.verified { "1" } else { "0" })?;
        Ok(())
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        clear_settings(conn, SIGNUP_PREFIX)
    }
}
