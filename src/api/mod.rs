// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the ledger backend. One request per call, no
//! retries; the only bound on a slow server is the HTTP client timeout.

pub mod branch;
pub mod transaction;
pub mod user;

use crate::error::ApiError;
use crate::session::Session;
use crate::utils::http_client;
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Most endpoints wrap their payload in `{"message": ...}`; some do not.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { message: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { message } => message,
            Envelope::Bare(v) => v,
        }
    }
}

pub struct ApiClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(session: &Session) -> Result<Self, ApiError> {
        let base = Url::parse(&session.base_url)
            .map_err(|_| ApiError::InvalidUrl(session.base_url.clone()))?;
        Ok(Self {
            http: http_client()?,
            base,
            token: session.token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}{}", self.base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|_| ApiError::InvalidUrl(joined))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        debug!("{} {}", method, path);
        let url = self.url(path)?;
        let rb = self.http.request(method, url);
        Ok(match &self.token {
            Some(t) => rb.bearer_auth(t),
            None => rb,
        })
    }

    /// Same as `request` but refuses to go out without a session token.
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        if self.token.as_deref().is_none_or(str::is_empty) {
            return Err(ApiError::NotLoggedIn);
        }
        self.request(method, path)
    }

    fn send(rb: RequestBuilder) -> Result<Response, ApiError> {
        let resp = rb.send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().unwrap_or_default();
        let detail = error_detail(&text)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "request failed".to_string());
        warn!("HTTP {}: {}", status.as_u16(), detail);
        Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    fn json<T: DeserializeOwned>(rb: RequestBuilder) -> Result<T, ApiError> {
        let text = Self::send(rb)?.text()?;
        let env: Envelope<T> = serde_json::from_str(&text)?;
        Ok(env.into_inner())
    }

    fn unit(rb: RequestBuilder) -> Result<(), ApiError> {
        Self::send(rb)?;
        Ok(())
    }

    /// Raw GET of an absolute URL, e.g. a receipt image link.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        debug!("GET {}", url);
        let resp = Self::send(self.http.get(url))?;
        Ok(resp.bytes()?.to_vec())
    }

    /// Backend liveness check.
    pub fn ping(&self) -> Result<serde_json::Value, ApiError> {
        Self::json(self.request(Method::GET, "/")?)
    }
}

/// The backend reports failures as `{"detail": ...}`; shown verbatim.
pub fn error_detail(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    match v.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
