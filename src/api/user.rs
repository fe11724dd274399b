// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{SignIn, UserInfo};
use reqwest::blocking::multipart::Form;
use reqwest::Method;
use serde_json::json;

impl ApiClient {
    pub fn send_verify_code(&self, email: &str) -> Result<(), ApiError> {
        Self::unit(
            self.request(Method::POST, "/auth/verify-email")?
                .json(&json!({ "email": email })),
        )
    }

    pub fn check_verify_code(&self, email: &str, code: &str) -> Result<(), ApiError> {
        Self::unit(
            self.request(Method::GET, "/auth/verify-email")?
                .query(&[("email", email), ("code", code)]),
        )
    }

    pub fn signup(&self, email: &str, password: &str, username: &str) -> Result<(), ApiError> {
        Self::unit(self.request(Method::POST, "/auth/signup")?.json(&json!({
            "email": email,
            "password": password,
            "username": username,
        })))
    }

    pub fn signin(&self, email: &str, password: &str) -> Result<SignIn, ApiError> {
        Self::json(
            self.request(Method::POST, "/auth/signin")?
                .json(&json!({ "email": email, "password": password })),
        )
    }

    pub fn signout(&self) -> Result<(), ApiError> {
        Self::unit(self.authed(Method::POST, "/auth/signout")?)
    }

    pub fn forget_password(&self, email: &str) -> Result<(), ApiError> {
        Self::unit(
            self.request(Method::POST, "/auth/forget-password")?
                .json(&json!({ "email": email })),
        )
    }

    pub fn modify_password(&self, password: &str) -> Result<(), ApiError> {
        let form = Form::new().text("password", password.to_string());
        Self::unit(self.authed(Method::PUT, "/auth/modify-password")?.multipart(form))
    }

    pub fn get_user_info(&self) -> Result<UserInfo, ApiError> {
        Self::json(self.authed(Method::GET, "/auth/get-user")?)
    }

    pub fn update_user_info(&self, username: &str, use_ai: bool) -> Result<(), ApiError> {
        let form = Form::new()
            .text("username", username.to_string())
            .text("useai", use_ai.to_string());
        Self::unit(self.authed(Method::PUT, "/auth/update-userinfo")?.multipart(form))
    }

    pub fn delete_account(&self) -> Result<(), ApiError> {
        Self::unit(self.authed(Method::DELETE, "/auth/delete-account")?)
    }
}
