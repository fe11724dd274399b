// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::ApiClient;
use crate::error::ApiError;
use crate::models::BranchRecord;
use crate::tree::BranchTree;
use log::info;
use reqwest::Method;
use serde_json::json;

impl ApiClient {
    pub fn get_tree_records(&self) -> Result<Vec<BranchRecord>, ApiError> {
        Self::json(self.authed(Method::GET, "/db/get-tree")?)
    }

    /// Fetch and build the tree. Callers decide whether to fall back.
    pub fn get_tree(&self) -> Result<BranchTree, ApiError> {
        let records = self.get_tree_records()?;
        let tree = BranchTree::from_records(&records)?;
        info!("loaded {} branches", tree.len());
        Ok(tree)
    }

    pub fn create_branch(&self, parent: &str, child: &str) -> Result<(), ApiError> {
        let body = json!({ "parent": parent, "child": child });
        Self::unit(self.authed(Method::POST, "/db/create-branch")?.json(&body))
    }

    pub fn delete_branch(&self, branch: &str) -> Result<(), ApiError> {
        Self::unit(
            self.authed(Method::DELETE, "/db/delete-branch")?
                .query(&[("branch", branch)]),
        )
    }
}
