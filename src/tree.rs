// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Branch hierarchy rebuilt from the backend's flat `{path, bid}` list.
//!
//! Paths are `/`-delimited and always start at [`ROOT`]. The tree is a map
//! keyed by full path; a node is only ever inserted after its parent, so
//! every key's parent prefix is itself a key.

use crate::error::TreeError;
use crate::models::BranchRecord;
use serde::Serialize;
use std::collections::HashMap;

pub const ROOT: &str = "Home";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchNode {
    /// `None` for an intermediate path the backend did not list.
    pub bid: Option<i64>,
    pub path: String,
    pub name: String,
    pub parent_id: Option<i64>,
    /// Child segments in the order the backend listed them.
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTree {
    nodes: HashMap<String, BranchNode>,
}

/// Display form: ids and names only, children nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedBranch {
    pub id: Option<i64>,
    pub name: String,
    pub parent_id: Option<i64>,
    pub children: Vec<NestedBranch>,
}

impl BranchTree {
    pub fn from_records(records: &[BranchRecord]) -> Result<Self, TreeError> {
        let mut bids: HashMap<&str, i64> = HashMap::with_capacity(records.len());
        for r in records {
            if bids.insert(r.path.as_str(), r.bid).is_some() {
                return Err(TreeError::DuplicatePath(r.path.clone()));
            }
        }
        let root_bid = *bids.get(ROOT).ok_or(TreeError::MissingRoot)?;

        let mut tree = Self::with_root(Some(root_bid));
        for r in records {
            let mut segments = r.path.split('/');
            if segments.next() != Some(ROOT) {
                return Err(TreeError::OrphanPath(r.path.clone()));
            }
            let mut cur_path = ROOT.to_string();
            let mut parent_id = Some(root_bid);
            for seg in segments {
                if seg.is_empty() {
                    return Err(TreeError::BadSegment(r.path.clone()));
                }
                let child_path = format!("{}/{}", cur_path, seg);
                let bid = bids.get(child_path.as_str()).copied();
                if !tree.nodes.contains_key(&child_path) {
                    tree.nodes.insert(
                        child_path.clone(),
                        BranchNode {
                            bid,
                            path: child_path.clone(),
                            name: seg.to_string(),
                            parent_id,
                            children: Vec::new(),
                        },
                    );
                    if let Some(parent) = tree.nodes.get_mut(&cur_path) {
                        parent.children.push(seg.to_string());
                    }
                }
                parent_id = bid;
                cur_path = child_path;
            }
        }
        Ok(tree)
    }

    /// Single `Home` node with bid 1, used when the caller chooses to carry
    /// on without the backend's tree.
    pub fn fallback() -> Self {
        Self::with_root(Some(1))
    }

    fn with_root(bid: Option<i64>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT.to_string(),
            BranchNode {
                bid,
                path: ROOT.to_string(),
                name: ROOT.to_string(),
                parent_id: None,
                children: Vec::new(),
            },
        );
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &BranchNode {
        &self.nodes[ROOT]
    }

    pub fn get(&self, path: &str) -> Option<&BranchNode> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn children<'a>(&'a self, path: &str) -> impl Iterator<Item = &'a BranchNode> + 'a {
        let node = self.nodes.get(path);
        let base = path.to_string();
        node.into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(move |seg| self.nodes.get(&format!("{}/{}", base, seg)))
    }

    /// Pre-order walk of `root` and everything below it, children in listed
    /// order. Empty if `root` is not in the tree.
    pub fn subtree_paths(&self, root: &str) -> Vec<String> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }
        let mut stack = vec![root.to_string()];
        while let Some(path) = stack.pop() {
            if let Some(node) = self.nodes.get(&path) {
                for seg in node.children.iter().rev() {
                    stack.push(format!("{}/{}", path, seg));
                }
            }
            out.push(path);
        }
        out
    }

    pub fn paths(&self) -> Vec<String> {
        self.subtree_paths(ROOT)
    }

    /// Back to the flat `{path, bid}` form, in tree order. Intermediate
    /// nodes without a bid are skipped.
    pub fn flatten(&self) -> Vec<BranchRecord> {
        self.paths()
            .into_iter()
            .filter_map(|p| {
                let bid = self.nodes.get(&p)?.bid?;
                Some(BranchRecord { path: p, bid })
            })
            .collect()
    }

    pub fn to_nested(&self) -> NestedBranch {
        self.nest(ROOT)
    }

    /// Nested form of the subtree under `root`; `None` if it is not in the tree.
    pub fn to_nested_from(&self, root: &str) -> Option<NestedBranch> {
        self.nodes.contains_key(root).then(|| self.nest(root))
    }

    fn nest(&self, path: &str) -> NestedBranch {
        let node = &self.nodes[path];
        NestedBranch {
            id: node.bid,
            name: node.name.clone(),
            parent_id: node.parent_id,
            children: self.children(path).map(|c| self.nest(&c.path)).collect(),
        }
    }

    /// Indented outline, one branch per line.
    pub fn render(&self, root: &str) -> String {
        let mut out = String::new();
        let base = depth(root);
        for path in self.subtree_paths(root) {
            let node = &self.nodes[&path];
            let indent = "  ".repeat(depth(&path) - base);
            match node.bid {
                Some(bid) => out.push_str(&format!("{}{} (#{})\n", indent, node.name, bid)),
                None => out.push_str(&format!("{}{}\n", indent, node.name)),
            }
        }
        out
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.keys().map(|p| depth(p)).max().unwrap_or(0)
    }
}

/// `Home` is 0, `Home/Food` is 1.
pub fn depth(path: &str) -> usize {
    path.split('/').count() - 1
}

pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

pub fn last_segment(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// `path` is `root` or lies somewhere below it.
pub fn is_within(path: &str, root: &str) -> bool {
    path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Strict ancestors of `path`, nearest first, stopping at `root` inclusive.
/// Empty when `path` is `root` or not below it.
pub fn ancestors_within<'a>(path: &'a str, root: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    if !is_within(path, root) {
        return out;
    }
    let mut cur = path;
    while cur != root {
        match parent_path(cur) {
            Some(p) => {
                out.push(p);
                cur = p;
            }
            None => break,
        }
    }
    out
}
