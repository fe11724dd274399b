// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Ctx;
use crate::tree::{last_segment, BranchTree, ROOT};
use crate::validate::confirm_deletion;
use anyhow::{bail, Context, Result};
use log::warn;

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("tree", sub)) => {
            let tree = load_tree(ctx, sub.get_flag("fallback"))?;
            let root = sub.get_one::<String>("root").unwrap();
            if !tree.contains(root) {
                bail!("Branch '{}' does not exist", root);
            }
            if sub.get_flag("json") {
                let nested = tree
                    .to_nested_from(root)
                    .with_context(|| format!("Branch '{}' does not exist", root))?;
                println!("{}", serde_json::to_string_pretty(&nested)?);
            } else {
                print!("{}", tree.render(root));
            }
            Ok(())
        }
        Some(("add", sub)) => {
            let parent = sub.get_one::<String>("parent").unwrap();
            let child = sub.get_one::<String>("child").unwrap().trim();
            add(ctx, parent, child)
        }
        Some(("rm", sub)) => remove(
            ctx,
            sub.get_one::<String>("path").unwrap(),
            sub.get_one::<String>("confirm").unwrap(),
        ),
        _ => Ok(()),
    }
}

/// Fetch the tree; with `fallback` a failed fetch degrades to a bare root.
pub fn load_tree(ctx: &Ctx, fallback: bool) -> Result<BranchTree> {
    match ctx.client()?.get_tree() {
        Ok(t) => Ok(t),
        Err(e) if fallback => {
            warn!("branch tree unavailable ({}); using a bare '{}'", e, ROOT);
            Ok(BranchTree::fallback())
        }
        Err(e) => Err(e).context("Failed to load branch tree"),
    }
}

fn add(ctx: &Ctx, parent: &str, child: &str) -> Result<()> {
    if child.is_empty() || child.contains('/') {
        bail!("Branch name must be non-empty and must not contain '/'");
    }
    ctx.client()?.create_branch(parent, child)?;
    println!("Created branch {}/{}", parent, child);
    Ok(())
}

/// Requires the branch's own name to be typed back before anything is sent.
pub fn remove(ctx: &Ctx, path: &str, confirm: &str) -> Result<()> {
    if path == ROOT {
        bail!("The '{}' branch cannot be deleted", ROOT);
    }
    confirm_deletion(confirm, last_segment(path))?;
    ctx.client()?.delete_branch(path)?;
    println!("Deleted branch {}", path);
    Ok(())
}
