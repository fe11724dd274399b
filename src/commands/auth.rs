// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Ctx;
use crate::error::ApiError;
use crate::session::{Session, SignupDraft};
use crate::validate::{ensure_verified, validate_email, validate_new_password};
use anyhow::{anyhow, Result};
use log::warn;

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("send-code", sub)) => send_code(
            ctx,
            sub.get_one::<String>("email").unwrap(),
            sub.get_one::<String>("name").unwrap(),
        ),
        Some(("verify", sub)) => verify(ctx, sub.get_one::<String>("code").unwrap()),
        Some(("signup", sub)) => signup(
            ctx,
            sub.get_one::<String>("password").unwrap(),
            sub.get_one::<String>("confirm").unwrap(),
        ),
        Some(("signin", sub)) => signin(
            ctx,
            sub.get_one::<String>("email").unwrap(),
            sub.get_one::<String>("password").unwrap(),
        )
        .map(|_| ()),
        Some(("signout", _)) => signout(ctx),
        Some(("forgot", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            validate_email(email)?;
            ctx.client()?.forget_password(email)?;
            println!("A password reset email has been sent to {}.", email);
            Ok(())
        }
        Some(("passwd", sub)) => {
            let pw = sub.get_one::<String>("password").unwrap();
            validate_new_password(pw, sub.get_one::<String>("confirm").unwrap())?;
            ctx.client()?.modify_password(pw)?;
            println!("Password changed.");
            Ok(())
        }
        _ => Ok(()),
    }
}

pub fn send_code(ctx: &Ctx, email: &str, name: &str) -> Result<()> {
    validate_email(email)?;
    match ctx.client()?.send_verify_code(email) {
        Ok(()) => {}
        Err(ApiError::Status { status: 409, .. }) => {
            return Err(anyhow!("This email already exists."));
        }
        Err(e) => return Err(e.into()),
    }
    SignupDraft {
        email: Some(email.to_string()),
        name: Some(name.to_string()),
        code_sent: true,
        verified: false,
    }
    .save(ctx.conn)?;
    println!("Verification code sent to {}.", email);
    Ok(())
}

pub fn verify(ctx: &Ctx, code: &str) -> Result<()> {
    let mut draft = SignupDraft::load(ctx.conn)?;
    let email = match (&draft.email, draft.code_sent) {
        (Some(e), true) => e.clone(),
        _ => return Err(anyhow!("Request a verification code first.")),
    };
    ctx.client()?.check_verify_code(&email, code)?;
    draft.verified = true;
    draft.save(ctx.conn)?;
    println!("Email verified.");
    Ok(())
}

pub fn signup(ctx: &Ctx, password: &str, confirm: &str) -> Result<()> {
    let draft = SignupDraft::load(ctx.conn)?;
    let email = draft
        .email
        .clone()
        .ok_or_else(|| anyhow!("Request a verification code first."))?;
    ensure_verified(&draft, &email)?;
    validate_new_password(password, confirm)?;
    let name = draft.name.clone().unwrap_or_default();
    ctx.client()?.signup(&email, password, &name)?;
    SignupDraft::clear(ctx.conn)?;
    println!("Account created for {}. Sign in with `branchbook auth signin`.", email);
    Ok(())
}

pub fn signin(ctx: &Ctx, email: &str, password: &str) -> Result<Session> {
    validate_email(email)?;
    let reply = ctx.client()?.signin(email, password)?;
    let session = Session::store(ctx.conn, &ctx.config.base_url, &reply)?;
    println!("Signed in as {}.", reply.username);
    Ok(session)
}

fn signout(ctx: &Ctx) -> Result<()> {
    if ctx.session.is_signed_in() {
        if let Err(e) = ctx.client()?.signout() {
            warn!("backend sign-out failed: {}", e);
        }
    }
    Session::clear(ctx.conn)?;
    println!("Signed out.");
    Ok(())
}
