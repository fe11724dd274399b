// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use branchbook::commands::{self, Ctx};
use branchbook::config::{Config, Overrides};
use branchbook::db::init_schema;
use branchbook::error::ApiError;
use branchbook::session::{Session, SignupDraft};
use branchbook::validate::ValidationError;
use branchbook::cli;
use common::{serve_once, serve_sequence};
use rusqlite::Connection;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

fn ctx_for<'a>(conn: &'a Connection, url: &str, out_dir: Option<&str>, token: bool) -> Ctx<'a> {
    let overrides = Overrides {
        url: Some(url.to_string()),
        out_dir: out_dir.map(str::to_string),
    };
    let cfg = Config::resolve_with(conn, &overrides, |_| None).unwrap();
    let mut session = Session::anonymous(cfg.base_url.clone());
    if token {
        session.token = Some("tok".into());
    }
    Ctx::new(conn, cfg, session)
}

#[test]
fn branch_rm_blocks_on_mismatched_confirmation() {
    let conn = base_conn();
    let ctx = ctx_for(&conn, "http://127.0.0.1:9", None, false);
    let m = cli::build_cli().get_matches_from([
        "branchbook",
        "branch",
        "rm",
        "Home/Food/Groceries",
        "--confirm",
        "groceries",
    ]);
    let Some(("branch", sub)) = m.subcommand() else {
        panic!("no branch subcommand");
    };
    let err = commands::branch::handle(&ctx, sub).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::ConfirmationMismatch)
    );
}

#[test]
fn branch_rm_sends_delete_after_exact_confirmation() {
    let (url, server) = serve_once("200 OK", "{}");
    let conn = base_conn();
    let ctx = ctx_for(&conn, &url, None, true);
    commands::branch::remove(&ctx, "Home/Food/Groceries", "Groceries").unwrap();
    let request = server.join().unwrap();
    assert!(request.starts_with("DELETE /db/delete-branch?branch=Home%2FFood%2FGroceries "));
}

#[test]
fn home_cannot_be_removed() {
    let conn = base_conn();
    let ctx = ctx_for(&conn, "http://127.0.0.1:9", None, true);
    assert!(commands::branch::remove(&ctx, "Home", "Home").is_err());
}

#[test]
fn branch_tree_fallback_only_when_asked() {
    let conn = base_conn();
    let ctx = ctx_for(&conn, "http://127.0.0.1:9", None, false);
    let err = commands::branch::load_tree(&ctx, false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::NotLoggedIn)
    ));
    let tree = commands::branch::load_tree(&ctx, true).unwrap();
    assert_eq!(tree.len(), 1);
}

#[test]
fn signup_requires_verified_draft() {
    let conn = base_conn();
    let ctx = ctx_for(&conn, "http://127.0.0.1:9", None, false);
    SignupDraft {
        email: Some("kim@example.com".into()),
        name: Some("Kim".into()),
        code_sent: true,
        verified: false,
    }
    .save(&conn)
    .unwrap();
    let err = commands::auth::signup(&ctx, "abcdefg1", "abcdefg1").unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::EmailNotVerified)
    );
}

#[test]
fn signup_clears_draft_on_success() {
    let (url, server) = serve_once("200 OK", r#"{"message": "created"}"#);
    let conn = base_conn();
    let ctx = ctx_for(&conn, &url, None, false);
    SignupDraft {
        email: Some("kim@example.com".into()),
        name: Some("Kim".into()),
        code_sent: true,
        verified: true,
    }
    .save(&conn)
    .unwrap();
    commands::auth::signup(&ctx, "abcdefg1", "abcdefg1").unwrap();
    let request = server.join().unwrap();
    assert!(request.starts_with("POST /auth/signup HTTP/1.1"));
    assert!(request.contains(r#""username":"Kim""#));
    assert_eq!(SignupDraft::load(&conn).unwrap(), SignupDraft::default());
}

#[test]
fn send_code_maps_conflict_to_existing_email() {
    let (url, server) = serve_once("409 Conflict", r#"{"detail": "exists"}"#);
    let conn = base_conn();
    let ctx = ctx_for(&conn, &url, None, false);
    let err = commands::auth::send_code(&ctx, "kim@example.com", "Kim").unwrap_err();
    server.join().unwrap();
    assert_eq!(err.to_string(), "This email already exists.");
    assert_eq!(SignupDraft::load(&conn).unwrap().email, None);
}

#[test]
fn signin_stores_session() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"access_token": "abc", "email": "kim@example.com", "username": "Kim"}"#,
    );
    let conn = base_conn();
    let ctx = ctx_for(&conn, &url, None, false);
    let session = commands::auth::signin(&ctx, "kim@example.com", "abcdefg1").unwrap();
    server.join().unwrap();
    assert!(session.is_signed_in());
    let reloaded = Session::load(&conn, &ctx.config).unwrap();
    assert_eq!(reloaded.token.as_deref(), Some("abc"));
}

#[test]
fn daily_report_lands_in_out_dir() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"tid": 1, "branch": "Home", "t_date": "2024-06-01", "cashflow": 1500}]"#,
    );
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("reports");
    let ctx = ctx_for(&conn, &url, out.to_str(), true);
    let m = cli::build_cli().get_matches_from(["branchbook", "report", "daily"]);
    let Some(("report", sub)) = m.subcommand() else {
        panic!("no report subcommand");
    };
    commands::report::handle(&ctx, sub).unwrap();
    server.join().unwrap();
    let bytes = std::fs::read(out.join("daily.xlsx")).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn periodic_report_with_no_transactions_writes_nothing() {
    let (url, server) = serve_once("200 OK", r#"{"message": []}"#);
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let ctx = ctx_for(&conn, &url, dir.path().to_str(), true);
    let m = cli::build_cli().get_matches_from([
        "branchbook",
        "report",
        "periodic",
        "--from",
        "2024-01-01",
        "--to",
        "2024-03-31",
    ]);
    let Some(("report", sub)) = m.subcommand() else {
        panic!("no report subcommand");
    };
    commands::report::handle(&ctx, sub).unwrap();
    server.join().unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

fn run_user(ctx: &Ctx, args: &[&str]) -> anyhow::Result<()> {
    let m = cli::build_cli().get_matches_from(args.iter().copied());
    let Some(("user", sub)) = m.subcommand() else {
        panic!("no user subcommand");
    };
    commands::user::handle(ctx, sub)
}

#[test]
fn user_update_keeps_current_use_ai_when_flag_omitted() {
    let (url, server) = serve_sequence(&[
        ("200 OK", r#"{"email": "kim@example.com", "username": "Kim", "useai": true}"#),
        ("200 OK", r#"{"message": "updated"}"#),
    ]);
    let conn = base_conn();
    let ctx = ctx_for(&conn, &url, None, true);
    run_user(&ctx, &["branchbook", "user", "update", "--username", "Kimberly"]).unwrap();
    let requests = server.join().unwrap();
    assert!(requests[0].starts_with("GET /auth/get-user "));
    assert!(requests[1].starts_with("PUT /auth/update-userinfo "));
    assert!(requests[1].contains("name=\"username\"\r\n\r\nKimberly"));
    assert!(requests[1].contains("name=\"useai\"\r\n\r\ntrue"));
}

#[test]
fn user_update_sends_explicit_use_ai_without_lookup() {
    let (url, server) = serve_once("200 OK", r#"{"message": "updated"}"#);
    let conn = base_conn();
    let ctx = ctx_for(&conn, &url, None, true);
    run_user(
        &ctx,
        &["branchbook", "user", "update", "--username", "Kim", "--use-ai", "false"],
    )
    .unwrap();
    let request = server.join().unwrap();
    assert!(request.starts_with("PUT /auth/update-userinfo "));
    assert!(request.contains("name=\"useai\"\r\n\r\nfalse"));
}

#[test]
fn receipts_report_uses_font_flag() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"tid": 1, "branch": "Home/Еда", "t_date": "2024-06-01", "cashflow": -1500}]"#,
    );
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let ctx = ctx_for(&conn, &url, dir.path().to_str(), true);
    let font = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/RobotoMedium.ttf");
    let m = cli::build_cli().get_matches_from(["branchbook", "report", "receipts", "--font", font]);
    let Some(("report", sub)) = m.subcommand() else {
        panic!("no report subcommand");
    };
    commands::report::handle(&ctx, sub).unwrap();
    server.join().unwrap();
    let pdf: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(pdf.len(), 1);
    assert!(std::fs::read(&pdf[0]).unwrap().starts_with(b"%PDF"));
}

#[test]
fn receipts_report_rejects_missing_font_file() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"tid": 1, "branch": "Home", "t_date": "2024-06-01", "cashflow": 10}]"#,
    );
    let ctx = ctx_for(&conn, &url, dir.path().to_str(), true);
    let missing = dir.path().join("none.ttf");
    let m = cli::build_cli().get_matches_from([
        "branchbook",
        "report",
        "receipts",
        "--font",
        missing.to_str().unwrap(),
    ]);
    let Some(("report", sub)) = m.subcommand() else {
        panic!("no report subcommand");
    };
    let err = commands::report::handle(&ctx, sub).unwrap_err();
    server.join().unwrap();
    assert!(err.to_string().starts_with("Read font"));
}

#[test]
fn branch_tree_json_rejects_unknown_root() {
    let conn = base_conn();
    let ctx = ctx_for(&conn, "http://127.0.0.1:9", None, false);
    let m = cli::build_cli().get_matches_from([
        "branchbook", "branch", "tree", "--fallback", "--json", "--root", "Home/Food",
    ]);
    let Some(("branch", sub)) = m.subcommand() else {
        panic!("no branch subcommand");
    };
    let err = commands::branch::handle(&ctx, sub).unwrap_err();
    assert_eq!(err.to_string(), "Branch 'Home/Food' does not exist");
}
