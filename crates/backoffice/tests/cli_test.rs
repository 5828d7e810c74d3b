//! Integration tests for the `backoffice` CLI binary.
//!
//! Argument parsing, help output and completions run without a backend;
//! the session and collection flows run against a `wiremock` server with
//! config and data directories pointed at a temp dir.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `backoffice` binary with env isolation.
///
/// Clears all `BACKOFFICE_*` env vars and points config and data
/// directories at `home` so tests never touch the user's real files.
fn backoffice_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("backoffice");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("BACKOFFICE_PROFILE")
        .env_remove("BACKOFFICE_BACKEND")
        .env_remove("BACKOFFICE_OUTPUT")
        .env_remove("BACKOFFICE_INSECURE")
        .env_remove("BACKOFFICE_TIMEOUT")
        .env_remove("BACKOFFICE_USER");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn backend_with_users() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "firstName": "John", "lastName": "Doe", "email": "john@example.com", "phone": "555-0100" },
            { "id": 2, "firstName": "Jane", "lastName": "Roe", "email": "jane@example.com", "phone": "555-0101" },
        ])))
        .mount(&server)
        .await;
    server
}

fn signed_in(home: &std::path::Path) {
    backoffice_cmd(home)
        .args(["login", "--user", "admin"])
        .assert()
        .success();
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = backoffice_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    backoffice_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("users")
                .and(predicate::str::contains("products"))
                .and(predicate::str::contains("dashboard"))
                .and(predicate::str::contains("login")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    backoffice_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("backoffice"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    backoffice_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = backoffice_cmd(home.path())
        .args(["-o", "xml", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_records_subcommands_exist() {
    let home = tempfile::tempdir().unwrap();
    backoffice_cmd(home.path())
        .args(["products", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("add"))
                .and(predicate::str::contains("edit"))
                .and(predicate::str::contains("delete")),
        );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_under_config_home() {
    let home = tempfile::tempdir().unwrap();
    backoffice_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_language_is_persisted() {
    let home = tempfile::tempdir().unwrap();
    backoffice_cmd(home.path())
        .args(["config", "language", "ru"])
        .assert()
        .success();
    backoffice_cmd(home.path())
        .args(["config", "language"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ru"));

    backoffice_cmd(home.path())
        .args(["config", "language", "de"])
        .assert()
        .code(2);
}

// ── Session gate ────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_signed_out_list_exits_with_auth_code() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let output = backoffice_cmd(home.path())
        .args(["--backend", &server.uri(), "users", "list"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Not signed in"));
}

#[test]
fn test_login_logout_status() {
    let home = tempfile::tempdir().unwrap();

    backoffice_cmd(home.path())
        .args(["status", "-o", "plain"])
        .assert()
        .success()
        .stdout("false\n");

    backoffice_cmd(home.path())
        .args(["login", "--user", "admin"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Signed in"));

    backoffice_cmd(home.path())
        .args(["status", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"signed_in\": true")
                .and(predicate::str::contains("\"user\": \"admin\"")),
        );

    backoffice_cmd(home.path())
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Signed out"));

    backoffice_cmd(home.path())
        .args(["status", "-o", "plain"])
        .assert()
        .success()
        .stdout("false\n");
}

#[test]
fn test_login_without_user_needs_terminal() {
    let home = tempfile::tempdir().unwrap();
    backoffice_cmd(home.path())
        .arg("login")
        .write_stdin("")
        .assert()
        .code(2);
}

// ── Collections ─────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_list_users_as_json() {
    let home = tempfile::tempdir().unwrap();
    let server = backend_with_users().await;
    signed_in(home.path());

    let output = backoffice_cmd(home.path())
        .args(["--backend", &server.uri(), "users", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let users: Value = serde_json::from_slice(&output.stdout).unwrap();
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["firstName"], "John");
    assert_eq!(users[1]["id"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_filter_and_sort_apply_locally() {
    let home = tempfile::tempdir().unwrap();
    let server = backend_with_users().await;
    signed_in(home.path());

    backoffice_cmd(home.path())
        .args(["--backend", &server.uri(), "users", "list", "-o", "plain", "--filter", "JA"])
        .assert()
        .success()
        .stdout("2\n");

    backoffice_cmd(home.path())
        .args(["--backend", &server.uri(), "users", "list", "-o", "plain", "--sort", "firstName"])
        .assert()
        .success()
        .stdout("2\n1\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_unknown_id_is_not_found() {
    let home = tempfile::tempdir().unwrap();
    let server = backend_with_users().await;
    signed_in(home.path());

    let output = backoffice_cmd(home.path())
        .args(["--backend", &server.uri(), "users", "get", "99"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("users list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_product_posts_normalized_draft() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_json(json!({
            "title": "Desk",
            "description": "Oak",
            "price": 120,
            "images": "desk.png"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7, "title": "Desk", "description": "Oak", "price": 120, "images": "desk.png"
        })))
        .expect(1)
        .mount(&server)
        .await;
    signed_in(home.path());

    backoffice_cmd(home.path())
        .args(["--backend", &server.uri(), "products", "add", "-o", "plain"])
        .args(["--set", "title=Desk", "--set", "description=Oak"])
        .args(["--set", "price=120", "--set", "images=desk.png"])
        .assert()
        .success()
        .stdout("7\n")
        .stderr(predicate::str::contains("Product added successfully"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_incomplete_product_is_never_sent() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
        .expect(0)
        .mount(&server)
        .await;
    signed_in(home.path());

    let output = backoffice_cmd(home.path())
        .args(["--backend", &server.uri(), "products", "add", "--set", "title=Desk"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Please input the price!"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes_skips_prompt() {
    let home = tempfile::tempdir().unwrap();
    let server = backend_with_users().await;
    Mock::given(method("DELETE"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    signed_in(home.path());

    backoffice_cmd(home.path())
        .args(["--backend", &server.uri(), "-y", "users", "delete", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("User deleted successfully"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_string_ids_resolve_from_arguments() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "1", "firstName": "John", "lastName": "Doe", "email": "john@example.com", "phone": "555-0100" },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    signed_in(home.path());

    let output = backoffice_cmd(home.path())
        .args(["--backend", &server.uri(), "users", "get", "1", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let user: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(user["id"], "1");

    backoffice_cmd(home.path())
        .args(["--backend", &server.uri(), "-y", "users", "delete", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("User deleted successfully"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_backend_is_connection_error() {
    let home = tempfile::tempdir().unwrap();
    signed_in(home.path());

    // Nothing listens on port 9 on loopback.
    let output = backoffice_cmd(home.path())
        .args(["--backend", "http://127.0.0.1:9", "--timeout", "2", "dashboard"])
        .output()
        .unwrap();
    let code = output.status.code();
    assert!(matches!(code, Some(7 | 8)), "unexpected exit {code:?}");
}
