//! Integration tests for the VCR CLI
//!
//! These tests invoke the actual vcr binary and verify:
//! - Exit codes (0 = success, 1 = not canonical, 2 = error)
//! - stdout/stderr output
//! - JSON output format

use std::path::PathBuf;
use std::process::Command;

// ── Helpers ───────────────────────────────────────────────

fn vcr_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vcr"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(format!("../../tests/fixtures/interactions/{}", name))
}

fn run_vcr(args: &[&str]) -> std::process::Output {
    Command::new(vcr_bin())
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute vcr")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("should be valid JSON")
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_vcr(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("vcr"), "should contain 'vcr'");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "should contain version"
    );
}

#[test]
fn test_version_flag() {
    let output = run_vcr(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

// ── Normalize ─────────────────────────────────────────────

#[test]
fn test_normalize_raw_fixture() {
    let output = run_vcr(&["normalize", fixture("raw-get.json").to_str().unwrap()]);
    assert!(output.status.success(), "normalize should exit 0");
    let json = stdout_json(&output);
    assert_eq!(json["request"]["method"], "get");
    assert_eq!(json["request"]["uri"], "http://example.com:80/path?q=1");
    assert_eq!(json["request"]["headers"]["x-empty"], serde_json::json!([]));
    assert_eq!(json["response"]["headers"]["content-type"], serde_json::json!(["text/html"]));
}

#[test]
fn test_normalize_matches_canonical_fixture() {
    let output = run_vcr(&["normalize", "--compact", fixture("raw-get.json").to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim().lines().count(), 1, "--compact should be one line");

    let expected: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(fixture("canonical-get.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(stdout_json(&output), expected);
}

#[test]
fn test_normalize_nonexistent_file() {
    let output = run_vcr(&["normalize", "nonexistent.json"]);
    assert_eq!(output.status.code(), Some(2), "missing file should exit 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "should mention error");
}

#[test]
fn test_normalize_invalid_json() {
    let output = run_vcr(&["normalize", fixture("invalid.json").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2), "invalid JSON should exit 2");
}

// ── Check ─────────────────────────────────────────────────

#[test]
fn test_check_canonical_fixture() {
    let output = run_vcr(&["check", fixture("canonical-get.json").to_str().unwrap()]);
    assert!(output.status.success(), "canonical fixture should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("canonical"));
}

#[test]
fn test_check_raw_fixture() {
    let output = run_vcr(&["check", fixture("raw-get.json").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1), "raw fixture should exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not canonical"));
}

#[test]
fn test_check_malformed_uri_is_canonical() {
    let output = run_vcr(&["check", fixture("malformed-uri.json").to_str().unwrap()]);
    assert!(output.status.success(), "pass-through URI is already canonical");
}

#[test]
fn test_check_json_output() {
    let output = run_vcr(&["check", "--json", fixture("raw-get.json").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["canonical"], false);
}

#[test]
fn test_check_invalid_json() {
    let output = run_vcr(&["check", fixture("invalid.json").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}

// ── Hash ──────────────────────────────────────────────────

#[test]
fn test_hash_is_sha256_hex() {
    let output = run_vcr(&["hash", fixture("raw-get.json").to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let hash = stdout.trim();
    assert_eq!(hash.len(), 64, "Hash should be 64 hex chars, got: {}", hash);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_hash_raw_equals_canonical() {
    let raw = run_vcr(&["hash", fixture("raw-get.json").to_str().unwrap()]);
    let canonical = run_vcr(&["hash", fixture("canonical-get.json").to_str().unwrap()]);
    assert_eq!(raw.stdout, canonical.stdout);
}

#[test]
fn test_hash_differs_between_interactions() {
    let a = run_vcr(&["hash", fixture("raw-get.json").to_str().unwrap()]);
    let b = run_vcr(&["hash", fixture("raw-post-https.json").to_str().unwrap()]);
    assert_ne!(a.stdout, b.stdout);
}

// ── Uri ───────────────────────────────────────────────────

#[test]
fn test_uri_default_port() {
    let output = run_vcr(&["uri", "https://example.com/x"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "https://example.com:443/x");
}

#[test]
fn test_uri_pass_through() {
    let output = run_vcr(&["uri", "not a uri"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "not a uri");
}

#[test]
fn test_uri_rfc_invalid_kept_verbatim() {
    let output = run_vcr(&["uri", "http://example.com/a b"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "http://example.com/a b");
}

#[test]
fn test_verbose_logs_pass_through() {
    let output = run_vcr(&["--verbose", "uri", "not a uri"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "not a uri");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("leaving URI"), "stderr: {}", stderr);
}

// ── Matcher ───────────────────────────────────────────────

#[test]
fn test_matcher_default_attributes() {
    let output = run_vcr(&["matcher", fixture("raw-post-https.json").to_str().unwrap()]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["match_attributes"], serde_json::json!(["method", "uri"]));
    assert_eq!(json["method"], "post");
    assert_eq!(json["uri"], "https://api.example.com:443/v1/items");
    assert!(json.get("body").is_none());
}

#[test]
fn test_matcher_custom_attributes() {
    let output = run_vcr(&[
        "matcher",
        "--match-on",
        "body,headers",
        fixture("raw-post-https.json").to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["body"], r#"{"name":"widget"}"#);
    assert_eq!(json["headers"]["authorization"], serde_json::json!(["Bearer token"]));
    assert!(json.get("uri").is_none());
}

#[test]
fn test_matcher_unknown_attribute() {
    let output = run_vcr(&[
        "matcher",
        "--match-on",
        "host",
        fixture("raw-post-https.json").to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2), "clap usage errors exit 2");
}
