//! Basic CLI E2E tests.
//!
//! Each test points FOCUSFLOW_HOME at its own temporary directory, so config
//! and database files never touch the real user profile.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

const PLAN: &str = "\
📅 **Daily Study Plan — Friday**
🕒 **Total Study Time:** 1.5 hours

📚 **Subjects:**
1️⃣ **Physics** — 45 min — Optics
2️⃣ **Math** — 45 min

☕ **Breaks:**
- Short break after each session.

💡 **Study Tip:**
- Hardest first.

💬 **Motivation:**
- Execution is everything.
";

fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_focusflow-cli"));
    cmd.env("FOCUSFLOW_HOME", home)
        .env_remove("FOCUSFLOW_ENV")
        .env_remove("GEMINI_API_KEY");
    cmd
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = cli(home).args(args).output().expect("failed to run CLI");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout should be JSON")
}

fn import_plan(home: &Path) {
    let mut child = cli(home)
        .args(["plan", "import"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(PLAN.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_config_defaults_and_set() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(home.path(), &["config", "get", "timer.focus_duration"]).trim(), "25");

    run_ok(home.path(), &["config", "set", "timer.focus_duration", "50"]);
    assert_eq!(run_ok(home.path(), &["config", "get", "timer.focus_duration"]).trim(), "50");

    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_plan_import_and_show() {
    let home = tempfile::tempdir().unwrap();
    import_plan(home.path());

    let plan = json(&run_ok(home.path(), &["plan", "show"]));
    assert_eq!(plan["total_time"], "1.5 hours");
    assert_eq!(plan["subjects"][0]["subject"], "Physics");
    assert_eq!(plan["subjects"][1]["topic"], "N/A");

    let next = json(&run_ok(home.path(), &["plan", "next"]));
    assert_eq!(next["index"], 0);
    assert_eq!(next["duration_secs"], 2700);
}

#[test]
fn test_plan_show_without_plan_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["plan", "show"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_session_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    import_plan(home.path());

    let started = json(&run_ok(home.path(), &["session", "start", "0"]));
    assert_eq!(started["subject"], "Physics");
    assert_eq!(started["time_left"], 2700);

    let (_, stderr, code) = run_cli(home.path(), &["session", "start", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already in progress"));

    let status = json(&run_ok(home.path(), &["session", "status"]));
    assert_eq!(status["session"]["subject"], "Physics");

    // Stopped before any time elapsed: nothing recorded, nothing marked.
    let outcome = json(&run_ok(home.path(), &["session", "stop"]));
    assert_eq!(outcome["completed"], false);
    assert!(outcome["record"].is_null());

    let status = json(&run_ok(home.path(), &["session", "status"]));
    assert!(status["session"].is_null());
}

#[test]
fn test_log_and_stats() {
    let home = tempfile::tempdir().unwrap();
    let record = json(&run_ok(home.path(), &["log", "Chemistry", "90"]));
    assert_eq!(record["duration"], 1.5);
    assert_eq!(record["completed"], true);

    let streak = json(&run_ok(home.path(), &["stats", "streak"]));
    assert_eq!(streak["streak"], 1);

    let all = json(&run_ok(home.path(), &["stats", "all"]));
    assert_eq!(all["total_sessions"], 1);

    let week = json(&run_ok(home.path(), &["stats", "week"]));
    assert_eq!(week.as_array().unwrap().len(), 7);
}

#[test]
fn test_log_rejects_non_positive_minutes() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["log", "Math", "0"]);
    assert_eq!(code, 1);
}

#[test]
fn test_chat_without_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["chat", "hello"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("API key"));
}

#[test]
fn test_data_lands_in_focusflow_home() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["config", "set", "user.id", "tester"]);
    run_ok(home.path(), &["log", "Math", "30"]);
    assert!(home.path().join("config.toml").exists());
    assert!(home.path().join("focusflow.db").exists());
}
