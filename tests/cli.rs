//! Integration tests for the command-line interface
//!
//! Runs the binary against log files in temporary directories and checks
//! the printed report and the exit code.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const OK_CHANGED: &str =
    r#"{"event":"runner_on_ok","event_data":{"task":"t1","remote_addr":"h1","changed":true}}"#;
const FAILED_BOOM: &str =
    r#"{"event":"runner_on_failed","event_data":{"task":"t2","remote_addr":"h1","msg":"boom"}}"#;

fn analyzer(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ansible-log-analyzer").unwrap();
    cmd.current_dir(workdir)
        .env_remove("ANSIBLE_LOG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn write_log(dir: &TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_ok_changed_run_succeeds() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "ansible.log", &[OK_CHANGED]);

    analyzer(dir.path())
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ANSIBLE EXECUTION REPORT\n"))
        .stdout(predicate::str::contains("Total tasks: 1\n"))
        .stdout(predicate::str::contains("Successful tasks: 1\n"))
        .stdout(predicate::str::contains("Changed tasks: 1\n"))
        .stdout(predicate::str::contains("Managed hosts: 1\n"))
        .stdout(predicate::str::contains("FAILED TASKS DETAILS:").not())
        .stdout(predicate::str::ends_with("Success rate: 100.0%\n"));
}

#[test]
fn test_failed_task_exits_one() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "ansible.log", &[FAILED_BOOM, "garbage"]);

    analyzer(dir.path())
        .arg(&log)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed tasks: 1\n"))
        .stdout(predicate::str::contains(
            "FAILED TASKS DETAILS:\n------------------------------\nTask: t2\nHost: h1\nError: boom\n\n",
        ))
        .stdout(predicate::str::contains("Success rate: 0.0%"));
}

#[test]
fn test_empty_log_succeeds_without_rate() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("empty.log");
    fs::write(&log, "").unwrap();

    analyzer(dir.path())
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total tasks: 0\n"))
        .stdout(predicate::str::contains("Success rate").not());
}

#[test]
fn test_missing_log_reports_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.log");

    analyzer(dir.path())
        .arg(&missing)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing.log"));
}

#[test]
fn test_header_shows_log_path() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "site.log", &["PLAY [all] ****"]);

    analyzer(dir.path())
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Log file: {}\n", log.display())))
        .stdout(predicate::str::is_match(r"Timestamp: \d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\n").unwrap());
}

#[test]
fn test_reads_stdin() {
    let dir = TempDir::new().unwrap();

    analyzer(dir.path())
        .arg("-")
        .write_stdin(format!("{}\nnot json\n{}\n", OK_CHANGED, OK_CHANGED))
        .assert()
        .success()
        .stdout(predicate::str::contains("Log file: <stdin>\n"))
        .stdout(predicate::str::contains("Successful tasks: 2\n"));
}

#[test]
fn test_log_file_from_env() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "env.log", &[FAILED_BOOM]);

    analyzer(dir.path())
        .env("ANSIBLE_LOG_FILE", &log)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Task: t2\n"));
}

#[test]
fn test_log_file_from_config() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "configured.log", &[OK_CHANGED]);
    fs::write(
        dir.path().join(".ansible-log-analyzer.toml"),
        format!("[general]\nlog_file = {:?}\n", log.display().to_string()),
    )
    .unwrap();

    analyzer(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("configured.log"));
}

#[test]
fn test_directory_source() {
    let dir = TempDir::new().unwrap();
    let logs = dir.path().join("logs");
    fs::create_dir(&logs).unwrap();
    fs::write(logs.join("a.log"), format!("{}\n", OK_CHANGED)).unwrap();
    fs::write(
        logs.join("b.log"),
        r#"{"event":"runner_on_skipped","event_data":{"task":"t3","remote_addr":"h2"}}"#,
    )
    .unwrap();

    analyzer(dir.path())
        .arg(&logs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total tasks: 1\n"))
        .stdout(predicate::str::contains("Skipped tasks: 1\n"))
        .stdout(predicate::str::contains("Managed hosts: 2\n"));
}

#[test]
fn test_json_format() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "ansible.log", &[OK_CHANGED, FAILED_BOOM]);

    let output = analyzer(dir.path())
        .arg(&log)
        .args(["--format", "json"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["total_tasks"], 2);
    assert_eq!(value["success_rate"], 50.0);
    assert_eq!(value["success"], false);
    assert_eq!(value["failures"][0]["task"], "t2");
}

#[test]
fn test_output_file() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "ansible.log", &[OK_CHANGED]);
    let report = dir.path().join("report.txt");

    analyzer(dir.path())
        .arg(&log)
        .arg("--output")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&report).unwrap();
    assert!(content.contains("EXECUTION STATISTICS:"));
}

#[test]
fn test_init_config() {
    let dir = TempDir::new().unwrap();

    analyzer(dir.path()).arg("--init-config").assert().success();

    let content = fs::read_to_string(dir.path().join(".ansible-log-analyzer.toml")).unwrap();
    assert!(content.contains("[general]"));

    analyzer(dir.path()).arg("--init-config").assert().code(1);
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let dir = TempDir::new().unwrap();

    analyzer(dir.path())
        .args(["--verbose", "--quiet", "-"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--verbose"));
}
