//! CLI Integration Tests
//!
//! These tests run the `shelly` binary against temporary databases and
//! config files. None of them need a device on the network.
//!
//! ```
//! cargo test --package shelly-cli --test cli_integration
//! ```

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use shelly_store::{MeterReading, Store};
use tempfile::TempDir;

/// Isolated environment: its own config file and database.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("shem_data.db")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_shelly"))
            .args(args)
            .env("SHELLY_CONFIG", self.config_path())
            .env_remove("SHELLY_DEVICE")
            .env_remove("SHELLY_DB")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to run shelly binary")
    }

    fn run_with_db(&self, args: &[&str]) -> Output {
        let db = self.db_path();
        let mut full = vec!["--db", db.to_str().unwrap()];
        full.extend_from_slice(args);
        self.run(&full)
    }

    fn seed(&self) -> Store {
        let store = Store::open(self.db_path()).unwrap();
        for (power, ts) in [
            (100.0, "2024-01-01 00:00:00"),
            (200.0, "2024-01-01 00:05:00"),
            (300.0, "2024-01-02 00:00:00"),
        ] {
            store
                .insert_reading_at(
                    &MeterReading::new(Some(power), Some(1000.0), Some(10.0)),
                    ts,
                )
                .unwrap();
        }
        store
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn row_count(path: &Path) -> u64 {
    Store::open(path).unwrap().count_readings().unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = Sandbox::new().run(&["--help"]);
    assert!(output.status.success(), "Help should succeed");

    let text = stdout(&output);
    for command in ["status", "read", "log", "watch", "history", "plot", "config"] {
        assert!(text.contains(command), "Help should list {}", command);
    }
}

#[test]
fn test_version_command() {
    let output = Sandbox::new().run(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("shelly"));
}

#[test]
fn test_completions_bash() {
    let output = Sandbox::new().run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("shelly"));
}

// =============================================================================
// History and Plot
// =============================================================================

#[test]
fn test_history_csv_for_one_day() {
    let sandbox = Sandbox::new();
    sandbox.seed();

    let output = sandbox.run_with_db(&[
        "history",
        "--since",
        "2024-01-01",
        "--until",
        "2024-01-01",
        "--format",
        "csv",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "id,timestamp,power_w,total_wh,total_returned_wh");
    assert!(lines[1].starts_with("1,2024-01-01 00:00:00,100,"));
    assert!(lines[2].starts_with("2,2024-01-01 00:05:00,200,"));
}

#[test]
fn test_history_json_limit_returns_latest_rows() {
    let sandbox = Sandbox::new();
    sandbox.seed();

    let output = sandbox.run_with_db(&["history", "--limit", "2", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let rows: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["timestamp"], "2024-01-01 00:05:00");
    assert_eq!(rows[1]["timestamp"], "2024-01-02 00:00:00");
}

#[test]
fn test_history_empty_range() {
    let sandbox = Sandbox::new();
    sandbox.seed();

    let output = sandbox.run_with_db(&["history", "--since", "2030-01-01"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No readings found for the specified range."));
}

#[test]
fn test_history_rejects_bad_bound() {
    let sandbox = Sandbox::new();
    let output = sandbox.run_with_db(&["history", "--since", "last tuesday"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid --since"));
}

#[test]
fn test_history_writes_output_file() {
    let sandbox = Sandbox::new();
    sandbox.seed();
    let out = sandbox.dir.path().join("export.csv");

    let output = sandbox.run_with_db(&["history", "--format", "csv", "-o", out.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), 4);
}

#[test]
fn test_plot_empty_range_reports_no_data() {
    let sandbox = Sandbox::new();
    let output = sandbox.run_with_db(&["plot", "--since", "2024-01-01", "--until", "2024-01-01"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "No data found for the specified range."
    );
}

#[test]
fn test_plot_no_data_message_follows_output_file() {
    let sandbox = Sandbox::new();
    let out = sandbox.dir.path().join("plot.txt");

    let output = sandbox.run_with_db(&[
        "plot",
        "--since",
        "2024-01-01",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "No data found for the specified range.\n"
    );
}

#[test]
fn test_plot_draws_chart() {
    let sandbox = Sandbox::new();
    sandbox.seed();

    let output = sandbox.run_with_db(&[
        "plot", "--since", "2024-01-01", "--until", "2024-01-02", "--width", "100", "--height",
        "15",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert_eq!(text.lines().count(), 15);
    assert!(text.contains("Power, 3 readings"));
    assert!(text.contains("2024-01-01 00:00:00"));
}

// =============================================================================
// Device commands without a reachable device
// =============================================================================

#[test]
fn test_read_without_device_explains_how_to_set_one() {
    let output = Sandbox::new().run(&["read"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("No device specified"));
    assert!(err.contains("SHELLY_DEVICE"));
}

#[test]
fn test_log_unreachable_device_stores_nothing() {
    let sandbox = Sandbox::new();
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let address = format!("127.0.0.1:{}", port);

    let output = sandbox.run_with_db(&["log", "--device", &address, "--timeout", "1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("nothing was stored"));
    assert_eq!(row_count(&sandbox.db_path()), 0);
}

#[test]
fn test_watch_gives_up_after_missed_polls() {
    let sandbox = Sandbox::new();
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let address = format!("127.0.0.1:{}", port);

    let output = sandbox.run_with_db(&[
        "watch",
        "--device",
        &address,
        "--timeout",
        "1",
        "--interval",
        "1",
        "--count",
        "1",
        "--max-missed",
        "2",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Giving up after 2 missed polls in a row"));
    assert_eq!(row_count(&sandbox.db_path()), 0);
}

#[test]
fn test_status_rejects_bad_address() {
    let output = Sandbox::new().run(&["status", "--device", "ftp://10.0.0.7"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ftp://10.0.0.7"));
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_config_set_get_and_path() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["config", "path"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        sandbox.config_path().display().to_string()
    );

    let output = sandbox.run(&["config", "set", "index", "1"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = sandbox.run(&["config", "get", "index"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "1");

    let output = sandbox.run(&["config", "get", "device"]);
    assert!(!output.status.success());
}

#[test]
fn test_config_device_used_when_flag_missing() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["config", "set", "device", "ftp://from-config"]);
    assert!(output.status.success());

    // The configured address is picked up and rejected for its scheme
    let output = sandbox.run(&["status"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ftp://from-config"));
}

#[test]
fn test_config_db_path_used_when_flag_missing() {
    let sandbox = Sandbox::new();
    sandbox.seed();
    let db = sandbox.db_path();

    let output = sandbox.run(&["config", "set", "db-path", db.to_str().unwrap()]);
    assert!(output.status.success());

    let output = sandbox.run(&["history", "--format", "csv", "--no-header"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).lines().count(), 3);
}
