use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    _temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self {
            _temp_dir: temp_dir,
            db_path,
        }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskmill").expect("Failed to find taskmill binary");
        cmd.env("TASKMILL_DATABASE_PATH", &self.db_path);
        cmd
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// Fixed identities reused across tests
pub const AGENCY: &str = "018f4e6a-0000-7000-8000-000000000001";
pub const USER: &str = "018f4e6a-0000-7000-8000-000000000002";

/// Arguments for a daily template owned by [`AGENCY`]
pub fn daily_template_args(title: &'static str) -> Vec<&'static str> {
    vec![
        "add",
        title,
        "--agency",
        AGENCY,
        "--user",
        USER,
        "--frequency",
        "daily",
        "--start-date",
        "2020-01-01",
    ]
}
