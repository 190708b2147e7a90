//! Running the `sitepipe` binary

use std::path::Path;
use std::process::Command;

/// Result of running the CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// stdout parsed as NDJSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("not JSON ({e}): {line}"))
            })
            .collect()
    }
}

/// Run `sitepipe --root <root> <args>` with a clean environment
pub fn sitepipe(root: &Path, args: &[&str]) -> TestResult {
    let output = Command::new(env!("CARGO_BIN_EXE_sitepipe"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("SITEPIPE_SOURCE")
        .env_remove("SITEPIPE_BUILD")
        .env_remove("SITEPIPE_PORT")
        .env_remove("SITEPIPE_LESSC")
        .env("NO_COLOR", "1")
        .env("TERM", "dumb")
        .output()
        .expect("failed to run sitepipe");

    TestResult {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
