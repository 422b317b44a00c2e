//! Post-install acceptance test: run the installed binary and check that it
//! reports the expected version.

use crate::formula::Formula;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("failed to run {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} exited with {status}: {output}")]
    Failed {
        path: PathBuf,
        status: std::process::ExitStatus,
        output: String,
    },
    #[error("{path} output does not mention '{expected}': {output}")]
    VersionMismatch {
        path: PathBuf,
        expected: String,
        output: String,
    },
}

/// Run `path` with the formula's test arguments and require `expected` in
/// stdout or stderr. Returns the first output line containing it.
pub fn run_acceptance(path: &Path, args: &[String], expected: &str) -> Result<String, ExecutionError> {
    tracing::debug!("acceptance: {} {}", path.display(), args.join(" "));
    let out = Command::new(path)
        .args(args)
        .output()
        .map_err(|source| ExecutionError::Spawn {
            path: path.to_path_buf(),
            source,
        })?;

    let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&out.stderr));
    let output = output.trim().to_string();

    if !out.status.success() {
        return Err(ExecutionError::Failed {
            path: path.to_path_buf(),
            status: out.status,
            output,
        });
    }

    match output.lines().find(|l| l.contains(expected)) {
        Some(line) => Ok(line.trim().to_string()),
        None => Err(ExecutionError::VersionMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            output,
        }),
    }
}

/// Acceptance test for an installed formula binary.
pub fn verify(installed: &Path, formula: &Formula) -> Result<String, ExecutionError> {
    run_acceptance(installed, &formula.test.args, formula.expected_test_output())
}
