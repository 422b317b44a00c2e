//! resolve -> download -> verify checksum -> acceptance test -> install.

use super::{InstallOutcome, Installer};
use crate::acceptance;
use crate::error::InstallError;
use crate::fetch::FetchOptions;
use crate::formula::{Formula, PlatformArtifact};
use crate::platform::Platform;
use crate::resolve::resolve;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub fetch: FetchOptions,
    /// Run the formula's acceptance test after placing the binaries.
    pub run_test: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            fetch: FetchOptions::default(),
            run_test: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub name: String,
    pub version: String,
    pub platform: Platform,
    pub artifact: PlatformArtifact,
    pub outcome: InstallOutcome,
    /// Output line of the acceptance test, when it ran.
    pub test_output: Option<String>,
    pub caveats: Option<String>,
}

/// Install `formula` for `platform` into `dest_dir`.
pub fn install_formula(
    formula: &Formula,
    platform: Platform,
    dest_dir: &Path,
    opts: &PipelineOptions,
) -> Result<InstallReport, InstallError> {
    let artifact = resolve(formula, platform)?;
    tracing::info!(
        "installing {} {} for {} from {}",
        formula.name,
        formula.version,
        platform,
        artifact.url
    );

    let staged = Installer::new(opts.fetch.clone()).stage(formula, artifact)?;

    // Test the staged copy; `dest_dir` is untouched until it passes.
    let test_output = if opts.run_test {
        let line = acceptance::verify(staged.primary(), formula)?;
        tracing::info!("{} acceptance test passed: {}", formula.name, line);
        Some(line)
    } else {
        None
    };

    let outcome = Installer::place(staged, dest_dir)?;

    Ok(InstallReport {
        name: formula.name.clone(),
        version: formula.version.clone(),
        platform,
        artifact: artifact.clone(),
        outcome,
        test_output,
        caveats: formula.caveats.clone(),
    })
}
