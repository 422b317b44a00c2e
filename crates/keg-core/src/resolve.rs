//! Pick the artifact a formula publishes for a given platform.

use crate::formula::{Formula, PlatformArtifact};
use crate::platform::Platform;
use std::fmt;

/// No artifact for the requested platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundError {
    pub formula: String,
    pub version: String,
    pub platform: Platform,
    pub supported: Vec<Platform>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} has no artifact for {}",
            self.formula, self.version, self.platform
        )?;
        if self.supported.is_empty() {
            write!(f, " (no platforms published)")
        } else {
            let list: Vec<String> = self.supported.iter().map(Platform::to_string).collect();
            write!(f, "; supported: {}", list.join(", "))
        }
    }
}

impl std::error::Error for NotFoundError {}

/// Returns the single artifact for `platform`.
pub fn resolve(formula: &Formula, platform: Platform) -> Result<&PlatformArtifact, NotFoundError> {
    formula
        .artifacts
        .iter()
        .find(|a| a.platform() == platform)
        .ok_or_else(|| NotFoundError {
            formula: formula.name.clone(),
            version: formula.version.clone(),
            platform,
            supported: formula.supported_platforms(),
        })
}
