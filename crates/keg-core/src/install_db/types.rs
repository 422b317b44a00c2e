use crate::install::InstallReport;
use crate::platform::Platform;
use std::path::PathBuf;

/// One installed formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRecord {
    pub name: String,
    pub version: String,
    pub platform: Platform,
    pub url: String,
    /// Checksum published in the manifest (may be empty).
    pub sha256: String,
    /// Digest of what was actually downloaded.
    pub digest: String,
    pub verified: bool,
    pub bin_paths: Vec<PathBuf>,
    /// Unix seconds.
    pub installed_at: i64,
}

impl InstallRecord {
    /// Record for a finished install; `installed_at` is set when stored.
    pub fn from_report(report: &InstallReport) -> Self {
        Self {
            name: report.name.clone(),
            version: report.version.clone(),
            platform: report.platform,
            url: report.artifact.url.clone(),
            sha256: report.artifact.sha256.trim().to_ascii_lowercase(),
            digest: report.outcome.verification.digest().to_string(),
            verified: report.outcome.verification.is_verified(),
            bin_paths: report.outcome.bin_paths.clone(),
            installed_at: 0,
        }
    }
}
