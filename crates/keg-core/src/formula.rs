//! Formula manifests: a named, versioned package with one prebuilt artifact
//! per supported platform.
//!
//! Manifests are TOML. A formula record is immutable once loaded; a newer
//! release of the same tool is a separate record (see `tap`).

use crate::platform::{Arch, Os, Platform};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Errors from reading or validating a formula manifest.
#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("formula '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// One downloadable release asset for a single (os, arch) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformArtifact {
    pub os: Os,
    pub arch: Arch,
    pub url: String,
    /// Lowercase hex SHA-256. Empty until the release pipeline fills it in.
    #[serde(default)]
    pub sha256: String,
}

impl PlatformArtifact {
    pub fn platform(&self) -> Platform {
        Platform::new(self.os, self.arch)
    }

    /// True when there is a stored checksum to verify against.
    pub fn is_verifiable(&self) -> bool {
        !self.sha256.trim().is_empty()
    }

    /// Last path segment of the URL (the release asset file name).
    pub fn asset_name(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        parsed
            .path_segments()?
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string)
    }
}

/// Binaries copied into the bin directory (`bin.install "<name>"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallSpec {
    #[serde(default)]
    pub bin: Vec<String>,
}

/// Acceptance test: run the binary with `args` and look for `expect` in its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSpec {
    #[serde(default = "default_test_args")]
    pub args: Vec<String>,
    /// Substring the output must contain. Defaults to the formula version.
    #[serde(default)]
    pub expect: Option<String>,
}

fn default_test_args() -> Vec<String> {
    vec!["--version".to_string()]
}

impl Default for TestSpec {
    fn default() -> Self {
        Self {
            args: default_test_args(),
            expect: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    pub name: String,
    pub desc: String,
    pub homepage: String,
    pub version: String,
    pub license: String,
    /// Post-install message for the user (shell integration etc.).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveats: Option<String>,
    #[serde(default)]
    pub install: InstallSpec,
    #[serde(default)]
    pub test: TestSpec,
    #[serde(default, rename = "artifact")]
    pub artifacts: Vec<PlatformArtifact>,
}

impl Formula {
    /// Parse and validate a manifest.
    pub fn from_toml_str(s: &str) -> Result<Self, FormulaError> {
        let formula: Formula = toml::from_str(s)?;
        formula.validate()?;
        Ok(formula)
    }

    /// Read, parse and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, FormulaError> {
        let data = fs::read_to_string(path).map_err(|source| FormulaError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&data)
    }

    /// Parsed semantic version. Valid for any formula that passed `validate`.
    pub fn semver(&self) -> Result<semver::Version, semver::Error> {
        semver::Version::parse(&self.version)
    }

    /// Binary names to install; falls back to the formula name.
    pub fn binaries(&self) -> Vec<String> {
        if self.install.bin.is_empty() {
            vec![self.name.clone()]
        } else {
            self.install.bin.clone()
        }
    }

    /// Substring the acceptance test expects in the binary's output.
    pub fn expected_test_output(&self) -> &str {
        self.test.expect.as_deref().unwrap_or(&self.version)
    }

    pub fn supported_platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> =
            self.artifacts.iter().map(PlatformArtifact::platform).collect();
        platforms.sort();
        platforms
    }

    /// Check manifest invariants: identifier charset, semver version, URL
    /// schemes, checksum shape, one artifact per platform, bare binary names.
    pub fn validate(&self) -> Result<(), FormulaError> {
        let invalid = |reason: String| FormulaError::Invalid {
            name: self.name.clone(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("name is empty".into()));
        }
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._+-".contains(c))
        {
            return Err(invalid(format!("name '{}' has invalid characters", self.name)));
        }
        if let Err(e) = self.semver() {
            return Err(invalid(format!("version '{}' is not semver: {e}", self.version)));
        }
        check_url(&self.homepage).map_err(|e| invalid(format!("homepage: {e}")))?;

        let mut seen = HashSet::new();
        for artifact in &self.artifacts {
            let platform = artifact.platform();
            if !seen.insert(platform) {
                return Err(invalid(format!("duplicate artifact for {platform}")));
            }
            check_url(&artifact.url).map_err(|e| invalid(format!("{platform} url: {e}")))?;
            let sum = artifact.sha256.trim();
            if !sum.is_empty() && (sum.len() != 64 || !sum.chars().all(|c| c.is_ascii_hexdigit())) {
                return Err(invalid(format!(
                    "{platform} sha256 must be 64 hex digits or empty"
                )));
            }
        }

        for bin in &self.install.bin {
            if bin.is_empty() || bin == "." || bin == ".." || bin.contains(['/', '\\']) {
                return Err(invalid(format!("bin entry '{bin}' is not a bare file name")));
            }
        }
        Ok(())
    }
}

fn check_url(s: &str) -> Result<(), String> {
    let parsed = url::Url::parse(s).map_err(|e| format!("invalid URL '{s}': {e}"))?;
    match parsed.scheme() {
        "http" | "https" | "file" => Ok(()),
        other => Err(format!("unsupported scheme '{other}' in '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GHDL: &str = r#"
        name = "ghdl"
        desc = "GitHub download manager"
        homepage = "https://github.com/CaddyGlow/ghdl"
        version = "0.1.3"
        license = "MIT"

        [[artifact]]
        os = "macos"
        arch = "x86_64"
        url = "https://github.com/CaddyGlow/ghdl/releases/download/v0.1.3/ghdl-x86_64-apple-darwin.tar.gz"
        sha256 = "072b039c82d3fbd1dc6a5d07cf9f08ead8f74c6d6d2ef318f8a2b5a5f7f3a5c1"

        [[artifact]]
        os = "linux"
        arch = "x86_64"
        url = "https://github.com/CaddyGlow/ghdl/releases/download/v0.1.3/ghdl-x86_64-unknown-linux-gnu.tar.gz"
        sha256 = "d155a69accb2eab89a91d3d321cff7cb1f1514fa92c3c7458b7cf78e9b44ea25"
    "#;

    #[test]
    fn parse_minimal_manifest_with_defaults() {
        let f = Formula::from_toml_str(GHDL).unwrap();
        assert_eq!(f.name, "ghdl");
        assert_eq!(f.artifacts.len(), 2);
        assert_eq!(f.binaries(), vec!["ghdl".to_string()]);
        assert_eq!(f.test.args, vec!["--version".to_string()]);
        assert_eq!(f.expected_test_output(), "0.1.3");
        assert!(f.caveats.is_none());
    }

    #[test]
    fn asset_name_is_last_url_segment() {
        let f = Formula::from_toml_str(GHDL).unwrap();
        assert_eq!(
            f.artifacts[1].asset_name().as_deref(),
            Some("ghdl-x86_64-unknown-linux-gnu.tar.gz")
        );
    }

    #[test]
    fn duplicate_platform_rejected() {
        let dup = format!(
            "{GHDL}\n[[artifact]]\nos = \"linux\"\narch = \"amd64\"\nurl = \"https://example.com/x.tar.gz\"\n"
        );
        let err = Formula::from_toml_str(&dup).unwrap_err();
        assert!(err.to_string().contains("duplicate artifact for linux/x86_64"));
    }

    #[test]
    fn empty_checksum_is_valid_but_unverifiable() {
        let src = GHDL.replace(
            "d155a69accb2eab89a91d3d321cff7cb1f1514fa92c3c7458b7cf78e9b44ea25",
            "",
        );
        let f = Formula::from_toml_str(&src).unwrap();
        assert!(f.artifacts[0].is_verifiable());
        assert!(!f.artifacts[1].is_verifiable());
    }

    #[test]
    fn malformed_checksum_rejected() {
        let src = GHDL.replace(
            "d155a69accb2eab89a91d3d321cff7cb1f1514fa92c3c7458b7cf78e9b44ea25",
            "not-a-digest",
        );
        assert!(matches!(
            Formula::from_toml_str(&src),
            Err(FormulaError::Invalid { .. })
        ));
    }

    #[test]
    fn non_semver_version_rejected() {
        let src = GHDL.replace("version = \"0.1.3\"", "version = \"latest\"");
        let err = Formula::from_toml_str(&src).unwrap_err();
        assert!(err.to_string().contains("not semver"));
    }

    #[test]
    fn bin_with_path_rejected() {
        let src = format!("{GHDL}\n[install]\nbin = [\"../ghdl\"]\n");
        let err = Formula::from_toml_str(&src).unwrap_err();
        assert!(err.to_string().contains("bare file name"));
    }

    #[test]
    fn ftp_url_rejected() {
        let src = GHDL.replace(
            "https://github.com/CaddyGlow/ghdl/releases/download/v0.1.3/ghdl-x86_64-apple-darwin.tar.gz",
            "ftp://example.com/ghdl.tar.gz",
        );
        let err = Formula::from_toml_str(&src).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn supported_platforms_sorted() {
        let f = Formula::from_toml_str(GHDL).unwrap();
        assert_eq!(
            f.supported_platforms(),
            vec![
                Platform::new(Os::Macos, Arch::X86_64),
                Platform::new(Os::Linux, Arch::X86_64),
            ]
        );
    }

    #[test]
    fn caveats_and_test_overrides_parse() {
        let src = format!(
            "caveats = \"eval \\\"$(shelltape init bash)\\\"\"\n{GHDL}\n[test]\nargs = [\"-V\"]\nexpect = \"ghdl v0.1.3\"\n"
        );
        let f = Formula::from_toml_str(&src).unwrap();
        assert!(f.caveats.as_deref().unwrap().contains("shelltape init bash"));
        assert_eq!(f.test.args, vec!["-V".to_string()]);
        assert_eq!(f.expected_test_output(), "ghdl v0.1.3");
    }
}
