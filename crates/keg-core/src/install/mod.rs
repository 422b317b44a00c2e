//! Verified-download install of a resolved artifact.
//!
//! Sequence: download into a private staging directory, check SHA-256,
//! unpack, optionally run the acceptance test on the staged binary, then
//! atomically place each binary into the bin directory.

mod pipeline;

pub use pipeline::{install_formula, InstallReport, PipelineOptions};

use crate::archive::{self, ArchiveKind};
use crate::checksum::{self, Verification};
use crate::error::InstallError;
use crate::fetch::{self, FetchOptions};
use crate::formula::{Formula, PlatformArtifact};
use crate::storage;
use std::path::{Path, PathBuf};

/// What an install put on disk.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Installed executables, in `install.bin` order.
    pub bin_paths: Vec<PathBuf>,
    pub verification: Verification,
}

impl InstallOutcome {
    /// Path of the primary binary (the first `install.bin` entry).
    pub fn primary(&self) -> &Path {
        &self.bin_paths[0]
    }
}

/// Binaries downloaded, verified and unpacked into a private staging
/// directory, not yet visible in any bin directory.
#[derive(Debug)]
pub struct StagedInstall {
    _dir: tempfile::TempDir,
    /// `(install name, staged path)` in `install.bin` order.
    binaries: Vec<(String, PathBuf)>,
    verification: Verification,
}

impl StagedInstall {
    /// Staged copy of the primary binary, executable in place.
    pub fn primary(&self) -> &Path {
        &self.binaries[0].1
    }

    pub fn verification(&self) -> &Verification {
        &self.verification
    }
}

#[derive(Debug, Clone, Default)]
pub struct Installer {
    fetch: FetchOptions,
}

impl Installer {
    pub fn new(fetch: FetchOptions) -> Self {
        Self { fetch }
    }

    /// Download, verify and place the binaries of `artifact` into `dest_dir`.
    ///
    /// An empty stored checksum installs with a warning; a mismatch aborts
    /// before anything is written to `dest_dir`.
    pub fn install(
        &self,
        formula: &Formula,
        artifact: &PlatformArtifact,
        dest_dir: &Path,
    ) -> Result<InstallOutcome, InstallError> {
        let staged = self.stage(formula, artifact)?;
        Self::place(staged, dest_dir)
    }

    /// Download and verify `artifact`, then locate each binary of `formula`
    /// in a staging directory. Nothing outside the staging directory changes.
    pub fn stage(
        &self,
        formula: &Formula,
        artifact: &PlatformArtifact,
    ) -> Result<StagedInstall, InstallError> {
        let staging = tempfile::Builder::new()
            .prefix("keg-")
            .tempdir()
            .map_err(InstallError::io("create staging directory"))?;
        let asset = artifact
            .asset_name()
            .unwrap_or_else(|| format!("{}.download", formula.name));
        let download = staging.path().join(&asset);

        fetch::fetch_to_file(&artifact.url, &download, &self.fetch).map_err(|source| {
            InstallError::Download {
                url: artifact.url.clone(),
                source,
            }
        })?;

        let digest = checksum::sha256_path(&download)
            .map_err(InstallError::io(format!("hash {}", download.display())))?;
        let verification =
            checksum::check_digest(&digest, &artifact.sha256).map_err(|source| {
                InstallError::Checksum {
                    url: artifact.url.clone(),
                    source,
                }
            })?;
        match &verification {
            Verification::Verified { .. } => {
                tracing::info!("{} {}: sha256 verified", formula.name, formula.version)
            }
            Verification::Unverified { digest } => tracing::warn!(
                "{} {}: no checksum published for {}; installing unverified (sha256 {})",
                formula.name,
                formula.version,
                artifact.platform(),
                digest
            ),
        }

        let unpacked = match ArchiveKind::from_asset_name(&asset) {
            ArchiveKind::TarGz => {
                let root = staging.path().join("unpacked");
                std::fs::create_dir(&root).map_err(InstallError::io("create unpack directory"))?;
                archive::unpack_tar_gz(&download, &root).map_err(|source| {
                    InstallError::Archive {
                        asset: asset.clone(),
                        source,
                    }
                })?;
                Some(root)
            }
            ArchiveKind::Raw => None,
        };

        let names = formula.binaries();
        let mut binaries = Vec::with_capacity(names.len());
        for name in &names {
            let src = match &unpacked {
                Some(root) => archive::find_binary(root, name),
                // A bare asset only carries one executable.
                None if names.len() == 1 => Some(download.clone()),
                None => None,
            };
            let src = src.ok_or_else(|| InstallError::MissingBinary {
                asset: asset.clone(),
                name: name.clone(),
            })?;
            storage::set_executable(&src)
                .map_err(InstallError::io(format!("chmod {}", src.display())))?;
            binaries.push((name.clone(), src));
        }

        Ok(StagedInstall {
            _dir: staging,
            binaries,
            verification,
        })
    }

    /// Atomically copy every staged binary into `dest_dir`.
    pub fn place(staged: StagedInstall, dest_dir: &Path) -> Result<InstallOutcome, InstallError> {
        let mut bin_paths = Vec::with_capacity(staged.binaries.len());
        for (name, src) in &staged.binaries {
            let path = storage::install_executable(src, dest_dir, name)
                .map_err(InstallError::io(format!("install {name} into {}", dest_dir.display())))?;
            tracing::info!("installed {}", path.display());
            bin_paths.push(path);
        }

        Ok(InstallOutcome {
            bin_paths,
            verification: staged.verification,
        })
    }
}
