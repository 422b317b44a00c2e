//! A tap: a directory of formula manifests.
//!
//! The same formula name may appear in several files, one per published
//! version. A (name, version) pair can only be published once.

use crate::formula::{Formula, FormulaError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of manifest files inside a tap directory.
pub const MANIFEST_EXT: &str = "toml";

#[derive(Debug, thiserror::Error)]
pub enum TapError {
    #[error("failed to read tap directory {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Manifest {
        path: String,
        #[source]
        source: FormulaError,
    },
    #[error("formula '{name}' version {version} is already published")]
    DuplicateVersion { name: String, version: String },
    #[error("no formula named '{0}' in tap")]
    UnknownFormula(String),
    #[error("formula '{name}' has no version {version}")]
    UnknownVersion { name: String, version: String },
}

/// In-memory index of formula records keyed by name, then version.
#[derive(Debug, Default, Clone)]
pub struct Tap {
    formulae: BTreeMap<String, BTreeMap<semver::Version, Formula>>,
}

impl Tap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifest files in `dir` (non-recursive), sorted by path.
    pub fn manifest_paths(dir: &Path) -> Result<Vec<PathBuf>, TapError> {
        let read_err = |source| TapError::ReadDir {
            path: dir.display().to_string(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == MANIFEST_EXT) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Load every manifest in `dir`. Any invalid manifest fails the whole load.
    pub fn load_dir(dir: &Path) -> Result<Self, TapError> {
        let mut tap = Tap::new();
        for path in Self::manifest_paths(dir)? {
            let formula = Formula::load(&path).map_err(|source| TapError::Manifest {
                path: path.display().to_string(),
                source,
            })?;
            tracing::debug!(
                "loaded formula {} {} from {}",
                formula.name,
                formula.version,
                path.display()
            );
            tap.insert(formula)?;
        }
        Ok(tap)
    }

    /// Add a validated formula record. Rejects a second record for a published version.
    pub fn insert(&mut self, formula: Formula) -> Result<(), TapError> {
        let version = formula.semver().map_err(|e| TapError::Manifest {
            path: formula.name.clone(),
            source: FormulaError::Invalid {
                name: formula.name.clone(),
                reason: e.to_string(),
            },
        })?;
        let versions = self.formulae.entry(formula.name.clone()).or_default();
        if versions.contains_key(&version) {
            return Err(TapError::DuplicateVersion {
                name: formula.name,
                version: formula.version,
            });
        }
        versions.insert(version, formula);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.formulae.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formulae.keys().map(String::as_str)
    }

    /// Highest published version of `name`.
    pub fn latest(&self, name: &str) -> Result<&Formula, TapError> {
        self.formulae
            .get(name)
            .and_then(|v| v.values().next_back())
            .ok_or_else(|| TapError::UnknownFormula(name.to_string()))
    }

    pub fn get(&self, name: &str, version: &str) -> Result<&Formula, TapError> {
        let versions = self
            .formulae
            .get(name)
            .ok_or_else(|| TapError::UnknownFormula(name.to_string()))?;
        let unknown = || TapError::UnknownVersion {
            name: name.to_string(),
            version: version.to_string(),
        };
        let parsed = semver::Version::parse(version).map_err(|_| unknown())?;
        versions.get(&parsed).ok_or_else(unknown)
    }

    /// `latest` when `version` is `None`, otherwise the exact record.
    pub fn find(&self, name: &str, version: Option<&str>) -> Result<&Formula, TapError> {
        match version {
            Some(v) => self.get(name, v),
            None => self.latest(name),
        }
    }

    /// Published versions of `name`, oldest first.
    pub fn versions(&self, name: &str) -> Vec<&str> {
        self.formulae
            .get(name)
            .map(|v| v.values().map(|f| f.version.as_str()).collect())
            .unwrap_or_default()
    }

    /// Latest record of every formula, sorted by name.
    pub fn latest_formulae(&self) -> Vec<&Formula> {
        self.formulae
            .values()
            .filter_map(|v| v.values().next_back())
            .collect()
    }
}
