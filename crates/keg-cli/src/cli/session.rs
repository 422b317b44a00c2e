//! Per-invocation state: config, tap location, install database.

use anyhow::{Context, Result};
use keg_core::config::{self, KegConfig};
use keg_core::install_db::InstallDb;
use keg_core::Tap;
use std::path::PathBuf;

pub struct Session {
    pub cfg: KegConfig,
    pub tap_dir: PathBuf,
}

impl Session {
    /// Load config; `tap_override` (from `--tap`) wins over the configured tap dir.
    pub fn load(tap_override: Option<PathBuf>) -> Result<Self> {
        let cfg = config::load_or_init()?;
        let tap_dir = match tap_override {
            Some(dir) => dir,
            None => cfg.tap_dir()?,
        };
        Ok(Self { cfg, tap_dir })
    }

    pub fn tap(&self) -> Result<Tap> {
        Tap::load_dir(&self.tap_dir).with_context(|| {
            format!(
                "cannot load tap at {} (set tap_dir in config or pass --tap)",
                self.tap_dir.display()
            )
        })
    }

    pub async fn db(&self) -> Result<InstallDb> {
        InstallDb::open_default().await
    }
}
