//! `keg checksum <path>` – print SHA-256 for a manifest's `sha256` field.

use anyhow::{Context, Result};
use keg_core::checksum;
use std::path::Path;

pub fn run_checksum(path: &Path) -> Result<()> {
    let digest =
        checksum::sha256_path(path).with_context(|| format!("hash {}", path.display()))?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
