//! CLI command handlers, one file per command.

mod audit;
mod checksum;
mod completions;
mod formulae;
mod info;
mod install;
mod list;
mod resolve;
mod uninstall;

pub use audit::run_audit;
pub use checksum::run_checksum;
pub use completions::run_completions;
pub use formulae::run_formulae;
pub use info::run_info;
pub use install::{run_install, InstallArgs};
#[cfg(test)]
pub(crate) use install::install_and_record;
pub use list::run_list;
pub use resolve::run_resolve;
pub use test::run_test;
pub use uninstall::run_uninstall;
#[cfg(test)]
pub(crate) use uninstall::uninstall_recorded;

use anyhow::{Context, Result};
use keg_core::{Arch, Os, Platform};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Target platform from `--os`/`--arch`, defaulting each to the host.
pub(crate) fn select_platform(os: Option<Os>, arch: Option<Arch>) -> Result<Platform> {
    let os = os
        .or_else(Os::current)
        .with_context(|| format!("host OS '{}' is not supported; pass --os", std::env::consts::OS))?;
    let arch = arch.or_else(Arch::current).with_context(|| {
        format!(
            "host architecture '{}' is not supported; pass --arch",
            std::env::consts::ARCH
        )
    })?;
    Ok(Platform::new(os, arch))
}

/// Delete installed binaries; already-missing files only warn.
pub(crate) async fn remove_binaries(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::info!("removed {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("{} already missing", path.display())
            }
            Err(e) => return Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
    Ok(())
}
