//! `keg uninstall <name>` – delete installed binaries and forget the install.

use anyhow::{Context, Result};
use keg_core::install_db::{InstallDb, InstallRecord};

use super::remove_binaries;
use crate::cli::session::Session;

pub async fn run_uninstall(session: &Session, name: &str) -> Result<()> {
    let db = session.db().await?;
    let record = uninstall_recorded(&db, name).await?;
    for path in &record.bin_paths {
        println!("Removed {}", path.display());
    }
    println!("Uninstalled {name} {}", record.version);
    Ok(())
}

/// Remove the binaries of the installed `name`, then its row.
pub(crate) async fn uninstall_recorded(db: &InstallDb, name: &str) -> Result<InstallRecord> {
    let record = db
        .get_install(name)
        .await?
        .with_context(|| format!("{name} is not installed"))?;
    remove_binaries(&record.bin_paths).await?;
    db.remove_install(name).await?;
    Ok(record)
}
