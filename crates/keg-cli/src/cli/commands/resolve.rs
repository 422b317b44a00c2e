//! `keg resolve <name>` – show the artifact for a platform without installing.

use anyhow::Result;
use keg_core::{resolve, Arch, Os};

use super::select_platform;
use crate::cli::session::Session;

pub fn run_resolve(
    session: &Session,
    name: &str,
    version: Option<&str>,
    os: Option<Os>,
    arch: Option<Arch>,
) -> Result<()> {
    let tap = session.tap()?;
    let formula = tap.find(name, version)?;
    let platform = select_platform(os, arch)?;
    let artifact = resolve(formula, platform)?;

    println!("{} {} ({})", formula.name, formula.version, platform);
    println!("url:    {}", artifact.url);
    if artifact.is_verifiable() {
        println!("sha256: {}", artifact.sha256.trim());
    } else {
        println!("sha256: unverified (not yet published)");
    }
    Ok(())
}
