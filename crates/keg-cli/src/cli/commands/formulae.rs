//! `keg formulae` – list the tap.

use anyhow::Result;

use crate::cli::session::Session;

pub fn run_formulae(session: &Session) -> Result<()> {
    let tap = session.tap()?;
    if tap.is_empty() {
        println!("No formulae in {}.", session.tap_dir.display());
        return Ok(());
    }
    println!("{:<16} {:<10} {}", "NAME", "VERSION", "DESCRIPTION");
    for f in tap.latest_formulae() {
        println!("{:<16} {:<10} {}", f.name, f.version, f.desc);
    }
    Ok(())
}
