//! `keg audit` – validate every manifest in the tap.

use anyhow::{bail, Result};
use keg_core::{Formula, Tap};

use crate::cli::session::Session;

pub fn run_audit(session: &Session) -> Result<()> {
    let mut tap = Tap::new();
    let mut problems = 0usize;

    for path in Tap::manifest_paths(&session.tap_dir)? {
        let formula = match Formula::load(&path) {
            Ok(f) => f,
            Err(e) => {
                println!("error: {}: {}", path.display(), e);
                problems += 1;
                continue;
            }
        };
        for artifact in formula.artifacts.iter().filter(|a| !a.is_verifiable()) {
            println!(
                "warning: {} {} has no sha256 for {}",
                formula.name,
                formula.version,
                artifact.platform()
            );
        }
        if let Err(e) = tap.insert(formula) {
            println!("error: {}: {}", path.display(), e);
            problems += 1;
        }
    }

    if problems > 0 {
        bail!("{problems} manifest problem(s) in {}", session.tap_dir.display());
    }
    println!("{} formulae OK", tap.names().count());
    Ok(())
}
