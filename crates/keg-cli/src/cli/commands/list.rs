//! `keg list` – show installed formulae.

use anyhow::Result;

use crate::cli::session::Session;

pub async fn run_list(session: &Session) -> Result<()> {
    let db = session.db().await?;
    let installs = db.list_installs().await?;
    if installs.is_empty() {
        println!("No formulae installed.");
        return Ok(());
    }
    println!("{:<16} {:<10} {:<14} {:<10} {}", "NAME", "VERSION", "PLATFORM", "SHA256", "BINARIES");
    for r in installs {
        let bins: Vec<String> = r.bin_paths.iter().map(|p| p.display().to_string()).collect();
        println!(
            "{:<16} {:<10} {:<14} {:<10} {}",
            r.name,
            r.version,
            r.platform.to_string(),
            if r.verified { "verified" } else { "unverified" },
            bins.join(" ")
        );
    }
    Ok(())
}
