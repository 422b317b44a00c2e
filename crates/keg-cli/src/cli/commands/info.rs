//! `keg info <name>` – formula details and install status.

use anyhow::Result;

use crate::cli::session::Session;

pub async fn run_info(session: &Session, name: &str) -> Result<()> {
    let tap = session.tap()?;
    let formula = tap.latest(name)?;
    let db = session.db().await?;
    let installed = db.get_install(name).await?;

    println!("{}: {}", formula.name, formula.version);
    println!("{}", formula.desc);
    println!("{}", formula.homepage);
    println!("License: {}", formula.license);
    println!("Versions: {}", tap.versions(name).join(", "));
    let platforms: Vec<String> = formula
        .supported_platforms()
        .iter()
        .map(|p| p.to_string())
        .collect();
    println!("Platforms: {}", platforms.join(", "));
    match installed {
        Some(rec) => println!(
            "Installed: {} ({}, {})",
            rec.version,
            rec.platform,
            if rec.verified { "verified" } else { "unverified" }
        ),
        None => println!("Not installed"),
    }
    if let Some(caveats) = &formula.caveats {
        println!("==> Caveats");
        println!("{}", caveats.trim_end());
    }
    Ok(())
}
