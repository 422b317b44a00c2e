//! `keg install <name>` – resolve, download, verify, test, install, record.

use anyhow::{Context, Result};
use keg_core::install_db::{InstallDb, InstallRecord};
use keg_core::{install_formula, Arch, Formula, InstallReport, Os, PipelineOptions, Platform};
use std::path::PathBuf;

use super::{remove_binaries, select_platform};
use crate::cli::session::Session;

#[derive(Debug)]
pub struct InstallArgs {
    pub name: String,
    pub version: Option<String>,
    pub bin_dir: Option<PathBuf>,
    pub os: Option<Os>,
    pub arch: Option<Arch>,
    pub skip_test: bool,
}

pub async fn run_install(session: &Session, args: InstallArgs) -> Result<()> {
    let tap = session.tap()?;
    let formula = tap.find(&args.name, args.version.as_deref())?.clone();
    let platform = select_platform(args.os, args.arch)?;
    let bin_dir = match args.bin_dir {
        Some(dir) => dir,
        None => session.cfg.bin_dir()?,
    };
    let opts = PipelineOptions {
        fetch: session.cfg.fetch_options(),
        run_test: session.cfg.run_tests && !args.skip_test,
    };

    println!(
        "==> Installing {} {} ({})",
        formula.name, formula.version, platform
    );
    let db = session.db().await?;
    let report = install_and_record(&db, formula, platform, bin_dir, opts).await?;

    for path in &report.outcome.bin_paths {
        println!("    {}", path.display());
    }
    if report.outcome.verification.is_verified() {
        println!("    sha256 verified");
    } else {
        println!(
            "    Warning: no checksum published; installed unverified (sha256 {})",
            report.outcome.verification.digest()
        );
    }
    if let Some(line) = &report.test_output {
        println!("    test: {line}");
    }
    if let Some(caveats) = &report.caveats {
        println!("==> Caveats");
        println!("{}", caveats.trim_end());
    }
    Ok(())
}

/// Run the install pipeline and replace the formula's row in `db`.
///
/// Binaries listed by the previous install but not by this one are removed.
/// Nothing is recorded, and the previous install is untouched, on failure.
pub(crate) async fn install_and_record(
    db: &InstallDb,
    formula: Formula,
    platform: Platform,
    bin_dir: PathBuf,
    opts: PipelineOptions,
) -> Result<InstallReport> {
    let previous = db.get_install(&formula.name).await?;
    let report = tokio::task::spawn_blocking(move || {
        install_formula(&formula, platform, &bin_dir, &opts)
    })
    .await
    .context("install task panicked")??;

    if let Some(previous) = previous {
        let stale: Vec<PathBuf> = previous
            .bin_paths
            .into_iter()
            .filter(|p| !report.outcome.bin_paths.contains(p))
            .collect();
        remove_binaries(&stale).await?;
    }

    db.record_install(&InstallRecord::from_report(&report)).await?;
    Ok(report)
}
