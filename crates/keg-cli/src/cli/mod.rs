//! CLI for the keg formula installer.

mod commands;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use keg_core::{Arch, Os};
use std::path::{Path, PathBuf};

use commands::{
    run_audit, run_checksum, run_completions, run_formulae, run_info, run_install, run_list,
    run_resolve, run_test, run_uninstall, InstallArgs,
};
use session::Session;

/// Top-level CLI for keg.
#[derive(Debug, Parser)]
#[command(name = "keg")]
#[command(about = "keg: install prebuilt binaries from formula manifests", long_about = None)]
pub struct Cli {
    /// Formula directory to use instead of the configured tap.
    #[arg(long, global = true, value_name = "DIR")]
    pub tap: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download, verify and install a formula's binaries.
    Install {
        name: String,
        /// Install this published version instead of the latest.
        #[arg(long)]
        version: Option<String>,
        /// Directory to place binaries in (default: config bin_dir or ~/.local/bin).
        #[arg(long, value_name = "DIR")]
        bin_dir: Option<PathBuf>,
        /// Target OS (default: host). macos|linux
        #[arg(long)]
        os: Option<Os>,
        /// Target architecture (default: host). x86_64|aarch64
        #[arg(long)]
        arch: Option<Arch>,
        /// Do not run the `--version` acceptance test after installing.
        #[arg(long)]
        skip_test: bool,
    },

    /// Show which artifact a formula would install for a platform.
    Resolve {
        name: String,
        #[arg(long)]
        version: Option<String>,
        #[arg(long)]
        os: Option<Os>,
        #[arg(long)]
        arch: Option<Arch>,
    },

    /// Show formula details and install status.
    Info { name: String },

    /// List formulae available in the tap.
    Formulae,

    /// List installed formulae.
    List,

    /// Re-run the acceptance test of an installed formula.
    Test { name: String },

    /// Remove an installed formula's binaries.
    Uninstall { name: String },

    /// Validate every manifest in the tap.
    Audit,

    /// Compute SHA-256 of a file (e.g. a release asset for a manifest).
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    /// Run commands that never touch config, the tap or the install database.
    /// `None` means the command needs a [`Session`].
    fn run_without_session(&self) -> Option<Result<()>> {
        match self {
            CliCommand::Checksum { path } => Some(run_checksum(Path::new(path))),
            CliCommand::Completions { shell } => {
                run_completions(*shell);
                Some(Ok(()))
            }
            _ => None,
        }
    }

    pub async fn run_from_args() -> Result<()> {
        let Cli { tap, command } = Cli::parse();

        if let Some(result) = command.run_without_session() {
            return result;
        }

        let session = Session::load(tap)?;
        tracing::debug!("loaded config: {:?}", session.cfg);

        match command {
            CliCommand::Install {
                name,
                version,
                bin_dir,
                os,
                arch,
                skip_test,
            } => {
                let args = InstallArgs {
                    name,
                    version,
                    bin_dir,
                    os,
                    arch,
                    skip_test,
                };
                run_install(&session, args).await?
            }
            CliCommand::Resolve {
                name,
                version,
                os,
                arch,
            } => run_resolve(&session, &name, version.as_deref(), os, arch)?,
            CliCommand::Info { name } => run_info(&session, &name).await?,
            CliCommand::Formulae => run_formulae(&session)?,
            CliCommand::List => run_list(&session).await?,
            CliCommand::Test { name } => run_test(&session, &name).await?,
            CliCommand::Uninstall { name } => run_uninstall(&session, &name).await?,
            CliCommand::Audit => run_audit(&session)?,
            CliCommand::Checksum { .. } | CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
