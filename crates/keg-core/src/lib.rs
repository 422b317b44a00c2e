pub mod config;
pub mod logging;

pub mod acceptance;
pub mod archive;
pub mod checksum;
pub mod error;
pub mod fetch;
pub mod formula;
pub mod install;
pub mod install_db;
pub mod platform;
pub mod resolve;
pub mod retry;
pub mod storage;
pub mod tap;

pub use error::InstallError;
pub use formula::{Formula, PlatformArtifact};
pub use install::{
    install_formula, InstallOutcome, InstallReport, Installer, PipelineOptions, StagedInstall,
};
pub use platform::{Arch, Os, Platform};
pub use resolve::{resolve, NotFoundError};
pub use tap::Tap;
