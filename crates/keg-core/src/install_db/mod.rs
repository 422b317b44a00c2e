//! Persistent record of installed formulae (SQLite via sqlx).
//!
//! One row per formula name: the installed version, where it came from,
//! whether its checksum was verified, and which binaries it placed.

mod db;
mod records;
mod types;

pub use db::InstallDb;
pub use types::InstallRecord;
