//! Install record CRUD.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::path::PathBuf;

use super::db::{unix_timestamp, InstallDb};
use super::types::InstallRecord;
use crate::platform::Platform;

const COLUMNS: &str =
    "name, version, os, arch, url, sha256, digest, verified, bin_paths_json, installed_at";

fn from_row(row: &SqliteRow) -> Result<InstallRecord> {
    let name: String = row.get("name");
    let os: String = row.get("os");
    let arch: String = row.get("arch");
    let bin_paths_json: String = row.get("bin_paths_json");
    let platform = Platform::new(
        os.parse().with_context(|| format!("install record {name}"))?,
        arch.parse().with_context(|| format!("install record {name}"))?,
    );
    let bin_paths: Vec<PathBuf> = serde_json::from_str(&bin_paths_json)
        .with_context(|| format!("install record {name}: bad bin_paths_json"))?;
    Ok(InstallRecord {
        version: row.get("version"),
        url: row.get("url"),
        sha256: row.get("sha256"),
        digest: row.get("digest"),
        verified: row.get::<i64, _>("verified") != 0,
        installed_at: row.get("installed_at"),
        platform,
        bin_paths,
        name,
    })
}

impl InstallDb {
    /// Insert or replace the record for `record.name`. Returns the stored record
    /// with `installed_at` filled in.
    pub async fn record_install(&self, record: &InstallRecord) -> Result<InstallRecord> {
        let now = unix_timestamp();
        let bin_paths_json = serde_json::to_string(&record.bin_paths)?;
        sqlx::query(&format!(
            "INSERT OR REPLACE INTO installs ({COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ))
        .bind(&record.name)
        .bind(&record.version)
        .bind(record.platform.os.as_str())
        .bind(record.platform.arch.as_str())
        .bind(&record.url)
        .bind(&record.sha256)
        .bind(&record.digest)
        .bind(record.verified as i64)
        .bind(bin_paths_json)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(InstallRecord {
            installed_at: now,
            ..record.clone()
        })
    }

    pub async fn get_install(&self, name: &str) -> Result<Option<InstallRecord>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM installs WHERE name = ?1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(from_row).transpose()
    }

    /// All installed formulae, sorted by name.
    pub async fn list_installs(&self) -> Result<Vec<InstallRecord>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM installs ORDER BY name ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(from_row).collect()
    }

    /// Delete the record for `name`. Returns false if it was not installed.
    pub async fn remove_install(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM installs WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
