use crate::fetch::FetchOptions;
use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per download (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_secs: 0.5,
            max_delay_secs: 10,
        }
    }
}

/// Global configuration loaded from `~/.config/keg/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KegConfig {
    /// Directory of formula manifests. Defaults to `$XDG_DATA_HOME/keg/Formula`.
    #[serde(default)]
    pub tap_dir: Option<PathBuf>,
    /// Where binaries are installed. Defaults to `~/.local/bin`.
    #[serde(default)]
    pub bin_dir: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    /// Upper bound on a whole download.
    pub timeout_secs: u64,
    /// Run each formula's acceptance test after installing.
    pub run_tests: bool,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for KegConfig {
    fn default() -> Self {
        Self {
            tap_dir: None,
            bin_dir: None,
            connect_timeout_secs: 30,
            timeout_secs: 600,
            run_tests: true,
            retry: None,
        }
    }
}

impl KegConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            retry: self
                .retry
                .as_ref()
                .map(RetryPolicy::from)
                .unwrap_or_default(),
            ..FetchOptions::default()
        }
    }

    pub fn tap_dir(&self) -> Result<PathBuf> {
        match &self.tap_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let xdg_dirs = xdg::BaseDirectories::with_prefix("keg")?;
                Ok(xdg_dirs.get_data_home().join("Formula"))
            }
        }
    }

    pub fn bin_dir(&self) -> Result<PathBuf> {
        match &self.bin_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let home = std::env::var_os("HOME").context("HOME is not set; configure bin_dir")?;
                Ok(PathBuf::from(home).join(".local").join("bin"))
            }
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("keg")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<KegConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = KegConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: KegConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = KegConfig::default();
        assert_eq!(cfg.connect_timeout_secs, 30);
        assert_eq!(cfg.timeout_secs, 600);
        assert!(cfg.run_tests);
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn default_config_serializes_and_parses() {
        let cfg = KegConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: KegConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.timeout_secs, cfg.timeout_secs);
        assert_eq!(parsed.run_tests, cfg.run_tests);
        assert!(parsed.tap_dir.is_none());
    }

    #[test]
    fn config_toml_custom_dirs_and_retry() {
        let toml = r#"
            tap_dir = "/opt/keg/Formula"
            bin_dir = "/opt/keg/bin"
            connect_timeout_secs = 5
            timeout_secs = 60
            run_tests = false

            [retry]
            max_attempts = 2
            base_delay_secs = 0.25
            max_delay_secs = 3
        "#;
        let cfg: KegConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.tap_dir().unwrap(), PathBuf::from("/opt/keg/Formula"));
        assert_eq!(cfg.bin_dir().unwrap(), PathBuf::from("/opt/keg/bin"));
        assert!(!cfg.run_tests);

        let opts = cfg.fetch_options();
        assert_eq!(opts.connect_timeout, Duration::from_secs(5));
        assert_eq!(opts.timeout, Duration::from_secs(60));
        assert_eq!(opts.retry.max_attempts, 2);
        assert_eq!(opts.retry.base_delay, Duration::from_millis(250));
    }

    #[test]
    fn missing_retry_uses_policy_default() {
        let opts = KegConfig::default().fetch_options();
        assert_eq!(opts.retry, RetryPolicy::default());
    }

    #[test]
    fn huge_retry_delay_does_not_panic() {
        let toml = r#"
            connect_timeout_secs = 30
            timeout_secs = 600
            run_tests = true

            [retry]
            max_attempts = 3
            base_delay_secs = 1e30
            max_delay_secs = 10
        "#;
        let cfg: KegConfig = toml::from_str(toml).unwrap();
        let opts = cfg.fetch_options();
        assert_eq!(opts.retry.base_delay, Duration::from_secs(10));
    }
}
