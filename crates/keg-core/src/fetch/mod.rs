//! Single-stream artifact download over libcurl.
//!
//! The body is streamed into `<dest>.part`, which is renamed to `dest` only
//! after a complete 2xx transfer. Each retry starts the part file over.

mod error;

pub use error::FetchError;

use crate::retry::{run_with_retry, RetryPolicy};
use crate::storage::temp_path;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Transport settings for a download.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Upper bound on the whole transfer.
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(600),
            retry: RetryPolicy::default(),
            user_agent: concat!("keg/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Downloads `url` to `dest`, retrying transient failures. Returns the byte count.
///
/// Supports `http(s)://` and `file://` URLs. Blocking; call from
/// `spawn_blocking` if used from async code.
pub fn fetch_to_file(url: &str, dest: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let part = temp_path(dest);
    let result = run_with_retry(&opts.retry, |attempt| {
        tracing::debug!("GET {} (attempt {})", url, attempt);
        fetch_once(url, &part, opts)
    });
    let written = match result {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&part);
            return Err(e);
        }
    };
    fs::rename(&part, dest)?;
    tracing::info!("downloaded {} bytes from {}", written, url);
    Ok(written)
}

fn fetch_once(url: &str, part: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let mut file = File::create(part)?;
    let mut written = 0u64;
    let mut write_err: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(&opts.user_agent)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    easy.timeout(opts.timeout)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(FetchError::Storage(e));
    }
    performed?;

    // file:// transfers have no status line and report 0.
    let code = easy.response_code()?;
    if code != 0 && !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    file.sync_all()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_url_download() {
        let src_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("tool.bin");
        fs::write(&src, b"binary payload").unwrap();
        let url = url::Url::from_file_path(&src).unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let dest = out_dir.path().join("tool.bin");
        let n = fetch_to_file(url.as_str(), &dest, &FetchOptions::default()).unwrap();
        assert_eq!(n, 14);
        assert_eq!(fs::read(&dest).unwrap(), b"binary payload");
        assert!(!temp_path(&dest).exists());
    }

    #[test]
    fn missing_file_url_fails_without_leaving_part() {
        let out_dir = tempfile::tempdir().unwrap();
        let dest = out_dir.path().join("tool.bin");
        let missing = out_dir.path().join("nope.bin");
        let url = url::Url::from_file_path(&missing).unwrap();
        let opts = FetchOptions {
            retry: RetryPolicy::never(),
            ..FetchOptions::default()
        };
        let err = fetch_to_file(url.as_str(), &dest, &opts).unwrap_err();
        assert!(matches!(err, FetchError::Curl(_)));
        assert!(!dest.exists());
        assert!(!temp_path(&dest).exists());
    }
}
