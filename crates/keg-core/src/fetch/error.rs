//! Download error type, classified by the retry policy before it is surfaced.

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (bad URL, timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the downloaded bytes to disk failed. Not retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}
