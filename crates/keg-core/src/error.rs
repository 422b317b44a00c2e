//! Umbrella error for the install pipeline.

use crate::acceptance::ExecutionError;
use crate::checksum::ChecksumError;
use crate::fetch::FetchError;
use crate::resolve::NotFoundError;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("{url}: {source}")]
    Checksum {
        url: String,
        #[source]
        source: ChecksumError,
    },

    #[error("acceptance test failed: {0}")]
    Execution(#[from] ExecutionError),

    #[error("cannot unpack {asset}: {source}")]
    Archive {
        asset: String,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {asset} does not contain binary '{name}'")]
    MissingBinary { asset: String, name: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| InstallError::Io { context, source }
    }
}
