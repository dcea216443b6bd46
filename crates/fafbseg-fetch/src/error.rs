//! Error types for artifact retrieval and assembly.
//!
//! [`FetchError`] is per item and recoverable when the caller asked for
//! failures to be omitted. [`SetupError`] (directories, HTTP client,
//! configuration) always aborts.

use std::path::PathBuf;

use fafbseg_core::{FafbsegError, SegmentId};

/// Failure fetching one segment's artifact.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP transport error.
    #[error("HTTP error fetching segment {segment} from {url}: {source}")]
    Http {
        segment: SegmentId,
        url: String,
        source: reqwest::Error,
    },
    /// The service returned a non-2xx status.
    #[error("service returned {status} for segment {segment} ({url}): {body}")]
    Status {
        segment: SegmentId,
        url: String,
        status: u16,
        body: String,
    },
    /// The artifact could not be written to disk.
    #[error("failed to write artifact {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Any other capability failure.
    #[error("fetch of segment {segment} failed: {reason}")]
    Failed { segment: SegmentId, reason: String },
}

/// Fatal failure preparing a bulk operation.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The target directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    /// The API token cannot be sent as a header value.
    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Failure of a bulk fetch.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Setup failed before any fetch.
    #[error("setup error: {0}")]
    Setup(#[from] SetupError),
    /// A fetch failed and failures were not being omitted.
    #[error("aborted at segment {segment}: {source}")]
    Fetch {
        segment: SegmentId,
        #[source]
        source: FetchError,
    },
}

/// Failure loading a fetched artifact.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read artifact {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file was read but is unusable.
    #[error("unusable artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Failure of mesh assembly.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// The scene reference could not be resolved.
    #[error("segment resolution failed: {0}")]
    Resolve(#[from] FafbsegError),
    /// Working directory setup failed.
    #[error("setup error: {0}")]
    Setup(#[from] SetupError),
    /// The bulk fetch failed.
    #[error("bulk fetch failed: {0}")]
    Cache(#[from] CacheError),
    /// A fetched artifact could not be loaded.
    #[error("failed to load segment {segment}: {source}")]
    Load {
        segment: SegmentId,
        #[source]
        source: LoadError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_error_names_segment() {
        let err = CacheError::Fetch {
            segment: SegmentId::new(42),
            source: FetchError::Failed {
                segment: SegmentId::new(42),
                reason: "boom".into(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn setup_converts_into_cache_and_assembly_errors() {
        let setup = SetupError::InvalidToken;
        let cache: CacheError = setup.into();
        assert!(matches!(cache, CacheError::Setup(SetupError::InvalidToken)));
        let assembly: AssemblyError = cache.into();
        assert!(matches!(assembly, AssemblyError::Cache(_)));
    }
}
