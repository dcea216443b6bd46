//! # HTTP Artifact Fetcher
//!
//! Production [`ArtifactFetcher`]: GETs `{base_url}/{path_template}` with
//! `{id}` and `{ext}` substituted and streams a 2xx body to the destination
//! file. Non-2xx responses are reported with their status and a body excerpt
//! and leave no file behind.
//!
//! The client is blocking: the bulk cache fetches strictly one segment at a
//! time, and the request timeout comes from [`FetchConfig`].
//!
//! The body is written to `<dest>.part` and renamed into place once the
//! transfer completes, so a failed transfer never leaves a file that looks
//! cached and never clobbers an artifact being refetched.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fafbseg_core::SegmentId;
use url::Url;

use crate::config::FetchConfig;
use crate::error::{FetchError, SetupError};
use crate::fetcher::{ArtifactFetcher, MeshFormat};
use crate::retry::retry_send;

/// Longest response-body excerpt carried in a status error.
const MAX_BODY_EXCERPT: usize = 512;

/// Blocking HTTP client for a per-segment artifact service.
#[derive(Debug)]
pub struct HttpArtifactFetcher {
    client: reqwest::blocking::Client,
    base_url: Url,
    path_template: String,
    max_retries: u32,
}

impl HttpArtifactFetcher {
    /// Create a fetcher from configuration.
    ///
    /// Must not be called from inside an async runtime; the blocking client
    /// owns one of its own.
    pub fn new(config: FetchConfig) -> Result<Self, SetupError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &config.api_token {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| SetupError::InvalidToken)?,
            );
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(SetupError::Client)?;

        // Url::join replaces the last path segment unless the base ends in '/'.
        let mut base_url = config.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            path_template: config.path_template.trim_start_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    /// URL of the artifact for `segment` in `format`.
    pub fn artifact_url(&self, segment: SegmentId, format: MeshFormat) -> Result<Url, FetchError> {
        let path = self
            .path_template
            .replace("{id}", &segment.to_string())
            .replace("{ext}", format.extension());
        self.base_url
            .join(&path)
            .map_err(|e| FetchError::Failed {
                segment,
                reason: format!("invalid artifact URL for path \"{path}\": {e}"),
            })
    }
}

impl ArtifactFetcher for HttpArtifactFetcher {
    fn fetch(&self, segment: SegmentId, format: MeshFormat, dest: &Path) -> Result<(), FetchError> {
        let url = self.artifact_url(segment, format)?;
        tracing::debug!(%segment, %url, "requesting artifact");

        let http_error = |source| FetchError::Http {
            segment,
            url: url.to_string(),
            source,
        };

        let mut resp = retry_send(self.max_retries, || self.client.get(url.clone()).send())
            .map_err(http_error)?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().unwrap_or_default();
            if body.len() > MAX_BODY_EXCERPT {
                let cut = (0..=MAX_BODY_EXCERPT)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(FetchError::Status {
                segment,
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let part = partial_path(dest);
        let mut file = File::create(&part).map_err(|source| FetchError::Write {
            path: part.clone(),
            source,
        })?;
        let copied = resp.copy_to(&mut file);
        drop(file);
        let bytes = match copied {
            Ok(bytes) => bytes,
            Err(e) => {
                discard(&part);
                return Err(http_error(e));
            }
        };
        if let Err(source) = std::fs::rename(&part, dest) {
            discard(&part);
            return Err(FetchError::Write {
                path: dest.to_path_buf(),
                source,
            });
        }
        tracing::debug!(%segment, bytes, path = %dest.display(), "artifact written");
        Ok(())
    }
}

/// Staging path for an in-flight transfer to `dest`.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn discard(part: &Path) {
    if let Err(e) = std::fs::remove_file(part) {
        tracing::warn!(path = %part.display(), error = %e, "could not remove partial artifact");
    }
}
