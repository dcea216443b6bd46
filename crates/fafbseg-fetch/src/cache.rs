//! # Bulk Artifact Cache
//!
//! Fetches one artifact per segment into a target directory, strictly one
//! at a time and in input order. The directory doubles as the ledger: an
//! artifact named `<id>.<ext>` that already exists is treated as fetched and
//! skipped unless `force` is set, so an interrupted run can simply be
//! repeated.
//!
//! ## Failure Handling
//!
//! Per-item [`FetchError`](crate::error::FetchError)s are either omitted (logged, recorded in
//! [`ArtifactManifest::failed`], and dropped from the entries) or returned at
//! once as [`CacheError::Fetch`], leaving later ids unfetched. Directory setup
//! failures always abort. Files fetched before an abort stay on disk.
//!
//! Existence is the only completeness check, so fetchers must not leave a
//! partial file at the destination. A truncated file that is already there
//! looks cached on the next run; pass `force` to replace it.

use std::path::{Path, PathBuf};

use fafbseg_core::{artifact_filename, SegmentId};

use crate::error::{CacheError, SetupError};
use crate::fetcher::{ArtifactFetcher, MeshFormat};

/// Options for [`fetch_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// Directory to fetch into. `None` creates a fresh uniquely named
    /// directory under the system temp directory, which is left in place.
    pub target_dir: Option<PathBuf>,
    /// Artifact format, which also fixes the file extension.
    pub format: MeshFormat,
    /// Refetch artifacts that already exist.
    pub force: bool,
    /// Skip failed ids instead of aborting.
    pub omit_failures: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            target_dir: None,
            format: MeshFormat::default(),
            force: false,
            omit_failures: true,
        }
    }
}

impl CacheOptions {
    /// Options fetching into `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: Some(dir.into()),
            ..Self::default()
        }
    }
}

/// Outcome of a bulk fetch: the artifacts available on disk, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactManifest {
    entries: Vec<(SegmentId, PathBuf)>,
    failed: Vec<SegmentId>,
    dir: PathBuf,
}

impl ArtifactManifest {
    /// Path of the artifact for `segment`, if it is available.
    pub fn get(&self, segment: SegmentId) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(id, _)| *id == segment)
            .map(|(_, p)| p.as_path())
    }

    /// Available artifacts as `(segment, path)` pairs.
    pub fn entries(&self) -> &[(SegmentId, PathBuf)] {
        &self.entries
    }

    /// Available artifact paths.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|(_, p)| p.as_path())
    }

    /// Segment ids that failed and were omitted.
    pub fn failed(&self) -> &[SegmentId] {
        &self.failed
    }

    /// Directory holding the artifacts.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of available artifacts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no artifact is available.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ArtifactManifest {
    type Item = &'a (SegmentId, PathBuf);
    type IntoIter = std::slice::Iter<'a, (SegmentId, PathBuf)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Path at which the artifact for `segment` is stored in `dir`.
pub fn artifact_path(dir: &Path, segment: SegmentId, format: MeshFormat) -> PathBuf {
    dir.join(artifact_filename(segment, None, format.extension()))
}

/// Fetch artifacts for `ids` into the options' target directory.
///
/// The fetcher is called at most once per id. With `omit_failures`, the
/// returned manifest lists only the ids that were cached or fetched; without
/// it, the first failure aborts and is returned.
pub fn fetch_all<F>(
    ids: &[SegmentId],
    opts: &CacheOptions,
    fetcher: &F,
) -> Result<ArtifactManifest, CacheError>
where
    F: ArtifactFetcher + ?Sized,
{
    let dir = prepare_dir(opts.target_dir.as_deref())?;

    let planned: Vec<(SegmentId, PathBuf)> = ids
        .iter()
        .map(|&id| (id, artifact_path(&dir, id, opts.format)))
        .collect();

    let total = planned.len();
    let mut entries = Vec::with_capacity(total);
    let mut failed = Vec::new();
    let (mut cached, mut fetched) = (0usize, 0usize);

    for (i, (segment, path)) in planned.into_iter().enumerate() {
        let progress = i + 1;

        if !opts.force && path.exists() {
            cached += 1;
            tracing::info!(%segment, progress, total, outcome = "cached", "artifact");
            entries.push((segment, path));
            continue;
        }

        match fetcher.fetch(segment, opts.format, &path) {
            Ok(()) => {
                fetched += 1;
                tracing::info!(%segment, progress, total, outcome = "fetched", "artifact");
                entries.push((segment, path));
            }
            Err(e) if opts.omit_failures => {
                tracing::info!(%segment, progress, total, outcome = "failed", "artifact");
                tracing::warn!(%segment, error = %e, "omitting segment after failed fetch");
                failed.push(segment);
            }
            Err(e) => {
                tracing::info!(%segment, progress, total, outcome = "failed", "artifact");
                return Err(CacheError::Fetch { segment, source: e });
            }
        }
    }

    tracing::info!(
        dir = %dir.display(),
        total,
        cached,
        fetched,
        failed = failed.len(),
        "bulk fetch complete"
    );

    Ok(ArtifactManifest {
        entries,
        failed,
        dir,
    })
}

/// Resolve and create the target directory.
fn prepare_dir(target: Option<&Path>) -> Result<PathBuf, SetupError> {
    let dir = match target {
        Some(dir) => dir.to_path_buf(),
        None => std::env::temp_dir().join(format!("fafbseg-{}", uuid::Uuid::new_v4())),
    };
    std::fs::create_dir_all(&dir).map_err(|source| SetupError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    tracing::debug!(dir = %dir.display(), "artifact directory ready");
    Ok(dir)
}
