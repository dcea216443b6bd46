//! Loader capability: turns a fetched artifact file into an in-memory object.
//!
//! Mesh parsing belongs to the caller. [`RawArtifactLoader`] reads the bytes
//! and tags them with the format implied by the extension, which is enough
//! for tools that only need to pass artifacts on.

use std::path::{Path, PathBuf};

use fafbseg_core::SegmentId;

use crate::error::LoadError;
use crate::fetcher::MeshFormat;

/// Capability that loads one artifact file.
pub trait ArtifactLoader {
    /// The loaded object.
    type Object;

    /// Load the artifact of `segment` stored at `path`.
    fn load(&self, segment: SegmentId, path: &Path) -> Result<Self::Object, LoadError>;
}

impl<L: ArtifactLoader + ?Sized> ArtifactLoader for &L {
    type Object = L::Object;

    fn load(&self, segment: SegmentId, path: &Path) -> Result<Self::Object, LoadError> {
        (**self).load(segment, path)
    }
}

/// A loaded object labelled with the segment it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledObject<T> {
    pub segment: SegmentId,
    pub path: PathBuf,
    pub object: T,
}

/// Artifact contents, unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArtifact {
    /// Format implied by the file extension, if recognised.
    pub format: Option<MeshFormat>,
    pub bytes: Vec<u8>,
}

/// Loader returning [`RawArtifact`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawArtifactLoader;

impl ArtifactLoader for RawArtifactLoader {
    type Object = RawArtifact;

    fn load(&self, _segment: SegmentId, path: &Path) -> Result<RawArtifact, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(LoadError::Invalid {
                path: path.to_path_buf(),
                reason: "file is empty".into(),
            });
        }
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(MeshFormat::from_extension);
        Ok(RawArtifact { format, bytes })
    }
}
