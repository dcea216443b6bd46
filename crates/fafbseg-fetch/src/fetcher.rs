//! # Artifact Fetch Capability
//!
//! The bulk cache never talks to a service directly. It calls an
//! [`ArtifactFetcher`], which writes one segment's artifact to the path it
//! is handed. [`HttpArtifactFetcher`](crate::http::HttpArtifactFetcher) is
//! the production implementation; any closure with the right signature is
//! one too, which is how tests substitute doubles.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use fafbseg_core::SegmentId;

use crate::error::FetchError;

/// File format of a per-segment artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MeshFormat {
    /// Stanford polygon mesh.
    #[default]
    Ply,
    /// Wavefront mesh.
    Obj,
    /// SWC skeleton.
    Swc,
}

impl MeshFormat {
    /// File extension, without a dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ply => "ply",
            Self::Obj => "obj",
            Self::Swc => "swc",
        }
    }

    /// Format implied by a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ply" => Some(Self::Ply),
            "obj" => Some(Self::Obj),
            "swc" => Some(Self::Swc),
            _ => None,
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Unrecognised artifact format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown artifact format \"{0}\" (expected ply, obj or swc)")]
pub struct UnknownFormat(pub String);

impl FromStr for MeshFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim_start_matches('.')).ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// Capability that fetches one segment's artifact into `dest`.
///
/// On success the file at `dest` holds the complete artifact. On failure
/// the implementation should leave no file behind where it can, but callers
/// must not rely on it.
pub trait ArtifactFetcher {
    /// Fetch the artifact of `segment` in `format` and write it to `dest`.
    fn fetch(&self, segment: SegmentId, format: MeshFormat, dest: &Path) -> Result<(), FetchError>;
}

impl<F> ArtifactFetcher for F
where
    F: Fn(SegmentId, MeshFormat, &Path) -> Result<(), FetchError>,
{
    fn fetch(&self, segment: SegmentId, format: MeshFormat, dest: &Path) -> Result<(), FetchError> {
        self(segment, format, dest)
    }
}
