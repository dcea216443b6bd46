//! # Mesh Assembly
//!
//! Goes from a scene reference to loaded, labelled artifacts in one call:
//!
//! 1. acquire a working directory (the caller's, or a temporary one),
//! 2. resolve the scene to segment ids, visible segments only by default,
//! 3. fetch their artifacts through the bulk cache, omitting failures by
//!    default,
//! 4. load every surviving artifact and label it with its segment.
//!
//! A temporary working directory is removed when the call returns, whether
//! it succeeded or failed. Loaded objects must therefore own their data.

use std::path::{Path, PathBuf};

use fafbseg_scene::{NeuroglancerDecoder, ResolveOptions, SceneDecoder, SceneRef, SegmentResolver};
use tempfile::TempDir;

use crate::cache::{fetch_all, CacheOptions};
use crate::error::{AssemblyError, SetupError};
use crate::fetcher::{ArtifactFetcher, MeshFormat};
use crate::loader::{ArtifactLoader, LabeledObject};

/// Working directory for one assembly call.
#[derive(Debug)]
pub enum WorkDir {
    /// Caller-supplied directory, left in place.
    Persistent(PathBuf),
    /// Temporary directory, deleted recursively on drop.
    Ephemeral(TempDir),
}

impl WorkDir {
    /// Use `target` when given, otherwise create a temporary directory.
    pub fn acquire(target: Option<&Path>) -> Result<Self, SetupError> {
        match target {
            Some(dir) => Ok(Self::Persistent(dir.to_path_buf())),
            None => tempfile::Builder::new()
                .prefix("fafbseg-")
                .tempdir()
                .map(Self::Ephemeral)
                .map_err(|source| SetupError::CreateDir {
                    path: std::env::temp_dir(),
                    source,
                }),
        }
    }

    /// The directory path.
    pub fn path(&self) -> &Path {
        match self {
            Self::Persistent(p) => p,
            Self::Ephemeral(t) => t.path(),
        }
    }

    /// True for a directory that is deleted on drop.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Ephemeral(_))
    }
}

/// Options for [`MeshAssembler::fetch_meshes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Persistent directory to fetch into; `None` uses a temporary one.
    pub target_dir: Option<PathBuf>,
    pub format: MeshFormat,
    /// Also fetch hidden segments.
    pub include_hidden: bool,
    /// Skip segments whose fetch fails.
    pub omit_failures: bool,
    /// Refetch artifacts already in `target_dir`.
    pub force: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            target_dir: None,
            format: MeshFormat::default(),
            include_hidden: false,
            omit_failures: true,
            force: false,
        }
    }
}

/// Resolves, fetches and loads the artifacts of a scene.
#[derive(Debug)]
pub struct MeshAssembler<F, L, D = NeuroglancerDecoder> {
    resolver: SegmentResolver<D>,
    fetcher: F,
    loader: L,
}

impl<F, L> MeshAssembler<F, L>
where
    F: ArtifactFetcher,
    L: ArtifactLoader,
{
    /// Assembler using the default scene decoder.
    pub fn new(fetcher: F, loader: L) -> Self {
        Self::with_resolver(SegmentResolver::neuroglancer(), fetcher, loader)
    }
}

impl<F, L, D> MeshAssembler<F, L, D>
where
    F: ArtifactFetcher,
    L: ArtifactLoader,
    D: SceneDecoder,
{
    /// Assembler with an explicit resolver.
    pub fn with_resolver(resolver: SegmentResolver<D>, fetcher: F, loader: L) -> Self {
        Self {
            resolver,
            fetcher,
            loader,
        }
    }

    /// The artifact fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch and load the artifacts of every segment in `scene`.
    ///
    /// Returns an empty collection when no artifact survives.
    pub fn fetch_meshes(
        &self,
        scene: &SceneRef,
        opts: &AssemblyOptions,
    ) -> Result<Vec<LabeledObject<L::Object>>, AssemblyError> {
        let workdir = WorkDir::acquire(opts.target_dir.as_deref())?;

        let ids = self
            .resolver
            .resolve(scene, ResolveOptions::default().with_hidden(opts.include_hidden))?
            .into_ids()?;
        tracing::info!(
            segments = ids.len(),
            dir = %workdir.path().display(),
            ephemeral = workdir.is_ephemeral(),
            "assembling meshes"
        );

        let cache_opts = CacheOptions {
            target_dir: Some(workdir.path().to_path_buf()),
            format: opts.format,
            force: opts.force,
            omit_failures: opts.omit_failures,
        };
        let manifest = fetch_all(&ids, &cache_opts, &self.fetcher)?;

        let mut objects = Vec::with_capacity(manifest.len());
        for (segment, path) in &manifest {
            let object = self
                .loader
                .load(*segment, path)
                .map_err(|source| AssemblyError::Load {
                    segment: *segment,
                    source,
                })?;
            objects.push(LabeledObject {
                segment: *segment,
                path: path.clone(),
                object,
            });
        }

        if !manifest.failed().is_empty() {
            tracing::warn!(
                failed = manifest.failed().len(),
                loaded = objects.len(),
                "some segments have no artifact"
            );
        }
        Ok(objects)
    }
}
