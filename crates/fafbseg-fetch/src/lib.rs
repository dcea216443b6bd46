//! # fafbseg-fetch: Bulk Artifact Retrieval
//!
//! Downloads per-segment artifacts (meshes, skeletons) from a remote
//! service into a directory and assembles them for a scene.
//!
//! - [`fetch_all`]: resumable bulk fetch with an on-disk ledger; existing
//!   `<id>.<ext>` files are skipped, failures optionally omitted.
//! - [`MeshAssembler`]: scene reference in, labelled loaded artifacts out,
//!   using a temporary working directory unless given one.
//! - [`HttpArtifactFetcher`]: the production [`ArtifactFetcher`], configured
//!   by [`FetchConfig`].
//!
//! ## Capabilities
//!
//! Fetching and loading are traits ([`ArtifactFetcher`], [`ArtifactLoader`])
//! so the bulk logic runs against test doubles. Any
//! `Fn(SegmentId, MeshFormat, &Path) -> Result<(), FetchError>` closure is a
//! fetcher.
//!
//! All work is sequential and blocking. Do not call into this crate from an
//! async task without moving to a blocking thread first.

pub mod assembly;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod loader;
mod retry;

pub use assembly::{AssemblyOptions, MeshAssembler, WorkDir};
pub use cache::{artifact_path, fetch_all, ArtifactManifest, CacheOptions};
pub use config::{ConfigError, FetchConfig, DEFAULT_PATH_TEMPLATE};
pub use error::{AssemblyError, CacheError, FetchError, LoadError, SetupError};
pub use fetcher::{ArtifactFetcher, MeshFormat, UnknownFormat};
pub use http::HttpArtifactFetcher;
pub use loader::{ArtifactLoader, LabeledObject, RawArtifact, RawArtifactLoader};
