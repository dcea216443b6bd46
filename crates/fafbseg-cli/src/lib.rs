//! # fafbseg-cli: Command-Line Interface
//!
//! Provides the `fafbseg` binary.
//!
//! ## Subcommands
//!
//! - `fafbseg segments`: resolve a scene reference to segment ids.
//! - `fafbseg layers`: list the layers of a scene.
//! - `fafbseg url`: decode scene URLs, encode scene JSON as a URL.
//! - `fafbseg fetch`: resumable bulk artifact download.
//! - `fafbseg meshes`: fetch and load the meshes of a scene.
//! - `fafbseg filename`: segment ids from artifact filenames.
//! - `fafbseg shard`: shard archive of a segment id.
//!
//! Scene references are given as one or more positional arguments: a list
//! of decimal ids, a single `http(s)://` URL, a single path to a JSON file,
//! or JSON text.
//!
//! ```bash
//! fafbseg segments 'https://ngl.flywire.ai/#!%7B%22layers%22...'
//! fafbseg fetch scene.json --dir meshes/ --service-url https://meshes.example.org/
//! fafbseg filename meshes/*.ply
//! ```
//!
//! Results go to stdout, one record per line with tab-separated fields.
//! Logs go to stderr.

pub mod fetch;
pub mod filename;
pub mod layers;
pub mod meshes;
pub mod segments;
pub mod shard;
pub mod url;

use fafbseg_scene::SceneRef;

/// Classify positional scene arguments.
pub fn scene_ref(input: &[String]) -> SceneRef {
    let scene = SceneRef::from_texts(input.iter().map(String::as_str));
    tracing::debug!(kind = scene.kind(), "classified scene input");
    scene
}
