#![deny(missing_docs)]

//! # fafbseg-core: Foundational Types for fafbseg
//!
//! Every other crate in the workspace depends on this one. It has no
//! internal crate dependencies, only `serde`, `serde_json` and `thiserror`
//! from the external ecosystem.
//!
//! ## Contents
//!
//! 1. **[`SegmentId`]**: the 64-bit identifier of a reconstructed object on
//!    a segmentation service. Serialized as a decimal string.
//!
//! 2. **Filename codec** ([`FilenameCodec`], [`parse_filename`]): the
//!    `<segmentID>[.<fragment>].<ext>` naming convention shared by every tool
//!    that reads or writes per-segment artifacts.
//!
//! 3. **Shard mapping** ([`ShardConfig`]): which zip archive of a bulk
//!    export holds a given segment.
//!
//! 4. **[`FafbsegError`] hierarchy**: decode, format, resolution and
//!    validation failures, kept distinct so callers can branch on them.

pub mod error;
pub mod filename;
pub mod identity;
pub mod shard;

pub use error::{DecodeError, FafbsegError, FormatError, ResolutionError, ValidationError};
pub use filename::{artifact_filename, parse_filename, FilenameCodec, ParsedFilename};
pub use identity::{is_decimal_id, SegmentId};
pub use shard::{parse_shard_name, ShardConfig, DEFAULT_SHARD_DIVISOR};
