//! # fafbseg-scene: Scene Decoding and Segment Resolution
//!
//! Turns the many ways researchers pass "these neurons" around into one
//! canonical list of [`SegmentId`](fafbseg_core::SegmentId)s:
//!
//! - numeric id lists and decimal-string id lists (returned as given),
//! - neuroglancer-style scene URLs with the state in a `#!` fragment,
//! - files holding scene JSON,
//! - raw scene JSON text and already-parsed documents.
//!
//! ## Pipeline
//!
//! [`SceneRef`] classifies the input, a [`SceneDecoder`] turns text into a
//! document, [`scene_layers`] extracts its layers and
//! [`SegmentResolver::resolve`] collapses the single populated layer into
//! ids. [`encode_url`] and [`set_segments`] go the other way, from ids back
//! to a shareable scene.

pub mod decode;
pub mod input;
pub mod layers;
pub mod resolve;

pub use decode::{
    decode_scene, decode_url, encode_url, looks_like_url, NeuroglancerDecoder, SceneDecoder,
};
pub use input::SceneRef;
pub use layers::{scene_layers, Layer, LayerSegments};
pub use resolve::{resolve_segments, set_segments, ResolveOptions, SegmentResolver, Segments};
