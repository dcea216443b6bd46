//! # Segment Resolver
//!
//! Collapses any [`SceneRef`] into the canonical list of segment ids.
//!
//! ## Exactly One Populated Layer
//!
//! A scene may carry `segments` on more than one layer, for example an image
//! layer with a stray `segments` key next to the real segmentation layer.
//! Resolution succeeds only when exactly one layer is populated; zero or
//! several populated layers are errors, and the ambiguous case names every
//! populated layer so the caller can pick one.

use std::borrow::Cow;
use std::collections::HashSet;

use fafbseg_core::{FafbsegError, ResolutionError, SegmentId};
use serde_json::Value;

use crate::decode::{NeuroglancerDecoder, SceneDecoder};
use crate::input::SceneRef;
use crate::layers::{layer_mut, scene_layers, Layer};

/// Options for [`SegmentResolver::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Return ids as text rather than numbers.
    pub as_text: bool,
    /// Include hidden segments alongside visible ones.
    pub include_hidden: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            as_text: true,
            include_hidden: false,
        }
    }
}

impl ResolveOptions {
    /// Numeric output, visible segments only.
    pub fn numeric() -> Self {
        Self {
            as_text: false,
            include_hidden: false,
        }
    }

    /// Set `include_hidden`.
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }
}

/// Resolved segment ids in the requested representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segments {
    /// Ids as decimal text.
    Text(Vec<String>),
    /// Ids as numbers.
    Numeric(Vec<SegmentId>),
}

impl Segments {
    /// Number of ids.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Numeric(v) => v.len(),
        }
    }

    /// True when no ids were resolved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids as text.
    pub fn into_text(self) -> Vec<String> {
        match self {
            Self::Text(v) => v,
            Self::Numeric(v) => v.iter().map(ToString::to_string).collect(),
        }
    }

    /// Ids as numbers. Fails only for text ids that do not fit in 64 bits.
    pub fn into_ids(self) -> Result<Vec<SegmentId>, FafbsegError> {
        match self {
            Self::Numeric(v) => Ok(v),
            Self::Text(v) => v
                .iter()
                .map(|s| SegmentId::parse(s).map_err(FafbsegError::from))
                .collect(),
        }
    }
}

/// Resolves scene references to segment ids through a [`SceneDecoder`].
#[derive(Debug, Clone, Default)]
pub struct SegmentResolver<D = NeuroglancerDecoder> {
    decoder: D,
}

impl SegmentResolver<NeuroglancerDecoder> {
    /// Resolver for neuroglancer scene URLs and JSON.
    pub fn neuroglancer() -> Self {
        Self::new(NeuroglancerDecoder)
    }
}

impl<D: SceneDecoder> SegmentResolver<D> {
    /// Resolver using `decoder` for every text input.
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    /// The decoder in use.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Parse a scene reference into a document.
    ///
    /// Id lists are not scenes and fail with a format error.
    pub fn scene<'a>(&self, scene: &'a SceneRef) -> Result<Cow<'a, Value>, FafbsegError> {
        let value = match scene {
            SceneRef::Parsed(v) => return Ok(Cow::Borrowed(v)),
            SceneRef::Url(text) | SceneRef::Json(text) => self.decoder.decode(text)?,
            SceneRef::File(path) => {
                let contents = std::fs::read_to_string(path).map_err(|source| {
                    fafbseg_core::DecodeError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                self.decoder.decode(&contents)?
            }
            SceneRef::Ids(_) | SceneRef::Literal(_) => {
                return Err(fafbseg_core::FormatError::NotAnObject { found: "array" }.into())
            }
        };
        Ok(Cow::Owned(value))
    }

    /// Layers of a scene reference; `None` when the scene has no layers.
    pub fn layers(&self, scene: &SceneRef) -> Result<Option<Vec<Layer>>, FafbsegError> {
        let value = self.scene(scene)?;
        scene_layers(&value)
    }

    /// Resolve `scene` to segment ids.
    pub fn resolve(
        &self,
        scene: &SceneRef,
        opts: ResolveOptions,
    ) -> Result<Segments, FafbsegError> {
        tracing::debug!(kind = scene.kind(), ?opts, "resolving segments");
        match scene {
            SceneRef::Ids(ids) => Ok(if opts.as_text {
                Segments::Text(ids.iter().map(ToString::to_string).collect())
            } else {
                Segments::Numeric(ids.clone())
            }),
            SceneRef::Literal(tokens) => {
                if opts.as_text {
                    Ok(Segments::Text(tokens.clone()))
                } else {
                    Segments::Text(tokens.clone()).into_ids().map(Segments::Numeric)
                }
            }
            _ => {
                let layers = self.layers(scene)?.ok_or(ResolutionError::NoLayers)?;
                let ids = select_layer_segments(&layers, opts.include_hidden)?;
                Ok(if opts.as_text {
                    Segments::Text(ids.iter().map(ToString::to_string).collect())
                } else {
                    Segments::Numeric(ids)
                })
            }
        }
    }

    /// Resolve `scene` to numeric ids.
    pub fn resolve_ids(
        &self,
        scene: &SceneRef,
        include_hidden: bool,
    ) -> Result<Vec<SegmentId>, FafbsegError> {
        self.resolve(scene, ResolveOptions::numeric().with_hidden(include_hidden))?
            .into_ids()
    }
}

/// Resolve with the default decoder.
pub fn resolve_segments(scene: &SceneRef, opts: ResolveOptions) -> Result<Segments, FafbsegError> {
    SegmentResolver::neuroglancer().resolve(scene, opts)
}

/// The segment set of the single populated layer.
fn select_layer_segments(
    layers: &[Layer],
    include_hidden: bool,
) -> Result<Vec<SegmentId>, FafbsegError> {
    let mut populated = Vec::new();
    for layer in layers {
        let ids = layer.segment_set(include_hidden)?;
        if !ids.is_empty() {
            populated.push((layer, ids));
        }
    }

    match populated.len() {
        0 => Err(ResolutionError::NoSegments.into()),
        1 => {
            let (layer, ids) = populated.remove(0);
            tracing::debug!(layer = %layer.name, count = ids.len(), "resolved segments");
            Ok(ids)
        }
        _ => Err(ResolutionError::Ambiguous {
            layers: populated.iter().map(|(l, _)| l.name.clone()).collect(),
        }
        .into()),
    }
}

/// Replace the visible segments of a scene, returning the updated layer's name.
///
/// The target is the single layer carrying any segments (visible or
/// hidden); failing that, the single segmentation layer. Hidden segments are
/// left untouched. Duplicate ids are dropped, keeping first-seen order.
pub fn set_segments(scene: &mut Value, ids: &[SegmentId]) -> Result<String, FafbsegError> {
    let layers = scene_layers(scene)?.ok_or(ResolutionError::NoLayers)?;

    let populated: Vec<&Layer> = layers.iter().filter(|l| !l.is_empty()).collect();
    let target = match populated.as_slice() {
        [one] => *one,
        [] => {
            let seg: Vec<&Layer> = layers.iter().filter(|l| l.is_segmentation()).collect();
            match seg.as_slice() {
                [one] => *one,
                [] => {
                    return Err(ResolutionError::NoTargetLayer {
                        reason: "no layer has segments and none is a segmentation layer".into(),
                    }
                    .into())
                }
                many => {
                    return Err(ResolutionError::Ambiguous {
                        layers: many.iter().map(|l| l.name.clone()).collect(),
                    }
                    .into())
                }
            }
        }
        many => {
            return Err(ResolutionError::Ambiguous {
                layers: many.iter().map(|l| l.name.clone()).collect(),
            }
            .into())
        }
    };

    let name = target.name.clone();
    let obj = layer_mut(scene, target.index).ok_or_else(|| ResolutionError::NoTargetLayer {
        reason: format!("layer {name} disappeared while updating"),
    })?;

    let mut seen = HashSet::new();
    let values: Vec<Value> = ids
        .iter()
        .filter(|id| seen.insert(**id))
        .map(|id| Value::String(id.to_string()))
        .collect();
    obj.insert("segments".to_string(), Value::Array(values));
    Ok(name)
}
