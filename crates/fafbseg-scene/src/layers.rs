//! # Layer Extraction
//!
//! A scene's `layers` entry is either an array of layer objects (current
//! viewers, each with a `name`) or an object keyed by layer name (legacy
//! states). Both are normalised into an ordered list of [`Layer`]s.
//!
//! Segment lists are kept as raw JSON until resolution so that a malformed
//! entry in a layer nobody asked about cannot fail extraction.

use fafbseg_core::error::json_kind;
use fafbseg_core::{FafbsegError, FormatError, ResolutionError, SegmentId};
use serde_json::{Map, Value};

/// One layer of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name, or `#<index>` when the layer is unnamed.
    pub name: String,
    /// Position within the scene's layer list.
    pub index: usize,
    /// The layer `type` (e.g. `segmentation`, `image`).
    pub layer_type: Option<String>,
    /// Data source URL, when one can be identified.
    pub source: Option<String>,
    segments: Vec<Value>,
    hidden_segments: Vec<Value>,
}

/// Segment ids of one layer, split by visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSegments {
    /// Ids currently rendered.
    pub visible: Vec<SegmentId>,
    /// Ids present but not rendered.
    pub hidden: Vec<SegmentId>,
}

impl Layer {
    fn from_value(
        name_hint: Option<&str>,
        index: usize,
        value: &Value,
    ) -> Result<Self, FormatError> {
        let fallback = || name_hint.map_or_else(|| format!("#{index}"), str::to_string);
        let obj = value.as_object().ok_or_else(|| FormatError::LayerNotObject {
            layer: fallback(),
            found: json_kind(value),
        })?;

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .map_or_else(fallback, str::to_string);

        Ok(Self {
            name,
            index,
            layer_type: obj.get("type").and_then(Value::as_str).map(str::to_string),
            source: obj.get("source").and_then(source_url),
            segments: entries(obj, "segments"),
            hidden_segments: entries(obj, "hiddenSegments"),
        })
    }

    /// True when the layer lists no segment entries at all.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.hidden_segments.is_empty()
    }

    /// True when the layer's `type` marks it as a segmentation layer.
    pub fn is_segmentation(&self) -> bool {
        self.layer_type
            .as_deref()
            .is_some_and(|t| t.starts_with("segmentation"))
    }

    /// Parse the layer's segment entries.
    ///
    /// Entries may be decimal strings or non-negative integers. A string
    /// prefixed with `!` is a hidden segment, the encoding newer viewers use
    /// instead of a separate `hiddenSegments` list.
    pub fn segment_ids(&self) -> Result<LayerSegments, ResolutionError> {
        let mut out = LayerSegments::default();
        for entry in &self.segments {
            match entry.as_str().and_then(|s| s.strip_prefix('!')) {
                Some(hidden) => out.hidden.push(self.parse_entry(entry, hidden)?),
                None => out.visible.push(self.parse_value(entry)?),
            }
        }
        for entry in &self.hidden_segments {
            let id = self.parse_value(entry)?;
            out.hidden.push(id);
        }
        Ok(out)
    }

    /// Visible segments, plus hidden ones when `include_hidden` is set,
    /// in first-seen order with duplicates removed.
    ///
    /// Hidden entries are only parsed when they are requested.
    pub fn segment_set(&self, include_hidden: bool) -> Result<Vec<SegmentId>, ResolutionError> {
        let mut ids = Vec::new();
        let mut hidden = Vec::new();
        for entry in &self.segments {
            match entry.as_str().and_then(|s| s.strip_prefix('!')) {
                Some(text) if include_hidden => hidden.push(self.parse_entry(entry, text)?),
                Some(_) => {}
                None => ids.push(self.parse_value(entry)?),
            }
        }
        if include_hidden {
            for entry in &self.hidden_segments {
                hidden.push(self.parse_value(entry)?);
            }
        }
        ids.extend(hidden);

        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(*id));
        Ok(ids)
    }

    fn parse_value(&self, entry: &Value) -> Result<SegmentId, ResolutionError> {
        match entry {
            Value::String(s) => self.parse_entry(entry, s),
            Value::Number(n) => n
                .as_u64()
                .map(SegmentId::new)
                .ok_or_else(|| self.invalid(entry)),
            _ => Err(self.invalid(entry)),
        }
    }

    fn parse_entry(&self, entry: &Value, text: &str) -> Result<SegmentId, ResolutionError> {
        SegmentId::parse(text).map_err(|_| self.invalid(entry))
    }

    fn invalid(&self, entry: &Value) -> ResolutionError {
        ResolutionError::InvalidSegment {
            layer: self.name.clone(),
            value: entry.to_string(),
        }
    }
}

/// Extract the layers of a parsed scene.
///
/// Returns `Ok(None)` when the scene has no `layers` entry (or it is null);
/// the caller decides whether that is an error.
pub fn scene_layers(scene: &Value) -> Result<Option<Vec<Layer>>, FafbsegError> {
    let obj = scene.as_object().ok_or(FormatError::NotAnObject {
        found: json_kind(scene),
    })?;

    let layers = match obj.get("layers") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| Layer::from_value(None, i, v))
            .collect::<Result<Vec<_>, _>>()?,
        Some(Value::Object(named)) => named
            .iter()
            .enumerate()
            .map(|(i, (name, v))| Layer::from_value(Some(name), i, v))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(FormatError::LayersNotSequence {
                found: json_kind(other),
            }
            .into())
        }
    };
    Ok(Some(layers))
}

/// Mutable access to the layer object at `index`, in [`scene_layers`] order.
pub(crate) fn layer_mut(scene: &mut Value, index: usize) -> Option<&mut Map<String, Value>> {
    match scene.get_mut("layers")? {
        Value::Array(items) => items.get_mut(index)?.as_object_mut(),
        Value::Object(named) => named.values_mut().nth(index)?.as_object_mut(),
        _ => None,
    }
}

fn entries(obj: &Map<String, Value>, key: &str) -> Vec<Value> {
    match obj.get(key) {
        Some(Value::Array(items)) => items.clone(),
        Some(v @ (Value::String(_) | Value::Number(_))) => vec![v.clone()],
        _ => Vec::new(),
    }
}

fn source_url(source: &Value) -> Option<String> {
    match source {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(source_url),
        Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}
