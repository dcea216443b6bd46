//! # Error Hierarchy
//!
//! Structured error types for segment resolution, built with `thiserror`.
//!
//! Scene decoding, layer extraction and segment resolution each have their
//! own error kind so that callers can branch on *why* a scene reference could
//! not be turned into segment ids. None of these are recoverable inside the
//! library: guessing which neurons a scene meant is never an option.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for scene handling and identifier codecs.
#[derive(Error, Debug)]
pub enum FafbsegError {
    /// The input could not be decoded into a JSON document.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The decoded document does not have the shape of a scene.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Segment ids could not be resolved unambiguously.
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// A domain primitive failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Errors turning text, files or URLs into a parsed scene document.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The text is not valid JSON.
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The URL could not be parsed at all.
    #[error("invalid scene URL \"{url}\": {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The URL carries no embedded scene state.
    #[error("URL \"{url}\" does not embed a scene state (expected a #!{{...}} fragment)")]
    MissingState {
        /// The offending URL.
        url: String,
    },

    /// The URL points at a scene stored on a remote state server.
    #[error("URL \"{url}\" refers to a remotely stored scene state ({location}); expand the link first")]
    RemoteState {
        /// The offending URL.
        url: String,
        /// Where the state actually lives.
        location: String,
    },

    /// A scene file exists but could not be read.
    #[error("failed to read scene file {}: {source}", path.display())]
    Read {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors when a decoded value cannot carry segment information.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The decoded value is not a JSON object.
    #[error("cannot extract segment information from a JSON {found}; expected an object with a layers entry")]
    NotAnObject {
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// `layers` is present but is neither an array nor an object.
    #[error("layers entry must be an array or an object, found a JSON {found}")]
    LayersNotSequence {
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// A layer entry is not a JSON object.
    #[error("layer {layer} is a JSON {found}, expected an object")]
    LayerNotObject {
        /// Layer name or `#<index>`.
        layer: String,
        /// JSON kind that was found instead.
        found: &'static str,
    },
}

/// Errors collapsing a scene's layers into one list of segment ids.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The scene has no `layers` entry.
    #[error("cannot find layers entry")]
    NoLayers,

    /// No layer has any (visible, or hidden when requested) segments.
    #[error("no segments entry in any layer")]
    NoSegments,

    /// More than one layer carries segments.
    #[error("segments found in more than one layer: {}; select the layer manually", layers.join(", "))]
    Ambiguous {
        /// Names of every populated layer.
        layers: Vec<String>,
    },

    /// A segment entry is not a decimal id.
    #[error("layer {layer} has an invalid segment entry: {value}")]
    InvalidSegment {
        /// Layer name or `#<index>`.
        layer: String,
        /// The offending entry, rendered as JSON.
        value: String,
    },

    /// No unique layer could receive a new segment list.
    #[error("cannot choose a layer to receive segments: {reason}")]
    NoTargetLayer {
        /// Why no layer qualified.
        reason: String,
    },
}

/// Validation errors for domain primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Segment id text is not an unsigned 64-bit decimal.
    #[error("invalid segment id: \"{0}\" (expected an unsigned 64-bit decimal)")]
    InvalidSegmentId(String),

    /// Shard divisor must be positive.
    #[error("shard divisor must be greater than zero")]
    ZeroShardDivisor,

    /// Shard divisor text is not an unsigned integer.
    #[error("invalid shard divisor: \"{0}\"")]
    InvalidShardDivisor(String),
}

/// Name of a JSON value's kind, for diagnostics.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_message_names_every_layer() {
        let err = ResolutionError::Ambiguous {
            layers: vec!["seg".into(), "flywire".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("seg"));
        assert!(msg.contains("flywire"));
    }

    #[test]
    fn no_layers_message() {
        let err = FafbsegError::from(ResolutionError::NoLayers);
        assert!(err.to_string().contains("cannot find layers entry"));
    }

    #[test]
    fn not_an_object_message() {
        let err = FormatError::NotAnObject { found: "array" };
        assert!(err.to_string().contains("cannot extract segment information"));
    }

    #[test]
    fn json_error_converts_to_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FafbsegError = DecodeError::from(json_err).into();
        assert!(matches!(err, FafbsegError::Decode(DecodeError::Json(_))));
    }

    #[test]
    fn json_kind_names() {
        assert_eq!(json_kind(&serde_json::json!(null)), "null");
        assert_eq!(json_kind(&serde_json::json!([1])), "array");
        assert_eq!(json_kind(&serde_json::json!({})), "object");
    }
}
