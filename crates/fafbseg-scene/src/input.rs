//! # Scene References
//!
//! Everything a caller may hand to the resolver, as one exhaustive enum.
//! Text inputs are classified by cheap shape probes in a fixed order, with
//! "treat it as JSON text" as the explicit fallthrough.

use std::path::PathBuf;

use fafbseg_core::{is_decimal_id, SegmentId};
use serde_json::Value;

use crate::decode::looks_like_url;

/// A reference to a set of segments.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneRef {
    /// Numeric ids, returned as given.
    Ids(Vec<SegmentId>),
    /// Decimal id strings, returned as given without any decoding.
    Literal(Vec<String>),
    /// A scene URL with the state embedded in its fragment.
    Url(String),
    /// A file holding scene JSON (or a scene URL).
    File(PathBuf),
    /// Raw scene JSON text.
    Json(String),
    /// An already-parsed scene document.
    Parsed(Value),
}

impl SceneRef {
    /// Classify text tokens, e.g. command-line arguments.
    ///
    /// 1. every token is a decimal id → [`SceneRef::Literal`]
    /// 2. a single `http(s)://` token → [`SceneRef::Url`]
    /// 3. a single token naming an existing file → [`SceneRef::File`]
    /// 4. otherwise the tokens, joined by newlines, are JSON text
    pub fn from_texts<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();

        if !tokens.is_empty() && tokens.iter().all(|t| is_decimal_id(t)) {
            return Self::Literal(tokens);
        }
        if let [single] = tokens.as_slice() {
            let trimmed = single.trim();
            if looks_like_url(trimmed) {
                return Self::Url(trimmed.to_string());
            }
            let path = PathBuf::from(single);
            if path.is_file() {
                return Self::File(path);
            }
        }
        Self::Json(tokens.join("\n"))
    }

    /// Classify a single text token. See [`SceneRef::from_texts`].
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_texts([text.into()])
    }

    /// Short label of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ids(_) => "ids",
            Self::Literal(_) => "literal",
            Self::Url(_) => "url",
            Self::File(_) => "file",
            Self::Json(_) => "json",
            Self::Parsed(_) => "parsed",
        }
    }
}

impl From<Vec<SegmentId>> for SceneRef {
    fn from(ids: Vec<SegmentId>) -> Self {
        Self::Ids(ids)
    }
}

impl From<Vec<u64>> for SceneRef {
    fn from(ids: Vec<u64>) -> Self {
        Self::Ids(ids.into_iter().map(SegmentId::new).collect())
    }
}

impl From<Value> for SceneRef {
    fn from(scene: Value) -> Self {
        Self::Parsed(scene)
    }
}

impl From<&str> for SceneRef {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}
