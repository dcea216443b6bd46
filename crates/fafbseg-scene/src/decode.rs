//! # Scene Decoder
//!
//! Turns text into a parsed scene document. The text is either raw JSON or a
//! viewer URL whose fragment carries the percent-encoded JSON state after a
//! `#!` marker:
//!
//! ```text
//! https://ngl.flywire.ai/#!%7B%22layers%22%3A%5B...%5D%7D
//! ```
//!
//! URLs whose state lives on a state server (a `json_url` query parameter,
//! or a fragment that is itself a link) are rejected with
//! [`DecodeError::RemoteState`]; fetching them needs credentials and belongs
//! to a [`SceneDecoder`] implementation that knows the server.

use fafbseg_core::DecodeError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use url::Url;

/// Characters left unescaped when embedding a state in a URL fragment.
const STATE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b':')
    .remove(b',');

/// Capability turning scene text (URL or JSON) into a parsed document.
///
/// The resolver routes every text input through this trait, so a decoder
/// that can expand shortened links, or a counting test double, can be
/// substituted without touching resolution logic.
pub trait SceneDecoder {
    /// Decode `input`, a scene URL or raw JSON text.
    fn decode(&self, input: &str) -> Result<Value, DecodeError>;
}

impl<T: SceneDecoder + ?Sized> SceneDecoder for &T {
    fn decode(&self, input: &str) -> Result<Value, DecodeError> {
        (**self).decode(input)
    }
}

/// Decoder for self-contained neuroglancer scene URLs and JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeuroglancerDecoder;

impl SceneDecoder for NeuroglancerDecoder {
    fn decode(&self, input: &str) -> Result<Value, DecodeError> {
        decode_scene(input)
    }
}

/// True when `input` starts with `http://` or `https://`.
pub fn looks_like_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Decode a scene URL or raw JSON text.
pub fn decode_scene(input: &str) -> Result<Value, DecodeError> {
    let input = input.trim();
    if looks_like_url(input) {
        decode_url(input)
    } else {
        Ok(serde_json::from_str(input)?)
    }
}

/// Extract and parse the JSON state embedded in a scene URL.
pub fn decode_url(url: &str) -> Result<Value, DecodeError> {
    let parsed = Url::parse(url).map_err(|e| DecodeError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if let Some((_, location)) = parsed.query_pairs().find(|(k, _)| k == "json_url") {
        return Err(DecodeError::RemoteState {
            url: url.to_string(),
            location: location.into_owned(),
        });
    }

    let fragment = parsed.fragment().ok_or_else(|| DecodeError::MissingState {
        url: url.to_string(),
    })?;
    let decoded = percent_decode_str(fragment)
        .decode_utf8()
        .map_err(|e| DecodeError::InvalidUrl {
            url: url.to_string(),
            reason: format!("fragment is not UTF-8 after percent-decoding: {e}"),
        })?;
    let state = decoded.strip_prefix('!').unwrap_or(&decoded).trim();

    if state.starts_with('{') {
        tracing::debug!(bytes = state.len(), "decoding scene state from URL fragment");
        return Ok(serde_json::from_str(state)?);
    }
    if state.contains("://") {
        return Err(DecodeError::RemoteState {
            url: url.to_string(),
            location: state.to_string(),
        });
    }
    Err(DecodeError::MissingState {
        url: url.to_string(),
    })
}

/// Embed `scene` in `base_url` as a percent-encoded `#!` fragment.
///
/// Any fragment already present on `base_url` is replaced.
pub fn encode_url(scene: &Value, base_url: &str) -> Result<String, DecodeError> {
    let mut url = Url::parse(base_url).map_err(|e| DecodeError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    url.set_fragment(None);
    let json = serde_json::to_string(scene)?;
    Ok(format!(
        "{url}#!{}",
        utf8_percent_encode(&json, STATE_ENCODE_SET)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STATE_URL: &str = "https://ngl.flywire.ai/#!%7B%22layers%22%3A%5B%7B%22type%22%3A%22segmentation%22%2C%22segments%22%3A%5B%22720575940621039145%22%5D%2C%22name%22%3A%22seg%22%7D%5D%7D";

    #[test]
    fn decodes_raw_json() {
        let v = decode_scene(r#"{"layers": []}"#).unwrap();
        assert_eq!(v, json!({"layers": []}));
    }

    #[test]
    fn decodes_url_fragment() {
        let v = decode_scene(STATE_URL).unwrap();
        assert_eq!(v["layers"][0]["segments"][0], "720575940621039145");
        assert_eq!(v["layers"][0]["name"], "seg");
    }

    #[test]
    fn decodes_unescaped_fragment() {
        let v = decode_url(r#"https://host/#!{"layers":[]}"#).unwrap();
        assert_eq!(v, json!({"layers": []}));
    }

    #[test]
    fn url_without_fragment_is_missing_state() {
        let err = decode_scene("https://ngl.flywire.ai/").unwrap_err();
        assert!(matches!(err, DecodeError::MissingState { .. }));
    }

    #[test]
    fn shortened_links_are_remote_state() {
        let err = decode_scene(
            "https://ngl.flywire.ai/?json_url=https://globalv1.flywire-daf.com/nglstate/123",
        )
        .unwrap_err();
        match err {
            DecodeError::RemoteState { location, .. } => {
                assert_eq!(location, "https://globalv1.flywire-daf.com/nglstate/123");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = decode_scene(
            "https://ngl.flywire.ai/#!middleauth+https://global.daf-apis.com/nglstate/api/v1/5",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::RemoteState { .. }));
    }

    #[test]
    fn invalid_json_is_decode_error() {
        assert!(matches!(
            decode_scene("{not json").unwrap_err(),
            DecodeError::Json(_)
        ));
        assert!(matches!(
            decode_scene("https://host/#!{broken").unwrap_err(),
            DecodeError::Json(_)
        ));
    }

    #[test]
    fn non_url_text_is_parsed_as_json() {
        // Only http(s) URLs are treated as URLs; everything else is JSON text.
        assert!(matches!(
            decode_scene("ftp://host/#!{}").unwrap_err(),
            DecodeError::Json(_)
        ));
    }

    #[test]
    fn encode_then_decode_preserves_scene() {
        let scene = json!({
            "layers": [{"name": "seg 1", "type": "segmentation", "segments": ["1", "2"]}],
            "navigation": {"zoomFactor": 8.5}
        });
        let url = encode_url(&scene, "https://ngl.flywire.ai/#!old").unwrap();
        assert!(url.starts_with("https://ngl.flywire.ai/#!%7B"));
        assert!(!url.contains("old"));
        assert_eq!(decode_scene(&url).unwrap(), scene);
    }

    #[test]
    fn encode_rejects_bad_base() {
        assert!(matches!(
            encode_url(&json!({}), "not a url").unwrap_err(),
            DecodeError::InvalidUrl { .. }
        ));
    }
}
