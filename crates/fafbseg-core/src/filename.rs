//! # Filename ↔ Segment Id Codec
//!
//! Artifact files are named `<segmentID>[.<fragment>].<ext>`, for example
//! `10001654273.1.swc` for fragment 1 of segment 10001654273. Other tools
//! rely on this convention to recognise already-fetched segments, so the
//! codec is deliberately strict.
//!
//! Parsing never fails loudly: a name that does not match yields `None`, so
//! a batch of mixed filenames can be processed without aborting on the first
//! stray file. Callers must check for `None`.

use std::path::Path;

use crate::identity::{is_decimal_id, SegmentId};

/// A filename decomposed into its segment id and optional fragment index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    /// The segment the file belongs to.
    pub segment: SegmentId,
    /// Fragment index, when the file holds one piece of a segment.
    pub fragment: Option<u32>,
    /// Extension exactly as written in the filename.
    pub extension: String,
}

/// Filename codec, optionally restricted to one extension.
#[derive(Debug, Clone, Default)]
pub struct FilenameCodec {
    extension: Option<String>,
}

impl FilenameCodec {
    /// Codec accepting any alphanumeric extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec accepting only `extension`, compared case-insensitively.
    ///
    /// A leading dot is ignored, so `".swc"` and `"swc"` are equivalent.
    pub fn with_extension(extension: &str) -> Self {
        Self {
            extension: Some(extension.trim_start_matches('.').to_string()),
        }
    }

    /// Parse one filename. Directory components are ignored.
    pub fn parse(&self, name: &str) -> Option<ParsedFilename> {
        let base = basename(name);
        let parts: Vec<&str> = base.split('.').collect();
        let (id, fragment, ext) = match parts.as_slice() {
            [id, ext] => (*id, None, *ext),
            [id, fragment, ext] => (*id, Some(*fragment), *ext),
            _ => return None,
        };

        if ext.is_empty() || !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        if let Some(expected) = &self.extension {
            if !ext.eq_ignore_ascii_case(expected) {
                return None;
            }
        }

        let segment = SegmentId::parse(id).ok()?;
        let fragment = match fragment {
            Some(f) if is_decimal_id(f) => Some(f.parse::<u32>().ok()?),
            Some(_) => return None,
            None => None,
        };

        Some(ParsedFilename {
            segment,
            fragment,
            extension: ext.to_string(),
        })
    }

    /// Segment id of every filename, `None` where the name does not match.
    pub fn segment_ids<I, S>(&self, names: I) -> Vec<Option<SegmentId>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|n| self.parse(n.as_ref()).map(|p| p.segment))
            .collect()
    }
}

/// Parse a filename with the permissive codec.
pub fn parse_filename(name: &str) -> Option<ParsedFilename> {
    FilenameCodec::new().parse(name)
}

/// Render the canonical artifact filename for a segment.
pub fn artifact_filename(segment: SegmentId, fragment: Option<u32>, extension: &str) -> String {
    let ext = extension.trim_start_matches('.');
    match fragment {
        Some(f) => format!("{segment}.{f}.{ext}"),
        None => format!("{segment}.{ext}"),
    }
}

fn basename(name: &str) -> &str {
    // Windows separators show up in lists exported from other tools.
    let unix = Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    unix.rsplit('\\').next().unwrap_or(unix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_and_fragment() {
        let p = parse_filename("10001654273.1.swc").unwrap();
        assert_eq!(p.segment, SegmentId::new(10001654273));
        assert_eq!(p.fragment, Some(1));
        assert_eq!(p.extension, "swc");
    }

    #[test]
    fn parses_id_without_fragment() {
        let p = parse_filename("720575940621039145.ply").unwrap();
        assert_eq!(p.segment.get(), 720575940621039145);
        assert_eq!(p.fragment, None);
    }

    #[test]
    fn non_matching_names_yield_none() {
        for bad in [
            "not-a-file.txt",
            "123",
            "123.",
            ".swc",
            "123.4.5.swc",
            "123.x.swc",
            "abc.1.swc",
            "123.s-w-c",
        ] {
            assert!(parse_filename(bad).is_none(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn strips_directories() {
        let p = parse_filename("/data/skeletons/10001654273.2.swc").unwrap();
        assert_eq!(p.fragment, Some(2));
        let p = parse_filename(r"C:\skels\10001654273.swc").unwrap();
        assert_eq!(p.segment.get(), 10001654273);
    }

    #[test]
    fn fixed_extension_is_case_insensitive() {
        let codec = FilenameCodec::with_extension(".swc");
        assert!(codec.parse("10001654273.1.SWC").is_some());
        assert!(codec.parse("10001654273.1.Swc").is_some());
        assert!(codec.parse("10001654273.1.ply").is_none());
    }

    #[test]
    fn batch_keeps_positions_of_failures() {
        let ids = FilenameCodec::new().segment_ids(["1.swc", "junk", "3.2.swc"]);
        assert_eq!(
            ids,
            vec![Some(SegmentId::new(1)), None, Some(SegmentId::new(3))]
        );
    }

    #[test]
    fn renders_artifact_filenames() {
        let id = SegmentId::new(10001654273);
        assert_eq!(artifact_filename(id, None, "ply"), "10001654273.ply");
        assert_eq!(artifact_filename(id, Some(1), ".swc"), "10001654273.1.swc");
    }
}
