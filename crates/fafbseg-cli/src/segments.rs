//! # Segments CLI: resolve a scene reference to segment ids.
//!
//! ```bash
//! fafbseg segments 'https://ngl.flywire.ai/#!%7B%22layers%22...'
//! fafbseg segments scene.json --include-hidden
//! ```
//!
//! Prints one id per line. Fails when the scene has no populated layer or
//! more than one.

use anyhow::{Context, Result};
use clap::Args;

use fafbseg_scene::{ResolveOptions, SegmentResolver, Segments};

use crate::scene_ref;

/// Arguments for `fafbseg segments`.
#[derive(Args, Debug)]
pub struct SegmentsArgs {
    /// Decimal ids, a scene URL, a scene JSON file or scene JSON text.
    #[arg(required = true)]
    pub input: Vec<String>,

    /// Parse ids as 64-bit integers, rejecting any that do not fit.
    #[arg(long)]
    pub numeric: bool,

    /// Include hidden segments.
    #[arg(long)]
    pub include_hidden: bool,
}

/// Execute the segments subcommand.
pub fn run_segments(args: &SegmentsArgs) -> Result<u8> {
    for line in resolve_lines(args)? {
        println!("{line}");
    }
    Ok(0)
}

fn resolve_lines(args: &SegmentsArgs) -> Result<Vec<String>> {
    let opts = ResolveOptions {
        as_text: !args.numeric,
        include_hidden: args.include_hidden,
    };
    let segments = SegmentResolver::neuroglancer()
        .resolve(&scene_ref(&args.input), opts)
        .context("failed to resolve segments")?;
    Ok(match segments {
        Segments::Text(ids) => ids,
        Segments::Numeric(ids) => ids.iter().map(ToString::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &[&str], numeric: bool, include_hidden: bool) -> SegmentsArgs {
        SegmentsArgs {
            input: input.iter().map(|s| s.to_string()).collect(),
            numeric,
            include_hidden,
        }
    }

    const SCENE: &str = r#"{"layers":[{"type":"segmentation","name":"seg","segments":["1","2","3"],"hiddenSegments":["4"]}]}"#;

    #[test]
    fn literal_ids_pass_through() {
        let lines = resolve_lines(&args(&["007", "12"], false, false)).unwrap();
        assert_eq!(lines, vec!["007", "12"]);
    }

    #[test]
    fn numeric_normalises_literal_ids() {
        let lines = resolve_lines(&args(&["007", "12"], true, false)).unwrap();
        assert_eq!(lines, vec!["7", "12"]);
    }

    #[test]
    fn json_scene_respects_hidden_flag() {
        assert_eq!(
            resolve_lines(&args(&[SCENE], false, false)).unwrap(),
            vec!["1", "2", "3"]
        );
        assert_eq!(
            resolve_lines(&args(&[SCENE], false, true)).unwrap(),
            vec!["1", "2", "3", "4"]
        );
    }

    #[test]
    fn scene_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, SCENE).unwrap();
        let lines = resolve_lines(&args(&[path.to_str().unwrap()], true, false)).unwrap();
        assert_eq!(lines, vec!["1", "2", "3"]);
    }

    #[test]
    fn scene_without_segments_fails_with_context() {
        let err = resolve_lines(&args(&[r#"{"layers":[{"type":"image"}]}"#], false, false))
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("failed to resolve segments"));
        assert!(msg.contains("no segments"));
    }
}
