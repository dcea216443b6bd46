//! # Filename CLI: segment ids from artifact filenames.
//!
//! ```bash
//! fafbseg filename skeletons/*.swc --extension swc
//! ```
//!
//! Prints `id<TAB>fragment` per name, with `NA` for a missing fragment and
//! a bare `NA` for names that are not artifact files. Non-matching names
//! never fail the command.

use anyhow::Result;
use clap::Args;

use fafbseg_core::{FilenameCodec, ParsedFilename};

/// Arguments for `fafbseg filename`.
#[derive(Args, Debug)]
pub struct FilenameArgs {
    /// Filenames or paths.
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Only accept this extension (case-insensitive).
    #[arg(long)]
    pub extension: Option<String>,
}

/// Execute the filename subcommand.
pub fn run_filename(args: &FilenameArgs) -> Result<u8> {
    let codec = match &args.extension {
        Some(ext) => FilenameCodec::with_extension(ext),
        None => FilenameCodec::new(),
    };

    let mut unmatched = 0usize;
    for name in &args.names {
        let parsed = codec.parse(name);
        if parsed.is_none() {
            unmatched += 1;
            tracing::debug!(name, "not an artifact filename");
        }
        println!("{}", render(parsed.as_ref()));
    }
    if unmatched > 0 {
        tracing::info!(unmatched, total = args.names.len(), "some names did not match");
    }
    Ok(0)
}

fn render(parsed: Option<&ParsedFilename>) -> String {
    match parsed {
        Some(p) => match p.fragment {
            Some(f) => format!("{}\t{f}", p.segment),
            None => format!("{}\tNA", p.segment),
        },
        None => "NA".to_string(),
    }
}
