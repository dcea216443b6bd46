//! # URL CLI: decode and encode scene URLs.
//!
//! ```bash
//! fafbseg url decode 'https://ngl.flywire.ai/#!%7B%22layers%22...' > scene.json
//! fafbseg url encode scene.json --base-url https://ngl.flywire.ai/
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use fafbseg_scene::{decode_scene, decode_url, encode_url};

/// URL subcommand arguments.
#[derive(Args, Debug)]
pub struct UrlArgs {
    #[command(subcommand)]
    pub command: UrlCommand,
}

/// Available URL subcommands.
#[derive(Subcommand, Debug)]
pub enum UrlCommand {
    /// Print the scene embedded in a URL as pretty JSON.
    Decode {
        /// Scene URL with a `#!` state fragment.
        url: String,
    },

    /// Print a scene URL embedding the scene JSON in a file.
    Encode {
        /// File holding scene JSON, or `-` for stdin.
        file: PathBuf,

        /// Viewer URL to attach the scene to.
        #[arg(long)]
        base_url: String,
    },
}

/// Execute the url subcommand.
pub fn run_url(args: &UrlArgs) -> Result<u8> {
    let out = match &args.command {
        UrlCommand::Decode { url } => decode(url)?,
        UrlCommand::Encode { file, base_url } => encode(file, base_url)?,
    };
    println!("{out}");
    Ok(0)
}

fn decode(url: &str) -> Result<String> {
    let scene = decode_url(url.trim()).context("failed to decode scene URL")?;
    serde_json::to_string_pretty(&scene).context("failed to render scene JSON")
}

fn encode(file: &Path, base_url: &str) -> Result<String> {
    let text = if file == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("failed to read scene from stdin")?
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read scene file: {}", file.display()))?
    };
    let scene = decode_scene(&text).context("failed to parse scene JSON")?;
    encode_url(&scene, base_url).context("failed to encode scene URL")
}
