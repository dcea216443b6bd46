//! # fafbseg CLI entry point
//!
//! Parses command-line arguments, sets up logging from the verbosity flag
//! and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fafbseg_cli::fetch::{run_fetch, FetchArgs};
use fafbseg_cli::filename::{run_filename, FilenameArgs};
use fafbseg_cli::layers::{run_layers, LayersArgs};
use fafbseg_cli::meshes::{run_meshes, MeshesArgs};
use fafbseg_cli::segments::{run_segments, SegmentsArgs};
use fafbseg_cli::shard::{run_shard, shard_config, ShardArgs};
use fafbseg_cli::url::{run_url, UrlArgs};

/// Segmentation glue for FAFB/FlyWire-style scenes.
///
/// Resolves scene links and JSON to segment ids, bulk-fetches per-segment
/// meshes into a resumable cache, and maps artifact filenames and ids to
/// shard archives.
#[derive(Parser, Debug)]
#[command(name = "fafbseg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Ids per shard archive. Defaults to FAFBSEG_SHARD_DIVISOR or 100000.
    #[arg(long, global = true)]
    shard_divisor: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve ids, a scene URL, a scene file or scene JSON to segment ids.
    Segments(SegmentsArgs),

    /// List the layers of a scene.
    Layers(LayersArgs),

    /// Decode scene URLs to JSON or encode JSON as a scene URL.
    Url(UrlArgs),

    /// Fetch per-segment artifacts into a directory, skipping cached ones.
    Fetch(FetchArgs),

    /// Fetch and load the meshes of a scene.
    Meshes(MeshesArgs),

    /// Extract segment ids from artifact filenames.
    Filename(FilenameArgs),

    /// Map segment ids to their shard archive.
    Shard(ShardArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("fafbseg CLI starting");

    let result = match cli.command {
        Commands::Segments(args) => run_segments(&args),
        Commands::Layers(args) => run_layers(&args),
        Commands::Url(args) => run_url(&args),
        Commands::Fetch(args) => run_fetch(&args),
        Commands::Meshes(args) => run_meshes(&args),
        Commands::Filename(args) => run_filename(&args),
        Commands::Shard(args) => {
            shard_config(cli.shard_divisor).and_then(|config| run_shard(&args, &config))
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_segments_with_flags() {
        let cli = Cli::try_parse_from([
            "fafbseg",
            "segments",
            "--numeric",
            "--include-hidden",
            "https://ngl.flywire.ai/#!%7B%7D",
        ])
        .unwrap();
        if let Commands::Segments(args) = cli.command {
            assert!(args.numeric);
            assert!(args.include_hidden);
            assert_eq!(args.input, vec!["https://ngl.flywire.ai/#!%7B%7D".to_string()]);
        } else {
            panic!("expected segments");
        }
    }

    #[test]
    fn cli_parse_segments_requires_input() {
        assert!(Cli::try_parse_from(["fafbseg", "segments"]).is_err());
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fafbseg",
            "shard",
            "10001654273",
            "-vv",
            "--shard-divisor",
            "1000",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.shard_divisor, Some(1000));
        assert!(matches!(cli.command, Commands::Shard(_)));
    }

    #[test]
    fn cli_parse_fetch_defaults() {
        let cli = Cli::try_parse_from(["fafbseg", "fetch", "1", "2"]).unwrap();
        if let Commands::Fetch(args) = cli.command {
            assert_eq!(args.input, vec!["1".to_string(), "2".to_string()]);
            assert!(args.dir.is_none());
            assert_eq!(args.format, fafbseg_fetch::MeshFormat::Ply);
            assert!(!args.force);
            assert!(!args.fail_fast);
            assert!(args.service_url.is_none());
        } else {
            panic!("expected fetch");
        }
    }

    #[test]
    fn cli_parse_fetch_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["fafbseg", "fetch", "1", "--format", "stl"]).is_err());
    }

    #[test]
    fn cli_parse_url_encode() {
        let cli = Cli::try_parse_from([
            "fafbseg",
            "url",
            "encode",
            "scene.json",
            "--base-url",
            "https://ngl.flywire.ai/",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Url(_)));
    }

    #[test]
    fn cli_parse_filename_with_extension() {
        let cli =
            Cli::try_parse_from(["fafbseg", "filename", "--extension", "swc", "1.swc"]).unwrap();
        if let Commands::Filename(args) = cli.command {
            assert_eq!(args.extension.as_deref(), Some("swc"));
            assert_eq!(args.names, vec!["1.swc".to_string()]);
        } else {
            panic!("expected filename");
        }
    }
}
