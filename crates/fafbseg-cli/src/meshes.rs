//! # Meshes CLI: fetch and load the meshes of a scene.
//!
//! Resolves the scene (visible segments only), fetches each mesh and loads
//! it, printing `id<TAB>bytes` per loaded mesh. Without `--dir` the meshes
//! go to a temporary directory that is removed afterwards.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use fafbseg_fetch::{
    AssemblyOptions, HttpArtifactFetcher, MeshAssembler, MeshFormat, RawArtifactLoader,
};

use crate::fetch::fetch_config;
use crate::scene_ref;

/// Arguments for `fafbseg meshes`.
#[derive(Args, Debug)]
pub struct MeshesArgs {
    /// Decimal ids, a scene URL, a scene JSON file or scene JSON text.
    #[arg(required = true)]
    pub input: Vec<String>,

    /// Keep the meshes in this directory instead of a temporary one.
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Mesh format: ply, obj or swc.
    #[arg(long, default_value = "ply")]
    pub format: MeshFormat,

    /// Artifact service base URL (overrides FAFBSEG_SERVICE_URL).
    #[arg(long)]
    pub service_url: Option<String>,
}

/// Execute the meshes subcommand.
pub fn run_meshes(args: &MeshesArgs) -> Result<u8> {
    let config = fetch_config(args.service_url.as_deref(), None)?;
    let fetcher = HttpArtifactFetcher::new(config).context("failed to set up artifact fetcher")?;
    let assembler = MeshAssembler::new(fetcher, RawArtifactLoader);

    let opts = AssemblyOptions {
        target_dir: args.dir.clone(),
        format: args.format,
        ..AssemblyOptions::default()
    };
    let objects = assembler
        .fetch_meshes(&scene_ref(&args.input), &opts)
        .context("mesh assembly failed")?;

    if objects.is_empty() {
        tracing::warn!("no meshes could be loaded");
    }
    for labeled in &objects {
        println!("{}\t{}", labeled.segment, labeled.object.bytes.len());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_meshes_are_loaded_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("5.ply"), "ply\n").unwrap();
        let args = MeshesArgs {
            input: vec!["5".to_string()],
            dir: Some(dir.path().to_path_buf()),
            format: MeshFormat::Ply,
            service_url: Some("http://127.0.0.1:1/".to_string()),
        };
        assert_eq!(run_meshes(&args).unwrap(), 0);
        assert!(dir.path().join("5.ply").exists());
    }

    #[test]
    fn unreachable_service_yields_empty_result() {
        let args = MeshesArgs {
            input: vec!["5".to_string()],
            dir: None,
            format: MeshFormat::Obj,
            service_url: Some("http://127.0.0.1:1/".to_string()),
        };
        assert_eq!(run_meshes(&args).unwrap(), 0);
    }
}
