//! # Fetch CLI: bulk artifact download with resume.
//!
//! ```bash
//! fafbseg fetch scene.json --dir meshes/ --service-url https://meshes.example.org/
//! fafbseg fetch 720575940621039145 720575940626877799 --format obj --fail-fast
//! ```
//!
//! Artifacts already present in `--dir` are not fetched again unless
//! `--force` is given. Failed segments are skipped with a warning unless
//! `--fail-fast` is given. Prints `id<TAB>path` for every available
//! artifact.
//!
//! The service is configured from `FAFBSEG_SERVICE_URL`,
//! `FAFBSEG_PATH_TEMPLATE`, `FAFBSEG_API_TOKEN`, `FAFBSEG_TIMEOUT_SECS` and
//! `FAFBSEG_MAX_RETRIES`; the flags override the first two.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use fafbseg_fetch::{fetch_all, CacheOptions, FetchConfig, HttpArtifactFetcher, MeshFormat};
use fafbseg_scene::SegmentResolver;

use crate::scene_ref;

/// Arguments for `fafbseg fetch`.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Decimal ids, a scene URL, a scene JSON file or scene JSON text.
    #[arg(required = true)]
    pub input: Vec<String>,

    /// Directory to fetch into. Defaults to a new directory under the
    /// system temp directory, which is kept.
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Artifact format: ply, obj or swc.
    #[arg(long, default_value = "ply")]
    pub format: MeshFormat,

    /// Fetch again even if the artifact is already in the directory.
    #[arg(long)]
    pub force: bool,

    /// Abort at the first failed segment instead of skipping it.
    #[arg(long)]
    pub fail_fast: bool,

    /// Artifact service base URL (overrides FAFBSEG_SERVICE_URL).
    #[arg(long)]
    pub service_url: Option<String>,

    /// Artifact path template with {id} and {ext} placeholders
    /// (overrides FAFBSEG_PATH_TEMPLATE).
    #[arg(long)]
    pub path_template: Option<String>,

    /// Also fetch hidden segments of a scene.
    #[arg(long)]
    pub include_hidden: bool,
}

/// Execute the fetch subcommand.
pub fn run_fetch(args: &FetchArgs) -> Result<u8> {
    let ids = SegmentResolver::neuroglancer()
        .resolve_ids(&scene_ref(&args.input), args.include_hidden)
        .context("failed to resolve segments")?;

    let config = fetch_config(args.service_url.as_deref(), args.path_template.as_deref())?;
    let fetcher = HttpArtifactFetcher::new(config).context("failed to set up artifact fetcher")?;

    let manifest = fetch_all(&ids, &cache_options(args), &fetcher).context("bulk fetch failed")?;

    for (segment, path) in &manifest {
        println!("{segment}\t{}", path.display());
    }
    if !manifest.failed().is_empty() {
        tracing::warn!(
            failed = manifest.failed().len(),
            dir = %manifest.dir().display(),
            "some artifacts could not be fetched; rerun to retry them"
        );
    }
    Ok(0)
}

/// Service configuration from the environment, with flag overrides.
pub fn fetch_config(service_url: Option<&str>, path_template: Option<&str>) -> Result<FetchConfig> {
    let mut config = FetchConfig::from_env_with_url(service_url)
        .context("artifact service is not configured (use --service-url or FAFBSEG_SERVICE_URL)")?;
    if let Some(template) = path_template {
        config = config.with_path_template(template)?;
    }
    tracing::debug!(?config, "artifact service");
    Ok(config)
}

fn cache_options(args: &FetchArgs) -> CacheOptions {
    CacheOptions {
        target_dir: args.dir.clone(),
        format: args.format,
        force: args.force,
        omit_failures: !args.fail_fast,
    }
}
