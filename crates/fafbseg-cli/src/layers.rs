//! # Layers CLI: list the layers of a scene.
//!
//! Prints one line per layer: index, name, type, visible and hidden segment
//! counts, and source. Missing values print as `-`.

use anyhow::{Context, Result};
use clap::Args;

use fafbseg_scene::{Layer, SegmentResolver};

use crate::scene_ref;

/// Arguments for `fafbseg layers`.
#[derive(Args, Debug)]
pub struct LayersArgs {
    /// A scene URL, a scene JSON file or scene JSON text.
    #[arg(required = true)]
    pub input: Vec<String>,
}

/// Execute the layers subcommand.
pub fn run_layers(args: &LayersArgs) -> Result<u8> {
    let layers = SegmentResolver::neuroglancer()
        .layers(&scene_ref(&args.input))
        .context("failed to read scene layers")?;

    let Some(layers) = layers else {
        tracing::warn!("scene has no layers entry");
        return Ok(0);
    };
    for layer in &layers {
        println!("{}", layer_line(layer)?);
    }
    Ok(0)
}

fn layer_line(layer: &Layer) -> Result<String> {
    let segments = layer
        .segment_ids()
        .with_context(|| format!("invalid segments in layer {}", layer.name))?;
    Ok(format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        layer.index,
        layer.name,
        layer.layer_type.as_deref().unwrap_or("-"),
        segments.visible.len(),
        segments.hidden.len(),
        layer.source.as_deref().unwrap_or("-"),
    ))
}
