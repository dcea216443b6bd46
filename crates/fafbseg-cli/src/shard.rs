//! # Shard CLI: map segment ids to shard archives.
//!
//! ```bash
//! fafbseg shard 10001654273            # 10001654273	100016.zip
//! fafbseg shard 100016.zip             # 100016.zip	10001600000	10001699999
//! fafbseg --shard-divisor 1000 shard 10001654273
//! ```
//!
//! The divisor comes from `--shard-divisor`, then `FAFBSEG_SHARD_DIVISOR`,
//! then the default of 100000.

use anyhow::{bail, Context, Result};
use clap::Args;

use fafbseg_core::{is_decimal_id, parse_shard_name, SegmentId, ShardConfig};

/// Arguments for `fafbseg shard`.
#[derive(Args, Debug)]
pub struct ShardArgs {
    /// Segment ids, or archive names (`<n>.zip`) to print the id range of.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Shard layout from the command-line divisor or the environment.
pub fn shard_config(divisor: Option<u64>) -> Result<ShardConfig> {
    let config = match divisor {
        Some(d) => ShardConfig::new(d)?,
        None => ShardConfig::from_env().context("failed to read shard divisor from environment")?,
    };
    tracing::debug!(divisor = config.divisor(), "shard layout");
    Ok(config)
}

/// Execute the shard subcommand.
pub fn run_shard(args: &ShardArgs, config: &ShardConfig) -> Result<u8> {
    for token in &args.ids {
        println!("{}", shard_line(token, config)?);
    }
    Ok(0)
}

fn shard_line(token: &str, config: &ShardConfig) -> Result<String> {
    if is_decimal_id(token) {
        let id = SegmentId::parse(token)?;
        return Ok(format!("{id}\t{}", config.shard_name(id)));
    }
    if let Some(index) = parse_shard_name(token) {
        let bounds = config.shard_bounds(index);
        return Ok(format!("{token}\t{}\t{}", bounds.start(), bounds.end()));
    }
    bail!("\"{token}\" is neither a segment id nor a shard archive name")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_maps_to_archive() {
        let config = ShardConfig::default();
        assert_eq!(
            shard_line("10001654273", &config).unwrap(),
            "10001654273\t100016.zip"
        );
    }

    #[test]
    fn archive_maps_to_id_range() {
        let config = ShardConfig::new(1000).unwrap();
        assert_eq!(shard_line("7.zip", &config).unwrap(), "7.zip\t7000\t7999");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(shard_line("abc", &ShardConfig::default()).is_err());
        assert!(shard_line("99999999999999999999999", &ShardConfig::default()).is_err());
    }

    #[test]
    fn explicit_divisor_wins_and_zero_is_rejected() {
        assert_eq!(shard_config(Some(10)).unwrap().divisor(), 10);
        assert!(shard_config(Some(0)).is_err());
    }
}
