//! # Segment Id → Shard Archive Mapping
//!
//! Bulk skeleton exports are split into zip archives, each holding a
//! contiguous block of segment ids: segment `id` lives in
//! `"<floor(id / divisor)>.zip"`. The divisor is a property of the export,
//! so it is carried in an explicit [`ShardConfig`].

use std::ops::RangeInclusive;

use crate::error::ValidationError;
use crate::identity::{is_decimal_id, SegmentId};

/// Divisor used by the published skeleton exports.
pub const DEFAULT_SHARD_DIVISOR: u64 = 100_000;

/// Environment variable overriding the shard divisor.
pub const SHARD_DIVISOR_ENV: &str = "FAFBSEG_SHARD_DIVISOR";

/// Shard layout of an archive export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardConfig {
    divisor: u64,
}

impl ShardConfig {
    /// Create a layout with the given divisor. Zero is rejected.
    pub fn new(divisor: u64) -> Result<Self, ValidationError> {
        if divisor == 0 {
            return Err(ValidationError::ZeroShardDivisor);
        }
        Ok(Self { divisor })
    }

    /// Read the divisor from `FAFBSEG_SHARD_DIVISOR`, falling back to the
    /// default when unset. A set but malformed value is an error.
    pub fn from_env() -> Result<Self, ValidationError> {
        match std::env::var(SHARD_DIVISOR_ENV) {
            Ok(raw) => {
                let divisor = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ValidationError::InvalidShardDivisor(raw.clone()))?;
                Self::new(divisor)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// The configured divisor.
    pub fn divisor(&self) -> u64 {
        self.divisor
    }

    /// Index of the shard containing `id`.
    pub fn shard_index(&self, id: SegmentId) -> u64 {
        id.get() / self.divisor
    }

    /// Archive name of the shard containing `id`.
    pub fn shard_name(&self, id: SegmentId) -> String {
        format!("{}.zip", self.shard_index(id))
    }

    /// Inclusive range of ids stored in shard `index`.
    ///
    /// The upper bound saturates at `u64::MAX` for the last shard.
    pub fn shard_bounds(&self, index: u64) -> RangeInclusive<u64> {
        let start = index.saturating_mul(self.divisor);
        let end = start.saturating_add(self.divisor - 1);
        start..=end
    }
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            divisor: DEFAULT_SHARD_DIVISOR,
        }
    }
}

/// Parse an archive name of the form `<n>.zip` (case-insensitive extension).
pub fn parse_shard_name(name: &str) -> Option<u64> {
    let (stem, ext) = name.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case("zip") || !is_decimal_id(stem) {
        return None;
    }
    stem.parse().ok()
}
