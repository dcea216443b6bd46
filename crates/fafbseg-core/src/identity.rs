//! # Segment Identifiers
//!
//! A [`SegmentId`] names one reconstructed object (typically a neuron
//! fragment) on a remote segmentation service. Ids routinely exceed the
//! 32-bit range and lose precision as IEEE doubles, so they are kept as
//! `u64` and serialized as decimal strings, which is also how scene
//! documents store them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Identifier of a reconstructed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(u64);

impl SegmentId {
    /// Wrap a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse a decimal id.
    ///
    /// Only ASCII digits are accepted: no sign, no whitespace, no exponent.
    /// Leading zeros are allowed and dropped.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if !is_decimal_id(s) {
            return Err(ValidationError::InvalidSegmentId(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidSegmentId(s.to_string()))
    }

    /// The raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// True when `s` is a non-empty run of ASCII digits.
///
/// This is a shape probe only; a very long run may still overflow `u64`.
pub fn is_decimal_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SegmentId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for SegmentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<SegmentId> for u64 {
    fn from(id: SegmentId) -> Self {
        id.0
    }
}

impl Serialize for SegmentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SegmentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}
