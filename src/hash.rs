//! Key hash strategies.
//!
//! A table owns one `KeyHasher` for its whole life and reuses it across
//! resizes, so implementations must be pure: the same key always yields the
//! same value.

use crate::error::UnknownHashFunction;
use core::fmt;
use core::str::FromStr;

/// Maps a string key to a bucket-independent hash value.
pub trait KeyHasher {
    fn hash_key(&self, key: &str) -> u64;
}

/// Sum of the code points of every character in `key`, modulo 2^64.
pub fn codepoint_sum(key: &str) -> u64 {
    key.chars()
        .fold(0u64, |acc, c| acc.wrapping_add(u64::from(c)))
}

/// Sum over `i` of `(i + 1) * code(char_i)`, with `i` counted in characters.
///
/// The result is the exact sum modulo 2^64. It only wraps for keys longer
/// than about 5.8 million characters (all at U+10FFFF); routing stays pure
/// either way, but such keys no longer match the unbounded definition.
pub fn weighted_codepoint_sum(key: &str) -> u64 {
    key.chars().enumerate().fold(0u64, |acc, (i, c)| {
        let weight = (i as u64).wrapping_add(1);
        acc.wrapping_add(weight.wrapping_mul(u64::from(c)))
    })
}

/// The two reference hash functions, selectable at construction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HashFunction {
    /// `codepoint_sum`: anagrams collide.
    #[default]
    CodepointSum,
    /// `weighted_codepoint_sum`.
    PositionWeighted,
}

impl HashFunction {
    pub fn name(&self) -> &'static str {
        match self {
            HashFunction::CodepointSum => "codepoint-sum",
            HashFunction::PositionWeighted => "position-weighted",
        }
    }
}

impl KeyHasher for HashFunction {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        match self {
            HashFunction::CodepointSum => codepoint_sum(key),
            HashFunction::PositionWeighted => weighted_codepoint_sum(key),
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashFunction {
    type Err = UnknownHashFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "sum" | "codepoint-sum" => Ok(HashFunction::CodepointSum),
            "weighted" | "position-weighted" => Ok(HashFunction::PositionWeighted),
            _ => Err(UnknownHashFunction(s.to_string())),
        }
    }
}
