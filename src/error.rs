//! Crate error types.
//!
//! Every failure surfaces synchronously at the call that caused it; nothing
//! is retried internally.
use std::path::PathBuf;

use crate::common::{IpVersion, Prefix};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Invalid target prefix lengths at construction.
pub enum ConfigError {
    #[error("invalid IPv4 target prefix length {0}, must be within 1..=32")]
    InvalidTargetLen4(u8),

    #[error("invalid IPv6 target prefix length {0}, must be within 1..=64")]
    InvalidTargetLen6(u8),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Malformed prefix literal.
pub enum ParseError {
    #[error("invalid IP address in \"{input}\"")]
    InvalidAddress { input: String },

    #[error("invalid prefix length in \"{input}\"")]
    InvalidPrefixLength { input: String },

    #[error("/{prefix_len} exceeds the {max}-bit address width")]
    PrefixLengthOutOfRange { prefix_len: u8, max: u8 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// A prefix that cannot be mapped onto the target granularity.
pub enum RangeError {
    /// The prefix is more specific than the granularity ranges are measured
    /// at, so it covers no whole target subnet.
    #[error("prefix length of {prefix} must be <= the target prefix length {target_len}")]
    LengthAboveTarget { prefix: Prefix, target_len: u8 },

    #[error("target prefix length {target_len} exceeds the {version} anchor domain")]
    TargetBeyondDomain { target_len: u8, version: IpVersion },

    /// V6 anchors must keep their top bit clear; see
    /// [MAX_V6_ANCHOR](crate::MAX_V6_ANCHOR).
    #[error("{prefix} is out of domain, only prefixes up to 7fff:ffff:ffff:ffff::/64 can be processed")]
    AnchorOverflow { prefix: Prefix },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// The exact (first, prefix_len) pair is already stored.
#[error("{prefix} is already in the store")]
pub struct DuplicateError {
    pub prefix: Prefix,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors surfaced by [Monitor::add](crate::Monitor::add).
pub enum AddError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Duplicate(#[from] DuplicateError),
}

#[derive(thiserror::Error, Debug)]
/// A derivation aborted on an internal-consistency failure.
pub enum ResolveError {
    /// Two stored ranges partially overlap, which CIDR alignment rules out.
    /// The raw store was snapshot to `dump` (when writing it succeeded) for
    /// offline inspection; the derivation produced no result.
    #[error("stored {version} ranges are not laminar ({detail}), raw store dumped to {dump:?}")]
    Inconsistent {
        version: IpVersion,
        detail: String,
        dump: Option<PathBuf>,
    },
}

#[derive(thiserror::Error, Debug)]
/// Failed to write a diagnostic snapshot.
pub enum DumpError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}
