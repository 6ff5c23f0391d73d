//! Smallest-routable-entry records and the range mapper.
use std::fmt::{self, Display, Formatter};
use std::net::IpAddr;

use serde::Serialize;

use super::prefix::anchor_to_address;
use super::{IpVersion, Prefix};
use crate::error::RangeError;

/// Largest representable V6 anchor.
///
/// The top bit of a V6 anchor must stay clear so anchors remain
/// representable as signed 64-bit quantities; prefixes beyond
/// `7fff:ffff:ffff:ffff::/64` are out of domain.
pub const MAX_V6_ANCHOR: u64 = i64::MAX as u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
/// A stored prefix mapped onto the target granularity.
///
/// `first` and `last` are the anchors of the first and last
/// target-granularity subnet the prefix covers; `count` is how many of them
/// there are. The identity of a record is `(first, prefix_len)`.
pub struct SreRecord {
    pub first: u64,
    pub prefix_len: u8,
    pub last: u64,
    pub count: u128,
}

impl SreRecord {
    /// Map `prefix` onto `target_len`-sized subnets.
    ///
    /// Pure arithmetic; all domain checks happen here so downstream code
    /// never sees an unrepresentable range.
    pub(crate) fn compute(prefix: &Prefix, target_len: u8) -> Result<SreRecord, RangeError> {
        let version = prefix.version();
        let anchor_bits = version.anchor_bits();

        if target_len > anchor_bits {
            return Err(RangeError::TargetBeyondDomain {
                target_len,
                version,
            });
        }
        if prefix.prefix_len() > target_len {
            return Err(RangeError::LengthAboveTarget {
                prefix: *prefix,
                target_len,
            });
        }

        let first = prefix.anchor();
        if version == IpVersion::V6 && first > MAX_V6_ANCHOR {
            return Err(RangeError::AnchorOverflow { prefix: *prefix });
        }

        let diff = u32::from(target_len - prefix.prefix_len());
        let shift = u32::from(anchor_bits - target_len);
        // diff + shift <= 64, so the span never leaves the anchor domain;
        // u128 keeps the /0 edge cases off the shift-overflow cliff.
        let span = ((1u128 << diff) - 1) << shift;

        Ok(SreRecord {
            first,
            prefix_len: prefix.prefix_len(),
            last: first | (span as u64),
            count: 1u128 << diff,
        })
    }

    pub(crate) fn key(&self) -> (u64, u8) {
        (self.first, self.prefix_len)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
/// One entry of a derived covering set.
///
/// Entries of one derivation are pairwise disjoint and their union equals
/// the union of every stored prefix's covered space.
pub struct SreEntry {
    version: IpVersion,
    first: u64,
    last: u64,
    prefix_len: u8,
    count: u128,
}

impl SreEntry {
    pub(crate) fn new(version: IpVersion, record: &SreRecord) -> SreEntry {
        SreEntry {
            version,
            first: record.first,
            last: record.last,
            prefix_len: record.prefix_len,
            count: record.count,
        }
    }

    pub fn version(&self) -> IpVersion {
        self.version
    }

    /// Anchor of the first covered target-granularity subnet.
    pub fn first(&self) -> u64 {
        self.first
    }

    /// Anchor of the last covered target-granularity subnet.
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Length of the original prefix this entry was derived from.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Number of target-granularity subnets the entry covers.
    pub fn count(&self) -> u128 {
        self.count
    }

    pub fn first_address(&self) -> IpAddr {
        anchor_to_address(self.version, self.first)
    }

    pub fn last_address(&self) -> IpAddr {
        anchor_to_address(self.version, self.last)
    }
}

impl Display for SreEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (from /{}, {} subnets)",
            self.first_address(),
            self.last_address(),
            self.prefix_len,
            self.count
        )
    }
}
