//! IP version tag and its bit domains.
use std::fmt::{self, Display, Formatter};

use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// IP version of a prefix, range or store.
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Width of a full address in this version.
    pub fn address_bits(&self) -> u8 {
        match self {
            IpVersion::V4 => 32,
            IpVersion::V6 => 128,
        }
    }

    /// Width of the anchor domain ranges are measured in.
    ///
    /// For V6 only the leading 64 bits of an address participate; the
    /// interface identifier is discarded.
    pub fn anchor_bits(&self) -> u8 {
        match self {
            IpVersion::V4 => 32,
            IpVersion::V6 => 64,
        }
    }
}

impl Display for IpVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "IPv4"),
            IpVersion::V6 => write!(f, "IPv6"),
        }
    }
}

impl Serialize for IpVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            IpVersion::V4 => serializer.serialize_u8(4),
            IpVersion::V6 => serializer.serialize_u8(6),
        }
    }
}
