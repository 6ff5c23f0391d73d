//! A CIDR prefix reduced to its anchor form.
use std::fmt::{self, Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::IpVersion;
use crate::error::ParseError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// An IP network prefix, stored as its version, anchor and prefix length.
///
/// The anchor is the network address's leading [anchor_bits](IpVersion::anchor_bits)
/// bits as an unsigned integer. Host bits below the prefix length are masked
/// off on construction, and for V6 the low 64 bits of the address (the
/// interface identifier) are discarded.
pub struct Prefix {
    version: IpVersion,
    anchor: u64,
    prefix_len: u8,
}

impl Prefix {
    /// Create a prefix from an address and a prefix length.
    ///
    /// Fails if `prefix_len` exceeds the address width of the version.
    pub fn new(address: IpAddr, prefix_len: u8) -> Result<Prefix, ParseError> {
        match address {
            IpAddr::V4(v4) => {
                if prefix_len > 32 {
                    return Err(ParseError::PrefixLengthOutOfRange {
                        prefix_len,
                        max: 32,
                    });
                }
                // Widen so a /0 mask doesn't shift by the full bit width.
                let right = u32::from(32 - prefix_len);
                let anchor = (u64::from(u32::from(v4)) >> right) << right;

                Ok(Prefix {
                    version: IpVersion::V4,
                    anchor,
                    prefix_len,
                })
            }
            IpAddr::V6(v6) => {
                if prefix_len > 128 {
                    return Err(ParseError::PrefixLengthOutOfRange {
                        prefix_len,
                        max: 128,
                    });
                }
                let bits = u128::from(v6);
                let network = if prefix_len == 0 {
                    0
                } else {
                    let right = u32::from(128 - prefix_len);
                    (bits >> right) << right
                };

                Ok(Prefix {
                    version: IpVersion::V6,
                    anchor: (network >> 64) as u64,
                    prefix_len,
                })
            }
        }
    }

    pub(crate) fn from_anchor(version: IpVersion, anchor: u64, prefix_len: u8) -> Prefix {
        Prefix {
            version,
            anchor,
            prefix_len,
        }
    }

    pub fn version(&self) -> IpVersion {
        self.version
    }

    /// The network address's leading anchor-domain bits.
    pub fn anchor(&self) -> u64 {
        self.anchor
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// The network address this prefix anchors at.
    ///
    /// For V6 the discarded interface identifier reads back as zero.
    pub fn network_address(&self) -> IpAddr {
        anchor_to_address(self.version, self.anchor)
    }
}

/// Integer anchor back to its address form.
pub(crate) fn anchor_to_address(version: IpVersion, anchor: u64) -> IpAddr {
    match version {
        IpVersion::V4 => IpAddr::V4(Ipv4Addr::from(anchor as u32)),
        IpVersion::V6 => IpAddr::V6(Ipv6Addr::from(u128::from(anchor) << 64)),
    }
}

impl FromStr for Prefix {
    type Err = ParseError;

    /// Parse `address/len` notation; a bare address is a host-length prefix.
    fn from_str(s: &str) -> Result<Prefix, ParseError> {
        let s = s.trim();

        let (raw_address, raw_len) = match s.find('/') {
            Some(at) => (&s[..at], Some(&s[at + 1..])),
            None => (s, None),
        };

        let address: IpAddr = raw_address.parse().map_err(|_| ParseError::InvalidAddress {
            input: s.to_string(),
        })?;

        let prefix_len = match raw_len {
            Some(raw) => raw
                .parse::<u8>()
                .map_err(|_| ParseError::InvalidPrefixLength {
                    input: s.to_string(),
                })?,
            None => match address {
                IpAddr::V4(_) => 32,
                IpAddr::V6(_) => 128,
            },
        };

        Prefix::new(address, prefix_len)
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_address(), self.prefix_len)
    }
}

impl Serialize for Prefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parsed(s: &str) -> Prefix {
        s.parse().expect("valid prefix")
    }

    #[test]
    fn host_bits_are_masked() {
        assert_eq!(parsed("1.2.3.4/8"), parsed("1.0.0.0/8"));
        assert_eq!(parsed("1.2.3.4/8").to_string(), "1.0.0.0/8");
        assert_eq!(parsed("2001:db8::beef/32").to_string(), "2001:db8::/32");
    }

    #[test]
    fn bare_address_is_a_host_prefix() {
        assert_eq!(parsed("192.168.0.1"), parsed("192.168.0.1/32"));
        assert_eq!(parsed("2001:db8::").prefix_len(), 128);
    }

    #[test]
    fn v6_interface_identifier_is_discarded() {
        let prefix = parsed("2001:db8::1/128");
        assert_eq!(prefix.anchor(), 0x2001_0db8_0000_0000);
        assert_eq!(prefix.network_address().to_string(), "2001:db8::");
    }

    #[test]
    fn zero_length_prefixes() {
        assert_eq!(parsed("255.255.255.255/0").anchor(), 0);
        assert_eq!(parsed("ffff::/0").anchor(), 0);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            "10.0.0/8".parse::<Prefix>(),
            Err(ParseError::InvalidAddress { .. })
        ));
        assert!(matches!(
            "10.0.0.0/x".parse::<Prefix>(),
            Err(ParseError::InvalidPrefixLength { .. })
        ));
        assert!(matches!(
            "10.0.0.0/".parse::<Prefix>(),
            Err(ParseError::InvalidPrefixLength { .. })
        ));
        assert!(matches!(
            "10.0.0.0/33".parse::<Prefix>(),
            Err(ParseError::PrefixLengthOutOfRange { max: 32, .. })
        ));
        assert!(matches!(
            "2001:db8::/129".parse::<Prefix>(),
            Err(ParseError::PrefixLengthOutOfRange { max: 128, .. })
        ));
    }
}
