use crate::common::IpVersion;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Monitor configurations
pub struct Config {
    /// Granularity IPv4 ranges are measured and counted at, in 1..=32.
    ///
    /// Defaults to 24
    pub target_prefix_len4: u8,
    /// Granularity IPv6 ranges are measured and counted at, in 1..=64.
    ///
    /// Defaults to 40
    pub target_prefix_len6: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_prefix_len4: 24,
            target_prefix_len6: 40,
        }
    }
}

impl Config {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.target_prefix_len4 < 1 || self.target_prefix_len4 > 32 {
            return Err(ConfigError::InvalidTargetLen4(self.target_prefix_len4));
        }
        if self.target_prefix_len6 < 1 || self.target_prefix_len6 > 64 {
            return Err(ConfigError::InvalidTargetLen6(self.target_prefix_len6));
        }
        Ok(())
    }

    pub(crate) fn target_for(&self, version: IpVersion) -> u8 {
        match version {
            IpVersion::V4 => self.target_prefix_len4,
            IpVersion::V6 => self.target_prefix_len6,
        }
    }
}
