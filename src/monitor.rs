//! Monitor facade.
use std::path::{Path, PathBuf};

use tracing::{debug, error, trace};

use crate::common::{IpVersion, Prefix, SreEntry, SreRecord};
use crate::config::Config;
use crate::dump;
use crate::error::{AddError, ConfigError, DumpError, ResolveError};
use crate::resolver::{self, Coverage};
use crate::store::PrefixStore;

#[derive(Debug)]
/// Tracks the unique smallest routable entries covered by a dynamic set of
/// IP prefixes.
///
/// Every instance owns an independent pair of per-version stores; the two
/// version domains never interact. All operations are synchronous and
/// bounded; queries derive a fresh covering set from the current store
/// contents (memoized until the next mutation of that version).
pub struct Monitor {
    config: Config,
    v4: VersionState,
    v6: VersionState,
}

#[derive(Debug)]
struct VersionState {
    store: PrefixStore,
    derived: Option<Coverage>,
}

impl VersionState {
    fn new(version: IpVersion) -> Self {
        VersionState {
            store: PrefixStore::new(version),
            derived: None,
        }
    }
}

impl Monitor {
    /// Create a monitor deriving coverage at the given target granularities.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Monitor {
            config,
            v4: VersionState::new(IpVersion::V4),
            v6: VersionState::new(IpVersion::V6),
        })
    }

    // === Public Methods ===

    /// Add `prefix` to its version's store.
    ///
    /// Fails with [RangeError](crate::RangeError) when the prefix cannot be
    /// mapped onto the target granularity, and with
    /// [DuplicateError](crate::DuplicateError) when the exact prefix is
    /// already stored.
    pub fn add(&mut self, prefix: Prefix) -> Result<(), AddError> {
        let target_len = self.config.target_for(prefix.version());
        let record = SreRecord::compute(&prefix, target_len)?;

        let state = self.state_mut(prefix.version());
        state.store.add(record)?;
        state.derived = None;

        trace!(%prefix, first = record.first, last = record.last, count = %record.count, "prefix added");
        Ok(())
    }

    /// Remove `prefix` from its version's store.
    ///
    /// Removing a prefix that was never added is a deliberate no-op, unlike
    /// the duplicate check on [add](Self::add).
    pub fn remove(&mut self, prefix: &Prefix) {
        let state = self.state_mut(prefix.version());

        if state.store.remove(prefix.anchor(), prefix.prefix_len()) {
            state.derived = None;
            trace!(%prefix, "prefix removed");
        } else {
            trace!(%prefix, "prefix not in the store, nothing removed");
        }
    }

    /// The covering set derived from `version`'s current store contents, in
    /// acceptance order.
    ///
    /// The returned entries are a snapshot, not a live view; later
    /// mutations do not affect them.
    pub fn entries(&mut self, version: IpVersion) -> Result<Vec<SreEntry>, ResolveError> {
        let coverage = self.derive(version)?;

        Ok(coverage
            .entries
            .iter()
            .map(|record| SreEntry::new(version, record))
            .collect())
    }

    /// Total number of distinct target-granularity subnets covered by
    /// `version`'s stored prefixes, overlaps counted once.
    pub fn total_count(&mut self, version: IpVersion) -> Result<u128, ResolveError> {
        Ok(self.derive(version)?.total_count)
    }

    /// Number of stored prefixes for `version` (not covered subnets).
    pub fn prefix_count(&self, version: IpVersion) -> usize {
        self.state(version).store.len()
    }

    /// Target prefix length used for `version`.
    pub fn target_prefix_len(&self, version: IpVersion) -> u8 {
        self.config.target_for(version)
    }

    /// Snapshot both raw stores to a JSON file in the current directory.
    pub fn dump(&self, context: &str) -> Result<PathBuf, DumpError> {
        dump::write_snapshot(
            Path::new("."),
            context,
            (&self.v4.store, self.config.target_prefix_len4),
            (&self.v6.store, self.config.target_prefix_len6),
        )
    }

    // === Private Methods ===

    fn state(&self, version: IpVersion) -> &VersionState {
        match version {
            IpVersion::V4 => &self.v4,
            IpVersion::V6 => &self.v6,
        }
    }

    fn state_mut(&mut self, version: IpVersion) -> &mut VersionState {
        match version {
            IpVersion::V4 => &mut self.v4,
            IpVersion::V6 => &mut self.v6,
        }
    }

    fn derive(&mut self, version: IpVersion) -> Result<&Coverage, ResolveError> {
        if self.state(version).derived.is_none() {
            let coverage = self.recompute(version)?;
            self.state_mut(version).derived = Some(coverage);
        }

        match self.state(version).derived {
            Some(ref coverage) => Ok(coverage),
            None => unreachable!("derivation was just memoized"),
        }
    }

    fn recompute(&self, version: IpVersion) -> Result<Coverage, ResolveError> {
        let state = self.state(version);

        match resolver::resolve(state.store.records()) {
            Ok(coverage) => {
                debug!(
                    %version,
                    stored = state.store.len(),
                    entries = coverage.entries.len(),
                    total = %coverage.total_count,
                    "covering set derived"
                );
                Ok(coverage)
            }
            Err(violation) => {
                let detail = format!(
                    "{:?} partially overlaps {:?}",
                    violation.candidate, violation.kept
                );
                error!(%version, %detail, "laminar invariant violated, aborting derivation");

                let dump = match self.dump(&format!("laminar violation on {}: {}", version, detail))
                {
                    Ok(path) => Some(path),
                    Err(e) => {
                        error!(error = %e, "failed to write the diagnostic dump");
                        None
                    }
                };

                Err(ResolveError::Inconsistent {
                    version,
                    detail,
                    dump,
                })
            }
        }
    }
}
