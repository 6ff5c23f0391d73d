//! Per-version prefix store.
use std::collections::btree_map::{Entry, Values};
use std::collections::BTreeMap;

use crate::common::{IpVersion, Prefix, SreRecord};
use crate::error::DuplicateError;

#[derive(Debug)]
/// Keyed collection of one IP version's stored range records.
///
/// Records are keyed by (first, prefix_len), the identity of the original
/// prefix at the target granularity. Inserting an existing key is an error;
/// removing an absent key is not.
pub(crate) struct PrefixStore {
    version: IpVersion,
    records: BTreeMap<(u64, u8), SreRecord>,
}

impl PrefixStore {
    pub fn new(version: IpVersion) -> Self {
        PrefixStore {
            version,
            records: BTreeMap::new(),
        }
    }

    // === Public Methods ===

    pub fn add(&mut self, record: SreRecord) -> Result<(), DuplicateError> {
        match self.records.entry(record.key()) {
            Entry::Occupied(_) => Err(DuplicateError {
                prefix: Prefix::from_anchor(self.version, record.first, record.prefix_len),
            }),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Remove the record stored under (first, prefix_len).
    ///
    /// Returns whether a record was removed; an absent key is a no-op.
    pub fn remove(&mut self, first: u64, prefix_len: u8) -> bool {
        self.records.remove(&(first, prefix_len)).is_some()
    }

    /// Number of stored records (not covered subnets).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Stored records in key order.
    pub fn records(&self) -> Values<'_, (u64, u8), SreRecord> {
        self.records.values()
    }

    pub fn version(&self) -> IpVersion {
        self.version
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::Prefix;

    fn record(s: &str, target_len: u8) -> SreRecord {
        let prefix: Prefix = s.parse().expect("valid prefix");
        SreRecord::compute(&prefix, target_len).expect("in range")
    }

    #[test]
    fn add_is_unique_per_key() {
        let mut store = PrefixStore::new(IpVersion::V4);

        store.add(record("192.0.2.0/24", 25)).expect("first add");
        let err = store
            .add(record("192.0.2.0/24", 25))
            .expect_err("duplicate key");
        assert_eq!(err.prefix.to_string(), "192.0.2.0/24");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn same_network_at_two_lengths_is_not_a_duplicate() {
        let mut store = PrefixStore::new(IpVersion::V4);

        store.add(record("10.0.0.0/8", 25)).expect("add /8");
        store.add(record("10.0.0.0/24", 25)).expect("add /24");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn v6_duplicates() {
        let mut store = PrefixStore::new(IpVersion::V6);

        store.add(record("2001:ffff::/32", 48)).expect("first add");
        assert!(store.add(record("2001:ffff::/32", 48)).is_err());

        store.add(record("2001:bbbb::/32", 64)).expect("add /32");
        store.add(record("2001:bbbb::/56", 64)).expect("add /56");
    }

    #[test]
    fn removing_an_absent_key_is_a_no_op() {
        let mut store = PrefixStore::new(IpVersion::V4);
        let mapped = record("10.0.0.0/8", 24);

        assert!(!store.remove(mapped.first, mapped.prefix_len));

        store.add(mapped).expect("add");
        assert!(store.remove(mapped.first, mapped.prefix_len));
        assert_eq!(store.len(), 0);
        assert!(!store.remove(mapped.first, mapped.prefix_len));
    }
}
