//! Derivation of the minimal covering set.
//!
//! Ranges derived from CIDR prefixes never partially overlap: any two are
//! either disjoint or one fully contains the other (a laminar family). The
//! resolver leans on that to find the maximal ranges with two grouping
//! passes and one sweep instead of a general interval merge, which would
//! also mask violations of the invariant instead of surfacing them.
use std::collections::BTreeMap;

use tracing::trace;

use crate::common::SreRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of one full derivation.
pub(crate) struct Coverage {
    /// Accepted entries, in acceptance order: ascending (prefix_len, first).
    pub entries: Vec<SreRecord>,
    /// Total number of target-granularity subnets covered.
    pub total_count: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Two stored ranges that partially overlap, which CIDR alignment rules
/// out. Finding one means the store is corrupt; the derivation is aborted.
pub(crate) struct LaminarViolation {
    pub kept: SreRecord,
    pub candidate: SreRecord,
}

/// Derive the minimal set of non-overlapping ranges whose union equals the
/// union of `records`, recomputed from scratch on every call.
pub(crate) fn resolve<'a, I>(records: I) -> Result<Coverage, LaminarViolation>
where
    I: IntoIterator<Item = &'a SreRecord>,
{
    // Among ranges sharing a right edge, only the one reaching furthest
    // left can be maximal; the rest are nested inside it.
    let mut by_last: BTreeMap<u64, &SreRecord> = BTreeMap::new();
    for record in records {
        let slot = by_last.entry(record.last).or_insert(record);
        if record.first < slot.first {
            *slot = record;
        }
    }

    // Symmetric pass on the left edge.
    let mut by_first: BTreeMap<u64, &SreRecord> = BTreeMap::new();
    for record in by_last.values().copied() {
        let slot = by_first.entry(record.first).or_insert(record);
        if record.last > slot.last {
            *slot = record;
        }
    }

    // Strictly interior nesting survives both passes, so the sweep is the
    // final containment filter. Least specific first, then by first, which
    // makes acceptance deterministic.
    let mut candidates: Vec<&SreRecord> = by_first.values().copied().collect();
    candidates.sort_unstable_by_key(|record| (record.prefix_len, record.first));

    let mut accepted: BTreeMap<u64, SreRecord> = BTreeMap::new();
    let mut entries = Vec::new();
    let mut total_count: u128 = 0;

    for candidate in candidates {
        if let Some((_, kept)) = accepted.range(..=candidate.first).next_back() {
            if candidate.first <= kept.last {
                if candidate.last > kept.last {
                    return Err(LaminarViolation {
                        kept: *kept,
                        candidate: *candidate,
                    });
                }
                trace!(?candidate, ?kept, "candidate already covered");
                continue;
            }
        }
        if let Some((_, kept)) = accepted.range(candidate.first..).next() {
            if kept.first <= candidate.last {
                return Err(LaminarViolation {
                    kept: *kept,
                    candidate: *candidate,
                });
            }
        }

        accepted.insert(candidate.first, *candidate);
        entries.push(*candidate);
        total_count += candidate.count;
    }

    Ok(Coverage {
        entries,
        total_count,
    })
}
