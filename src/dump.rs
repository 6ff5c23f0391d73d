//! Diagnostic snapshots of the raw stores.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::Serialize;

use crate::common::{IpVersion, SreRecord};
use crate::error::DumpError;
use crate::store::PrefixStore;

#[derive(Serialize)]
struct Snapshot<'a> {
    context: &'a str,
    v4: VersionSnapshot<'a>,
    v6: VersionSnapshot<'a>,
}

#[derive(Serialize)]
struct VersionSnapshot<'a> {
    version: IpVersion,
    target_prefix_len: u8,
    prefixes: Vec<&'a SreRecord>,
}

impl<'a> VersionSnapshot<'a> {
    fn new(store: &'a PrefixStore, target_prefix_len: u8) -> Self {
        VersionSnapshot {
            version: store.version(),
            target_prefix_len,
            prefixes: store.records().collect(),
        }
    }
}

/// Write both stores' raw records and the caller's context to a JSON file
/// under `dir`, named `dump-{unix seconds}_{random suffix}.json`.
///
/// Returns the path of the written file.
pub(crate) fn write_snapshot(
    dir: &Path,
    context: &str,
    v4: (&PrefixStore, u8),
    v6: (&PrefixStore, u8),
) -> Result<PathBuf, DumpError> {
    let snapshot = Snapshot {
        context,
        v4: VersionSnapshot::new(v4.0, v4.1),
        v6: VersionSnapshot::new(v6.0, v6.1),
    };

    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    let path = dir.join(format!("dump-{}_{:04}.json", seconds, suffix));

    let body = serde_json::to_vec_pretty(&snapshot)?;
    fs::write(&path, body)?;

    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::{IpVersion, Prefix};

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut v4 = PrefixStore::new(IpVersion::V4);
        let v6 = PrefixStore::new(IpVersion::V6);

        let prefix: Prefix = "10.0.0.0/8".parse().expect("valid prefix");
        v4.add(SreRecord::compute(&prefix, 24).expect("in range"))
            .expect("add");

        let dir = std::env::temp_dir();
        let path = write_snapshot(&dir, "unit test", (&v4, 24), (&v6, 40)).expect("snapshot");

        let body = fs::read_to_string(&path).expect("readable dump");
        let value: serde_json::Value = serde_json::from_str(&body).expect("valid json");
        assert_eq!(value["context"], "unit test");
        assert_eq!(value["v4"]["version"], 4);
        assert_eq!(value["v4"]["target_prefix_len"], 24);
        assert_eq!(value["v4"]["prefixes"][0]["prefix_len"], 8);
        assert_eq!(value["v6"]["prefixes"].as_array().map(|a| a.len()), Some(0));

        fs::remove_file(path).expect("cleanup");
    }
}
