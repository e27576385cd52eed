//! Master file consolidation.
//!
//! A master file is a derived view: every rebuild scans the scope's
//! snapshot directory, selects one snapshot per date key, and rewrites the
//! master from scratch. The previous master's contents are never consulted.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::error::Result;

use super::{SNAPSHOT_EXT, SnapshotStore, date_key};

/// Select one snapshot filename per date key.
///
/// Policy: when several snapshots share a date, the lexicographically
/// greatest filename wins, which is the latest full timestamp of that day
/// since names begin with an ISO-8601 timestamp. Non-snapshot names are
/// ignored.
/// The retained names are returned in lexicographic (chronological) order.
pub fn select_latest_per_date(names: &[String]) -> Vec<String> {
    let mut by_date: BTreeMap<&str, &str> = BTreeMap::new();

    for name in names {
        if !name.ends_with(SNAPSHOT_EXT) {
            continue;
        }
        let key = date_key(name);
        match by_date.get(key) {
            Some(kept) if *kept >= name.as_str() => {}
            _ => {
                by_date.insert(key, name);
            }
        }
    }

    let mut selected: Vec<String> = by_date.into_values().map(str::to_string).collect();
    selected.sort();
    selected
}

impl SnapshotStore {
    /// Rebuild a scope's master file from the snapshots currently on disk.
    ///
    /// Truncates any previous master and concatenates the selected
    /// snapshots' contents in filename order. Idempotent while the scope
    /// directory is unchanged.
    pub fn consolidate(&self, scope: &str) -> Result<PathBuf> {
        let dir = self.scope_dir(scope);

        let mut names = Vec::new();
        for dent in fs::read_dir(&dir)? {
            if let Ok(name) = dent?.file_name().into_string() {
                names.push(name);
            }
        }

        let selected = select_latest_per_date(&names);
        let master = self.master_path(scope);
        let mut out = fs::File::create(&master)?;
        for name in &selected {
            let contents = fs::read(dir.join(name))?;
            out.write_all(&contents)?;
        }

        log::info!(
            "Consolidated {} snapshots into {}",
            selected.len(),
            master.display()
        );
        Ok(master)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_snapshots(snapshots: &[(&str, &str)]) -> (TempDir, SnapshotStore) {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let dir = store.scope_dir("national");
        fs::create_dir_all(&dir).unwrap();
        for (name, contents) in snapshots {
            fs::write(dir.join(name), contents).unwrap();
        }
        (tmp, store)
    }

    #[test]
    fn selects_one_name_per_date_keeping_the_latest() {
        let names = vec![
            "2024-01-01 00:00:00.000000+00:00.csv".to_string(),
            "2024-01-01 00:00:01.000000+00:00.csv".to_string(),
            "2024-01-02 09:00:00.000000+00:00.csv".to_string(),
            "notes.txt".to_string(),
        ];
        let selected = select_latest_per_date(&names);
        assert_eq!(
            selected,
            vec![
                "2024-01-01 00:00:01.000000+00:00.csv",
                "2024-01-02 09:00:00.000000+00:00.csv",
            ]
        );
    }

    #[test]
    fn selection_is_independent_of_input_order() {
        let mut names = vec![
            "2024-01-01 00:00:01.000000+00:00.csv".to_string(),
            "2024-01-01 00:00:00.000000+00:00.csv".to_string(),
        ];
        let forward = select_latest_per_date(&names);
        names.reverse();
        assert_eq!(forward, select_latest_per_date(&names));
        assert_eq!(forward.len(), 1);
    }

    #[test]
    fn master_concatenates_in_filename_order() {
        let (_tmp, store) = store_with_snapshots(&[
            ("2024-01-02 00:00:00.000000+00:00.csv", "2024-01-02,WA\n"),
            ("2024-01-01 00:00:00.000000+00:00.csv", "2024-01-01,WA\n"),
            ("2024-01-03 00:00:00.000000+00:00.csv", "2024-01-03,WA\n"),
        ]);

        let master = store.consolidate("national").unwrap();
        let contents = fs::read_to_string(master).unwrap();
        assert_eq!(contents, "2024-01-01,WA\n2024-01-02,WA\n2024-01-03,WA\n");
    }

    #[test]
    fn consolidation_is_idempotent() {
        let (_tmp, store) = store_with_snapshots(&[
            ("2024-01-01 00:00:00.000000+00:00.csv", "2024-01-01,WA\n"),
            ("2024-01-02 00:00:00.000000+00:00.csv", "2024-01-02,WA\n"),
        ]);

        let first = fs::read(store.consolidate("national").unwrap()).unwrap();
        let second = fs::read(store.consolidate("national").unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn same_date_snapshots_yield_exactly_one_in_the_master() {
        let (_tmp, store) = store_with_snapshots(&[
            ("2024-01-01 0000.csv", "early\n"),
            ("2024-01-01 0001.csv", "late\n"),
        ]);

        let master = store.consolidate("national").unwrap();
        let contents = fs::read_to_string(master).unwrap();
        assert_eq!(contents.lines().count(), 1);
        // Named policy: the latest timestamp of the day wins.
        assert_eq!(contents, "late\n");
    }

    #[test]
    fn rebuild_drops_rows_for_deleted_snapshots() {
        let (_tmp, store) = store_with_snapshots(&[
            ("2024-01-01 00:00:00.000000+00:00.csv", "2024-01-01,WA\n"),
            ("2024-01-02 00:00:00.000000+00:00.csv", "2024-01-02,WA\n"),
        ]);

        store.consolidate("national").unwrap();
        fs::remove_file(
            store
                .scope_dir("national")
                .join("2024-01-02 00:00:00.000000+00:00.csv"),
        )
        .unwrap();

        let master = store.consolidate("national").unwrap();
        assert_eq!(fs::read_to_string(master).unwrap(), "2024-01-01,WA\n");
    }

    #[test]
    fn missing_scope_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        assert!(store.consolidate("states").is_err());
    }
}
