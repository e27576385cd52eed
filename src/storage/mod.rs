//! Snapshot storage for price records.
//!
//! Each scraping run writes one immutable, timestamp-named CSV snapshot per
//! scope; master files are derived views rebuilt from the snapshot set.
//!
//! ## Directory Structure
//!
//! ```text
//! prices/
//! ├── national_master.csv   # Derived: one snapshot per date, concatenated
//! ├── states_master.csv
//! ├── national/             # Immutable dated snapshots
//! │   └── 2024-01-01 00:00:00.000000+00:00.csv
//! └── states/
//!     └── 2024-01-01 00:00:00.000000+00:00.csv
//! ```

pub mod consolidate;
pub mod dates;
pub mod snapshot;

pub use consolidate::select_latest_per_date;
pub use snapshot::SnapshotStore;

/// Scope holding the per-state national index rows.
pub const SCOPE_NATIONAL: &str = "national";

/// Scope holding the county-level detail rows.
pub const SCOPE_STATES: &str = "states";

/// Both scopes, in consolidation order.
pub const SCOPES: [&str; 2] = [SCOPE_NATIONAL, SCOPE_STATES];

/// File extension identifying snapshot files.
pub const SNAPSHOT_EXT: &str = ".csv";

/// Date key of a snapshot filename: the text before the first whitespace
/// (the date portion of the timestamp the file is named by).
pub fn date_key(name: &str) -> &str {
    match name.find(char::is_whitespace) {
        Some(i) => &name[..i],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key() {
        assert_eq!(date_key("2024-01-01 00:00:00.000000+00:00.csv"), "2024-01-01");
        assert_eq!(date_key("no-whitespace.csv"), "no-whitespace.csv");
    }
}
