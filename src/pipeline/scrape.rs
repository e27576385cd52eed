// src/pipeline/scrape.rs

//! Price scraping pipeline.

use chrono::Utc;
use reqwest::blocking::Client;

use crate::error::Result;
use crate::models::Config;
use crate::services::{StateFailure, counties, national};
use crate::storage::{SCOPE_NATIONAL, SCOPE_STATES, SCOPES, SnapshotStore};
use crate::storage::snapshot::{snapshot_date, snapshot_timestamp};
use crate::utils::http;

/// Summary of a scrape run.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    /// States in the national index
    pub national_count: usize,
    /// County rows extracted across all states
    pub county_count: usize,
    /// States whose detail chain failed
    pub state_failures: Vec<StateFailure>,
    /// Scopes whose snapshot write failed, with the error
    pub write_failures: Vec<(String, String)>,
    /// Scopes whose consolidation failed, with the error
    pub consolidation_failures: Vec<(String, String)>,
}

/// Run the full pipeline: root page → national index → county details →
/// two dated snapshots → two rebuilt master files.
///
/// Root-page failures are fatal since no records can be derived. Every
/// later failure is scoped: a failing state never stops its siblings, a
/// failing national write never prevents the states write, and each
/// scope's consolidation runs regardless of the other's outcome.
pub fn run_scrape(config: &Config, client: &Client, store: &SnapshotStore) -> Result<ScrapeOutcome> {
    let start = Utc::now();
    log::info!("Fetching national index from {}", config.scraper.base_url);

    let page = http::fetch_text(client, &config.scraper.base_url)?;
    let states = national::extract_national_index(&page)?;

    if states.is_empty() {
        log::warn!("No embedded price data found on the root page; nothing to write");
        return Ok(ScrapeOutcome::default());
    }
    log::info!("National index: {} states", states.len());

    let detail = counties::fetch_all_counties(client, &config.scraper, &states);
    log::info!(
        "County extraction: {} rows from {} states ({} failed)",
        detail.counties.len(),
        detail.state_total - detail.failures.len(),
        detail.failures.len()
    );

    let now = Utc::now();
    let timestamp = snapshot_timestamp(now);
    let date = snapshot_date(now);

    let mut outcome = ScrapeOutcome {
        national_count: states.len(),
        county_count: detail.counties.len(),
        state_failures: detail.failures,
        ..ScrapeOutcome::default()
    };

    let national_rows: Vec<Vec<String>> = states.iter().map(|s| s.as_row(&date)).collect();
    let county_rows: Vec<Vec<String>> = detail.counties.iter().map(|c| c.as_row(&date)).collect();

    outcome.write_failures = write_snapshots(store, &timestamp, &national_rows, &county_rows);
    outcome.consolidation_failures = run_consolidate(store);

    let elapsed = Utc::now() - start;
    log::info!("Scrape finished in {} ms", elapsed.num_milliseconds());
    Ok(outcome)
}

/// Write both scopes' snapshots under one capture timestamp.
///
/// A failing scope never prevents the other's write. Returns the scopes
/// that failed, with their errors.
pub fn write_snapshots(
    store: &SnapshotStore,
    timestamp: &str,
    national_rows: &[Vec<String>],
    county_rows: &[Vec<String>],
) -> Vec<(String, String)> {
    let mut failures = Vec::new();
    for (scope, rows) in [(SCOPE_NATIONAL, national_rows), (SCOPE_STATES, county_rows)] {
        match store.write_snapshot(scope, timestamp, rows) {
            Ok(path) => log::info!("Wrote {} rows to {}", rows.len(), path.display()),
            Err(error) => {
                log::error!("Failed to write {scope} snapshot: {error}");
                failures.push((scope.to_string(), error.to_string()));
            }
        }
    }
    failures
}

/// Rebuild both scopes' master files, each independently of the other.
///
/// Returns the scopes that failed, with their errors.
pub fn run_consolidate(store: &SnapshotStore) -> Vec<(String, String)> {
    let mut failures = Vec::new();
    for scope in SCOPES {
        if let Err(error) = store.consolidate(scope) {
            log::error!("Consolidation failed for scope {scope}: {error}");
            failures.push((scope.to_string(), error.to_string()));
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn national_write_failure_does_not_block_states_write() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());

        // A regular file occupies the national scope's directory path.
        fs::write(tmp.path().join(SCOPE_NATIONAL), "in the way").unwrap();

        let timestamp = "2024-01-01 00:00:00.000000+00:00";
        let national_rows = vec![vec!["2024-01-01".to_string(), "WA".to_string()]];
        let county_rows = vec![vec![
            "2024-01-01".to_string(),
            "WA".to_string(),
            "King".to_string(),
        ]];

        let failures = write_snapshots(&store, timestamp, &national_rows, &county_rows);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, SCOPE_NATIONAL);
        assert!(
            store
                .scope_dir(SCOPE_STATES)
                .join(format!("{timestamp}.csv"))
                .exists()
        );
    }

    #[test]
    fn consolidate_failure_in_one_scope_does_not_block_the_other() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());

        // Only the states scope has snapshots on disk.
        let dir = store.scope_dir(SCOPE_STATES);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("2024-01-01 00:00:00.000000+00:00.csv"),
            "2024-01-01,WA,Washington,King,3.55\n",
        )
        .unwrap();

        let failures = run_consolidate(&store);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, SCOPE_NATIONAL);
        assert!(store.master_path(SCOPE_STATES).exists());
    }
}
