//! Pipeline entry points for scraper operations.
//!
//! - `run_scrape`: fetch, extract, snapshot, and consolidate in one run
//! - `run_consolidate`: rebuild the master files from snapshots on disk

pub mod scrape;

pub use scrape::{ScrapeOutcome, run_consolidate, run_scrape, write_snapshots};
