//! Dated snapshot writing.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::Result;

use super::SNAPSHOT_EXT;

/// Filesystem store for dated snapshots and derived master files.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root_dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Directory holding a scope's dated snapshots.
    pub fn scope_dir(&self, scope: &str) -> PathBuf {
        self.root_dir.join(scope)
    }

    /// Path of a scope's master file.
    pub fn master_path(&self, scope: &str) -> PathBuf {
        self.root_dir.join(format!("{scope}_master{SNAPSHOT_EXT}"))
    }

    /// Write one snapshot file named by the capture timestamp, creating the
    /// scope directory if absent.
    ///
    /// Rows are written as CSV with standard quoting, no header. A failure
    /// may leave a partial file behind but is never reported as success.
    pub fn write_snapshot(
        &self,
        scope: &str,
        timestamp: &str,
        rows: &[Vec<String>],
    ) -> Result<PathBuf> {
        let dir = self.scope_dir(scope);
        fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{timestamp}{SNAPSHOT_EXT}"));
        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        Ok(path)
    }
}

/// Capture timestamp used as a snapshot's identity and filename.
///
/// The date portion precedes the first space so the filename's date key is
/// the calendar date.
pub fn snapshot_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M:%S%.6f+00:00").to_string()
}

/// Capture date recorded as the first field of every snapshot row.
pub fn snapshot_date(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}
