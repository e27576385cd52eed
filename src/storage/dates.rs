//! Date-prefixing utility for legacy snapshots.
//!
//! Early snapshots were written without the capture date as a leading
//! field. This rewrites every CSV file in a directory with the date key
//! from its filename prepended to each row.

use std::fs;
use std::path::Path;

use crate::error::Result;

use super::{SNAPSHOT_EXT, date_key};

/// Prefix each row of every CSV file in `input_dir` with the file's date
/// key. Returns the number of files rewritten.
pub fn prefix_dates(input_dir: &Path) -> Result<usize> {
    let mut rewritten = 0;

    for dent in fs::read_dir(input_dir)? {
        let dent = dent?;
        let Ok(name) = dent.file_name().into_string() else {
            continue;
        };
        if !name.ends_with(SNAPSHOT_EXT) {
            continue;
        }

        let date = date_key(&name).to_string();
        let path = dent.path();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = vec![date.clone()];
            row.extend(record.iter().map(str::to_string));
            rows.push(row);
        }
        drop(reader);

        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(&path)?;
        for row in &rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        log::debug!("Prefixed {} rows in {}", rows.len(), path.display());
        rewritten += 1;
    }

    Ok(rewritten)
}
