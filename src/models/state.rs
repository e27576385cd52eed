//! National index entry.

use serde::{Deserialize, Serialize};

/// One state's summary entry from the national index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateEntry {
    /// USPS abbreviation (two letters, uppercase)
    pub abbreviation: String,

    /// Full state name
    pub name: String,

    /// Average gas price as decimal text, never parsed to a number
    pub price: String,

    /// URL of the state's detail page
    pub detail_url: String,
}

impl StateEntry {
    /// Whether this entry is the federal district, which carries no
    /// county-level detail page worth descending into.
    pub fn is_federal_district(&self) -> bool {
        self.abbreviation == "DC"
    }

    /// Flatten into a snapshot row with the capture date prepended.
    pub fn as_row(&self, date: &str) -> Vec<String> {
        vec![
            date.to_string(),
            self.abbreviation.clone(),
            self.name.clone(),
            self.price.clone(),
            self.detail_url.clone(),
        ]
    }
}
