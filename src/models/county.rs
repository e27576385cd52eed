//! County-level price record.

use serde::{Deserialize, Serialize};

/// One county's price record from a state's embedded map data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountyRecord {
    /// USPS abbreviation of the owning state
    pub state_abbreviation: String,

    /// Full name of the owning state
    pub state_name: String,

    /// County name
    pub county_name: String,

    /// Free-text price/comment field, not guaranteed numeric
    pub price_comment: String,
}

impl CountyRecord {
    /// Flatten into a snapshot row with the capture date prepended.
    pub fn as_row(&self, date: &str) -> Vec<String> {
        vec![
            date.to_string(),
            self.state_abbreviation.clone(),
            self.state_name.clone(),
            self.county_name.clone(),
            self.price_comment.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_row() {
        let record = CountyRecord {
            state_abbreviation: "WA".to_string(),
            state_name: "Washington".to_string(),
            county_name: "King".to_string(),
            price_comment: "Regular: $3.55".to_string(),
        };
        assert_eq!(
            record.as_row("2024-01-01"),
            vec![
                "2024-01-01",
                "WA",
                "Washington",
                "King",
                "Regular: $3.55"
            ]
        );
    }
}
