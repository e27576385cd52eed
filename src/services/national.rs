// src/services/national.rs

//! National index extraction.
//!
//! The root page embeds its per-state summary table as a delimited string
//! assigned to `iwmparam[0].placestxt` inside the last inline script.
//! The string is a `;`-separated list of segments, each a `,`-separated
//! record of abbreviation, name, price and detail URL. The trailing outer
//! segment and the trailing field of each segment are rendering artifacts,
//! not data.

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::StateEntry;

/// Marker identifying the places assignment inside the script text.
const PLACES_MARKER: &str = "iwmparam[0].placestxt";

/// Extract the national index from the root page document.
///
/// Returns an empty list when the marker is absent; callers treat that
/// as a legitimate no-data outcome. Fails with a typed error only when
/// the marker is present but its literal does not match the expected
/// delimiter grammar.
pub fn extract_national_index(html: &str) -> Result<Vec<StateEntry>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script").unwrap();

    let Some(script) = document.select(&selector).last() else {
        return Ok(Vec::new());
    };

    let text: String = script.text().collect();
    for line in text.lines() {
        if line.contains(PLACES_MARKER) {
            let literal = capture_places_literal(line)?;
            return parse_places_text(literal);
        }
    }

    Ok(Vec::new())
}

/// Capture the quoted string literal assigned to the places marker.
fn capture_places_literal(line: &str) -> Result<&str> {
    let pattern = Regex::new(r#"iwmparam\[0\]\.placestxt\s*=\s*"(.*)""#).unwrap();
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            AppError::data_format(
                "placestxt",
                "marker present but no quoted literal assignment found",
            )
        })
}

/// Parse the places text into state entries, in encounter order.
pub fn parse_places_text(text: &str) -> Result<Vec<StateEntry>> {
    let segments: Vec<&str> = text.trim().split(';').collect();

    let mut entries = Vec::new();
    // The final segment is a sentinel, not data.
    for segment in &segments[..segments.len().saturating_sub(1)] {
        let fields: Vec<&str> = segment.trim().split(',').collect();
        // The final field of each segment is a rendering artifact.
        if fields.len() != 5 {
            return Err(AppError::data_format(
                "placestxt",
                format!(
                    "expected 5 fields per segment, got {} in '{}'",
                    fields.len(),
                    segment.trim()
                ),
            ));
        }
        entries.push(StateEntry {
            abbreviation: fields[0].trim().to_string(),
            name: fields[1].trim().to_string(),
            price: fields[2].trim().to_string(),
            detail_url: fields[3].trim().to_string(),
        });
    }

    Ok(entries)
}
