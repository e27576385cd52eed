// src/services/counties.rs

//! Per-state county extraction.
//!
//! Each state's detail page references a "premium HTML5 map" data script.
//! That script assigns a `map_data` object literal mapping region keys to
//! county records (`name`, `comment`), followed by a sibling `groups` key.
//! The literal is isolated by balanced-brace scanning and decoded as JSON.

use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{CountyRecord, ScraperConfig, StateEntry};
use crate::utils::{self, http};

/// Substring identifying the map data script among the page's scripts.
const MAP_DATA_SRC_PATTERN: &str = "premiumhtml5map_js_data";

/// Key carrying the county mapping inside the map data script.
const MAP_DATA_KEY: &str = "map_data";

/// One county entry as encoded in the map data literal.
#[derive(Debug, Deserialize)]
struct CountyData {
    name: String,
    comment: String,
}

/// Summary of a per-state extraction pass.
#[derive(Debug, Default)]
pub struct DetailOutcome {
    pub counties: Vec<CountyRecord>,
    pub state_total: usize,
    pub failures: Vec<StateFailure>,
}

/// A state whose detail chain could not be extracted.
#[derive(Debug)]
pub struct StateFailure {
    pub abbreviation: String,
    pub error: String,
}

/// States eligible for detail extraction.
///
/// The federal district stays in the national index but is never
/// descended into.
pub fn detail_targets(entries: &[StateEntry]) -> Vec<&StateEntry> {
    entries
        .iter()
        .filter(|entry| !entry.is_federal_district())
        .collect()
}

/// Fetch county records for every eligible state, sequentially over one
/// shared client.
///
/// A failing state is logged and recorded in the outcome; it never stops
/// extraction of the remaining states.
pub fn fetch_all_counties(
    client: &Client,
    config: &ScraperConfig,
    entries: &[StateEntry],
) -> DetailOutcome {
    let targets = detail_targets(entries);
    let delay = Duration::from_millis(config.request_delay_ms);

    let mut outcome = DetailOutcome {
        state_total: targets.len(),
        ..DetailOutcome::default()
    };

    for entry in targets {
        match fetch_state_counties(client, entry) {
            Ok(counties) => {
                log::debug!("{}: {} counties", entry.abbreviation, counties.len());
                outcome.counties.extend(counties);
            }
            Err(error) => {
                log::warn!(
                    "Failed to extract counties for {} ({}): {}",
                    entry.abbreviation,
                    entry.detail_url,
                    error
                );
                outcome.failures.push(StateFailure {
                    abbreviation: entry.abbreviation.clone(),
                    error: error.to_string(),
                });
            }
        }

        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    outcome
}

/// Run the two-fetch detail chain for a single state.
fn fetch_state_counties(client: &Client, entry: &StateEntry) -> Result<Vec<CountyRecord>> {
    let page = http::fetch_text(client, &entry.detail_url)?;
    let src = find_map_data_src(&page)?;
    let data_url = utils::resolve(&entry.detail_url, &src).unwrap_or(src);
    let script = http::fetch_text(client, &data_url)?;
    extract_counties(entry, &script)
}

/// Find the src attribute of the map data script in a detail page.
pub fn find_map_data_src(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script[src]").unwrap();

    for element in document.select(&selector) {
        if let Some(src) = element.value().attr("src") {
            if src.contains(MAP_DATA_SRC_PATTERN) {
                return Ok(src.to_string());
            }
        }
    }

    Err(AppError::page_structure(
        "state detail page",
        format!("no script element with src matching '{MAP_DATA_SRC_PATTERN}'"),
    ))
}

/// Build county records for a state from its map data script text.
pub fn extract_counties(entry: &StateEntry, script: &str) -> Result<Vec<CountyRecord>> {
    let map = parse_map_data(script)?;
    Ok(map
        .into_values()
        .map(|county| CountyRecord {
            state_abbreviation: entry.abbreviation.clone(),
            state_name: entry.name.clone(),
            county_name: county.name,
            price_comment: county.comment,
        })
        .collect())
}

/// Locate and decode the `map_data` object literal.
fn parse_map_data(script: &str) -> Result<BTreeMap<String, CountyData>> {
    for line in script.trim().lines() {
        if line.contains(MAP_DATA_KEY) {
            let literal = extract_map_data_literal(line.trim())?;
            return serde_json::from_str(literal)
                .map_err(|e| AppError::data_format(MAP_DATA_KEY, e));
        }
    }

    Err(AppError::page_structure(
        "map data script",
        format!("no line carries a '{MAP_DATA_KEY}' assignment"),
    ))
}

/// Isolate the balanced object literal assigned to `map_data`.
///
/// The literal is everything from the first `{` after the key up to its
/// matching close brace; the sibling `groups` key that follows is thereby
/// excluded without pattern-matching on it.
fn extract_map_data_literal(line: &str) -> Result<&str> {
    let key_pos = line.find(MAP_DATA_KEY).ok_or_else(|| {
        AppError::data_format(MAP_DATA_KEY, "key not present in candidate line")
    })?;
    let rest = &line[key_pos..];

    let open = rest.find('{').ok_or_else(|| {
        AppError::data_format(MAP_DATA_KEY, "no object literal follows the key")
    })?;
    let literal = &rest[open..];

    let end = balanced_object_end(literal).ok_or_else(|| {
        AppError::data_format(MAP_DATA_KEY, "unterminated object literal")
    })?;
    Ok(&literal[..=end])
}

/// Byte offset of the close brace matching the opening brace at index 0.
///
/// Braces inside string literals (including escaped quotes) do not count.
fn balanced_object_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn washington() -> StateEntry {
        StateEntry {
            abbreviation: "WA".to_string(),
            name: "Washington".to_string(),
            price: "3.50".to_string(),
            detail_url: "http://x/wa".to_string(),
        }
    }

    fn district() -> StateEntry {
        StateEntry {
            abbreviation: "DC".to_string(),
            name: "D.C.".to_string(),
            price: "3.40".to_string(),
            detail_url: "http://x/dc".to_string(),
        }
    }

    #[test]
    fn federal_district_is_never_a_target() {
        let entries = vec![washington(), district()];
        let targets = detail_targets(&entries);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].abbreviation, "WA");
    }

    #[test]
    fn finds_map_data_script_src() {
        let html = r#"<html><body>
            <script src="/js/jquery.min.js"></script>
            <script src="https://cdn.example.com/premiumhtml5map_js_data/map42.js"></script>
        </body></html>"#;
        let src = find_map_data_src(html).unwrap();
        assert_eq!(src, "https://cdn.example.com/premiumhtml5map_js_data/map42.js");
    }

    #[test]
    fn missing_map_script_is_a_page_structure_error() {
        let html = r#"<html><body><script src="/js/other.js"></script></body></html>"#;
        let err = find_map_data_src(html).unwrap_err();
        assert!(matches!(err, AppError::PageStructure { .. }));
    }

    #[test]
    fn extracts_counties_from_map_data_line() {
        let script = concat!(
            "var map_cfg = {\n",
            r#"map_data: {"st1": {"name": "King", "comment": "Regular: $3.55"}, "#,
            r#""st2": {"name": "Pierce", "comment": "Regular: $3.45"}}, groups: {"g": 1},"#,
            "\nmore: true\n};"
        );
        let counties = extract_counties(&washington(), script).unwrap();
        assert_eq!(counties.len(), 2);
        assert_eq!(counties[0].state_abbreviation, "WA");
        assert_eq!(counties[0].state_name, "Washington");
        assert_eq!(counties[0].county_name, "King");
        assert_eq!(counties[0].price_comment, "Regular: $3.55");
    }

    #[test]
    fn braces_inside_strings_do_not_close_the_literal() {
        let script = r#"map_data: {"k": {"name": "Odd {brace}", "comment": "a\"b"}}, groups: {}"#;
        let counties = extract_counties(&washington(), script).unwrap();
        assert_eq!(counties.len(), 1);
        assert_eq!(counties[0].county_name, "Odd {brace}");
        assert_eq!(counties[0].price_comment, "a\"b");
    }

    #[test]
    fn missing_map_data_line_is_a_page_structure_error() {
        let err = extract_counties(&washington(), "var x = 1;\nvar y = 2;").unwrap_err();
        assert!(matches!(err, AppError::PageStructure { .. }));
    }

    #[test]
    fn unterminated_literal_is_a_data_format_error() {
        let err = extract_counties(&washington(), r#"map_data: {"k": {"name": "A""#).unwrap_err();
        assert!(matches!(err, AppError::DataFormat { .. }));
    }

    #[test]
    fn invalid_json_literal_is_a_data_format_error() {
        let err =
            extract_counties(&washington(), "map_data: {not json}, groups: {}").unwrap_err();
        assert!(matches!(err, AppError::DataFormat { .. }));
    }

    #[test]
    fn key_without_object_is_a_data_format_error() {
        let err = extract_counties(&washington(), "map_data: buildData(), groups").unwrap_err();
        assert!(matches!(err, AppError::DataFormat { .. }));
    }
}
