//! Service layer for the scraper application.
//!
//! This module contains the business logic for:
//! - National index extraction (`national`)
//! - Per-state county extraction (`counties`)

pub mod counties;
pub mod national;

pub use counties::{DetailOutcome, StateFailure};
