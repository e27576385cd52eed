// src/models/mod.rs

//! Domain models for the scraper application.

mod config;
mod county;
mod state;

// Re-export all public types
pub use config::{Config, ScraperConfig, StorageConfig};
pub use county::CountyRecord;
pub use state::StateEntry;
