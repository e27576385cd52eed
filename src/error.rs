// src/error.rs

//! Unified error handling for the scraper application.

use std::fmt;

use thiserror::Error;

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV read/write failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required page element or text marker is absent
    #[error("Page structure error in {context}: {message}")]
    PageStructure { context: String, message: String },

    /// A located literal could not be parsed as expected
    #[error("Data format error in {context}: {message}")]
    DataFormat { context: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a page structure error with context.
    pub fn page_structure(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::PageStructure {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a data format error with context.
    pub fn data_format(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::DataFormat {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
