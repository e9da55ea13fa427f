// src/error.rs

//! Unified error handling for the gazette scanner.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for scanner operations.
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

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Regex compilation failed
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Retrieval of a single document failed (network, status, timeout)
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Retrieved payload is not in the expected format
    #[error("Format error: {0}")]
    Format(String),

    /// PDF text extraction failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Date precedes the bulletin numbering anchor
    #[error("Date {date} precedes the bulletin anchor {anchor}")]
    CalendarRange { date: NaiveDate, anchor: NaiveDate },

    /// Mail delivery failed
    #[error("Delivery error: {0}")]
    Delivery(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error for a URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a format error.
    pub fn format(message: impl fmt::Display) -> Self {
        Self::Format(message.to_string())
    }

    /// Create an extraction error.
    pub fn extraction(message: impl fmt::Display) -> Self {
        Self::Extraction(message.to_string())
    }

    /// Create a delivery error.
    pub fn delivery(message: impl fmt::Display) -> Self {
        Self::Delivery(message.to_string())
    }

    /// Whether this error only invalidates a single retrieval attempt.
    ///
    /// Fetchers swallow these and move on to the next candidate.
    pub fn is_attempt_local(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::Http(_) | Self::Format(_) | Self::Extraction(_) | Self::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_local_errors() {
        assert!(AppError::fetch("https://x", "timeout").is_attempt_local());
        assert!(AppError::format("not a PDF").is_attempt_local());
        assert!(!AppError::config("bad").is_attempt_local());
    }

    #[test]
    fn calendar_range_message_names_both_dates() {
        let err = AppError::CalendarRange {
            date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            anchor: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Date 2024-12-31 precedes the bulletin anchor 2025-01-02"
        );
    }
}
