//! Error types for the almanac calendar core.

use thiserror::Error;

/// Main error type for almanac operations.
#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing required value: {0}")]
    MissingValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Range and consistency violations raised by the value model.
///
/// A failed construction or mutation never leaves a partially updated value
/// behind: the receiver is unchanged when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Hour out of range: {0} (expected 0-23)")]
    HourOutOfRange(i64),

    #[error("Minute out of range: {0} (expected 0-59)")]
    MinuteOutOfRange(i64),

    #[error("Duration must not be negative: {0} minutes")]
    NegativeDuration(i64),

    #[error("End {end} precedes start {start}")]
    EndBeforeStart { start: String, end: String },

    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Unknown time zone: {0}")]
    UnknownZone(String),

    #[error("Date arithmetic out of range")]
    DateOutOfRange,
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for almanac operations.
pub type Result<T> = std::result::Result<T, AlmanacError>;
