//! Error taxonomy for the report core.
//!
//! Input and ephemeris failures surface synchronously to the caller.
//! Configuration failures abort startup. A [`LookupMiss`] is not fatal: it is
//! carried inside the report as an explicit gap.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed birth input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("Invalid time '{value}': expected HH:MM or HH:MM:SS")]
    InvalidTime { value: String },
    #[error("Invalid location: latitude {latitude} must be in [-90, 90] and longitude {longitude} in [-180, 180]")]
    InvalidLocation { latitude: f64, longitude: f64 },
    #[error("Invalid UTC offset of {seconds} seconds")]
    InvalidOffset { seconds: i32 },
    #[error("Local time {local} is ambiguous (between {earliest} and {latest})")]
    AmbiguousLocalTime {
        local: NaiveDateTime,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    },
    #[error("Local time {local} does not exist in the given time zone")]
    NonexistentLocalTime { local: NaiveDateTime },
    #[error("Invalid age {age}: must be a non-negative whole number of years")]
    InvalidAge { age: String },
}

/// The ephemeris oracle could not resolve the request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Instant {instant} is outside the ephemeris range {valid_from} .. {valid_to}")]
    OutOfRange {
        instant: DateTime<Utc>,
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
    },
    #[error("Invalid location: latitude {latitude}, longitude {longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },
    #[error("Invalid house system: {system}. Valid systems: {valid:?}")]
    InvalidHouseSystem { system: String, valid: Vec<String> },
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Failed to calculate position for {body} at {instant}: {message}")]
    CalculationFailed {
        body: String,
        instant: DateTime<Utc>,
        message: String,
    },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
    #[error("Chart has no position for {body}")]
    MissingBody { body: String },
}

/// The interpretation corpus is unusable. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Required corpus file is missing: {path}")]
    MissingFile { path: String },
    #[error("Failed to read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} is missing {} required keys: {keys:?}", .keys.len())]
    MissingKeys { path: String, keys: Vec<String> },
    #[error("{path} has an unexpected shape: {message}")]
    UnexpectedShape { path: String, message: String },
}

/// A requested interpretation key has no text.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("No interpretation available for {key}")]
pub struct LookupMiss {
    pub key: String,
}

impl LookupMiss {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Anything that stops a single report from being produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}
