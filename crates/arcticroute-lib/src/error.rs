use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the arcticroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Expected routing outcomes (unreachable endpoints, disconnected graphs) are
/// reported through [`crate::RouteStatus`] instead of this type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a latitude/longitude pair falls outside the valid ranges.
    #[error("invalid coordinate ({latitude}, {longitude}); expected latitude in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Raised when a bounding region has its minimum above its maximum.
    #[error("invalid bounding region: {message}")]
    InvalidRegion { message: String },

    /// Raised when a seed file describes something the router cannot use.
    #[error("invalid router configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when a node id appears more than once in a seed file.
    #[error("duplicate navigation node id: {id}")]
    DuplicateNode { id: String },

    /// Raised when a bounded search expands more nodes than allowed.
    #[error("route search from {start} to {goal} aborted after expanding {expanded} nodes")]
    SearchBudgetExhausted {
        start: String,
        goal: String,
        expanded: usize,
    },

    /// Raised when a coordinate string cannot be parsed.
    #[error("could not parse coordinate '{input}'; expected LAT,LON")]
    CoordinateParse { input: String },

    /// Raised when reading a seed file fails.
    #[error("failed to read router configuration from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
