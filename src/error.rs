//! Configuration errors

/// Rejected configuration. Returned before any strip state is committed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no segment templates configured")]
    NoTemplates,

    #[error("color palette is empty")]
    EmptyPalette,

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("segment template '{template}' has invalid extent {extent}")]
    InvalidExtent { template: String, extent: f32 },

    #[error("initial segment count {initial} exceeds max live segments {max}")]
    InvalidSegmentCounts { initial: usize, max: usize },

    #[error("strip origin {origin} leaves no room for segments to advance")]
    InvalidOrigin { origin: f32 },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
