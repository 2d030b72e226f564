use thiserror::Error;

/// Record-level normalization failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// A field with no safe default is absent or blank.
    #[error("missing required field `{field}` in record {record}")]
    MissingRequiredField { field: &'static str, record: String },
}

impl NormalizeError {
    pub fn field(&self) -> &'static str {
        match self {
            NormalizeError::MissingRequiredField { field, .. } => field,
        }
    }
}

/// Booking quote failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("property {0} is not available for booking")]
    Unavailable(String),

    #[error("stay must be at least one night")]
    EmptyStay,

    #[error("{requested} guests requested, property sleeps {capacity}")]
    TooManyGuests { requested: u32, capacity: u32 },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing config field: {0}")]
    MissingField(&'static str),

    #[error("environment variable {0} is not set")]
    MissingEnv(String),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
