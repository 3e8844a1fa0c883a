//! Error types for configuration and flock operations.

use std::error::Error;
use std::fmt;

/// A configuration value that cannot be simulated.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `boids_per_set` was zero.
    ZeroPopulation,
    /// An odd set count was given while the split policy rejects it.
    OddSetCount { count: usize },
    /// A numeric field was NaN or infinite.
    NonFinite { field: &'static str },
    /// A numeric field must be strictly positive.
    NonPositive { field: &'static str },
    /// A box has `min > max` on some axis or non-finite corners.
    InvalidBounds { field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPopulation => write!(f, "boids_per_set must be at least 1"),
            ConfigError::OddSetCount { count } => write!(
                f,
                "set count ({count}) must be even for the two-phase scheduler"
            ),
            ConfigError::NonFinite { field } => write!(f, "{field} must be finite"),
            ConfigError::NonPositive { field } => write!(f, "{field} must be positive"),
            ConfigError::InvalidBounds { field } => {
                write!(f, "{field} must have finite corners with min <= max")
            }
        }
    }
}

impl Error for ConfigError {}

/// Failure of a flock operation addressed by set/boid index.
#[derive(Debug, Clone, PartialEq)]
pub enum FlockError {
    Config(ConfigError),
    SetIndexOutOfRange { set: usize, count: usize },
    BoidIndexOutOfRange {
        set: usize,
        boid: usize,
        capacity: usize,
    },
    /// Destination set has no inactive slot to receive a boid.
    NoFreeSlot { set: usize },
    /// Only live boids can be transferred.
    InactiveBoid { set: usize, boid: usize },
    /// Transfer source and destination are the same set.
    SameSet { set: usize },
}

impl fmt::Display for FlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlockError::Config(e) => write!(f, "{}", e),
            FlockError::SetIndexOutOfRange { set, count } => {
                write!(f, "set index {set} out of range ({count} sets)")
            }
            FlockError::BoidIndexOutOfRange {
                set,
                boid,
                capacity,
            } => write!(
                f,
                "boid index {boid} out of range for set {set} (capacity {capacity})"
            ),
            FlockError::NoFreeSlot { set } => write!(f, "set {set} has no free slot"),
            FlockError::InactiveBoid { set, boid } => {
                write!(f, "boid {boid} in set {set} is not alive")
            }
            FlockError::SameSet { set } => {
                write!(f, "cannot transfer boids from set {set} into itself")
            }
        }
    }
}

impl From<ConfigError> for FlockError {
    fn from(err: ConfigError) -> Self {
        FlockError::Config(err)
    }
}

impl Error for FlockError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FlockError::Config(e) => Some(e),
            _ => None,
        }
    }
}
