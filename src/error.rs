//! Error types for configuration, placement and setup

use std::fmt;

/// An invariant violated by a configuration or an entity under construction
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Ball radius must be finite and strictly positive
    InvalidRadius(f32),
    /// A position or tuning value was NaN or infinite
    NonFinite(&'static str),
    /// Field or spawn region has no area
    EmptyRegion(&'static str),
    /// A tuning value that must not be negative was
    Negative(&'static str),
    /// A box dimension was non-finite or not strictly positive
    InvalidDimension { dimension: &'static str, value: f32 },
    /// Configured wall `index` has a bad dimension
    InvalidWall {
        index: usize,
        dimension: &'static str,
    },
    /// A probability outside [0, 1]
    InvalidChance(f32),
    /// Friction decrease rate must lie in (0, 1]
    InvalidFriction(f32),
    /// A count that must be non-zero was zero
    Zero(&'static str),
    /// Fixed layout table length differs from the target count
    LayoutMismatch { expected: usize, got: usize },
    /// Spawn region cannot fit the requested targets even on a grid
    TooManyTargets { requested: usize, capacity: usize },
    /// Layout table entry sits partly outside the field
    LayoutOutOfField { index: usize },
    /// Two layout table entries overlap
    LayoutOverlap { first: usize, second: usize },
    /// Layout table entry overlaps the control or docked active ball
    LayoutBlocksStart { index: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRadius(r) => write!(f, "Invalid ball radius: {}", r),
            ConfigError::NonFinite(what) => write!(f, "Non-finite value for {}", what),
            ConfigError::EmptyRegion(what) => write!(f, "Empty region: {}", what),
            ConfigError::Negative(what) => write!(f, "{} must not be negative", what),
            ConfigError::InvalidDimension { dimension, value } => {
                write!(f, "Invalid {}: {}", dimension, value)
            }
            ConfigError::InvalidWall { index, dimension } => {
                write!(f, "Invalid {} for wall {}", dimension, index)
            }
            ConfigError::InvalidChance(p) => write!(f, "Probability out of range: {}", p),
            ConfigError::InvalidFriction(rate) => {
                write!(f, "Friction decrease rate out of range: {}", rate)
            }
            ConfigError::Zero(what) => write!(f, "{} must be non-zero", what),
            ConfigError::LayoutMismatch { expected, got } => write!(
                f,
                "Layout table has {} positions, expected {}",
                got, expected
            ),
            ConfigError::TooManyTargets {
                requested,
                capacity,
            } => write!(
                f,
                "Spawn region fits {} targets, {} requested",
                capacity, requested
            ),
            ConfigError::LayoutOutOfField { index } => {
                write!(f, "Layout position {} lies outside the field", index)
            }
            ConfigError::LayoutOverlap { first, second } => {
                write!(f, "Layout positions {} and {} overlap", first, second)
            }
            ConfigError::LayoutBlocksStart { index } => write!(
                f,
                "Layout position {} overlaps the starting balls",
                index
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Random placement ran out of attempts before every ball found a free spot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementExhausted {
    pub placed: usize,
    pub requested: usize,
    pub attempts: u32,
}

impl fmt::Display for PlacementExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Placement exhausted after {} attempts ({}/{} placed)",
            self.attempts, self.placed, self.requested
        )
    }
}

impl std::error::Error for PlacementExhausted {}

/// Top-level error for building and driving a game
#[derive(Debug)]
pub enum SimError {
    Config(ConfigError),
    /// A render resource could not be created; fatal before the first tick
    Setup(String),
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "Config error: {}", e),
            SimError::Setup(what) => write!(f, "Setup failed: {}", what),
            SimError::Io(e) => write!(f, "I/O error: {}", e),
            SimError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(e) => Some(e),
            SimError::Setup(_) => None,
            SimError::Io(e) => Some(e),
            SimError::Parse(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: SimError = ConfigError::InvalidRadius(-1.0).into();
        assert!(matches!(err, SimError::Config(ConfigError::InvalidRadius(_))));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn test_placement_message() {
        let err = PlacementExhausted {
            placed: 3,
            requested: 5,
            attempts: 100,
        };
        assert_eq!(
            err.to_string(),
            "Placement exhausted after 100 attempts (3/5 placed)"
        );
    }
}
