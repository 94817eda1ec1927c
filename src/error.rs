use thiserror::Error;

/// Errors raised when validating a [`crate::SimConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Configuration field `{field}` must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("Initial exploration sigma {sigma} is below its floor {sigma_min}")]
    SigmaBelowFloor { sigma: f64, sigma_min: f64 },

    #[error("Exploration decay must lie in (0, 1] (got {0})")]
    DecayOutOfRange(f64),

    #[error("Reward baseline decay must lie in [0, 1) (got {0})")]
    BaselineDecayOutOfRange(f64),

    #[error("World {width}x{height} leaves no free space inside padding {padding}")]
    WorldTooSmall {
        width: f64,
        height: f64,
        padding: f64,
    },

    #[error("Trail capacity must be at least 1")]
    ZeroTrailCapacity,

    #[error("Configuration field `{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("Bump damping must lie in [0, 1] (got {0})")]
    DampingOutOfRange(f64),
}

/// Errors returned by control-surface operations on a [`crate::Simulation`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Agent index {index} out of range (pool has {len} agents)")]
    AgentOutOfRange { index: usize, len: usize },

    #[error("Cannot perform operation: agent pool is empty")]
    EmptyPool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_display() {
        let e = SimError::AgentOutOfRange { index: 7, len: 3 };
        assert_eq!(
            e.to_string(),
            "Agent index 7 out of range (pool has 3 agents)"
        );
    }

    #[test]
    fn config_error_converts() {
        let e: SimError = ConfigError::ZeroTrailCapacity.into();
        assert_eq!(
            e.to_string(),
            "Invalid configuration: Trail capacity must be at least 1"
        );
    }

    #[test]
    fn non_positive_display() {
        let e = ConfigError::NonPositive {
            field: "wheel_base",
            value: 0.0,
        };
        assert!(e.to_string().contains("wheel_base"));
    }
}
