use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Frame rate assumed when the input carries no `framerate` header.
pub const DEFAULT_FRAME_RATE: u32 = 25;

/// Maximum heading change per second of simulated time, in degrees.
pub const TURN_RATE_LIMIT_DEG_PER_S: f64 = 90.0;

/// Mode label attached to every sample unless the caller overrides it.
pub const DEFAULT_MODE: &str = "LF#0";

/// Shared configuration for each processing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub frame_rate: u32,
    pub default_mode: String,
    pub turn_rate_limit_deg_per_s: f64,
}

impl StageConfig {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_rate,
            default_mode: DEFAULT_MODE.to_string(),
            turn_rate_limit_deg_per_s: TURN_RATE_LIMIT_DEG_PER_S,
        }
    }

    /// Seconds between consecutive frames.
    pub fn time_step(&self) -> StageResult<f64> {
        if self.frame_rate == 0 {
            return Err(StageError::MalformedInput(
                "frame rate must be a positive integer".into(),
            ));
        }
        Ok(1.0 / f64::from(self.frame_rate))
    }

    /// Largest heading change allowed between two consecutive samples.
    pub fn max_heading_change(&self) -> StageResult<f64> {
        let rate = self.turn_rate_limit_deg_per_s;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(StageError::MalformedInput(format!(
                "turn rate limit must be a positive number of degrees, got {rate}"
            )));
        }
        Ok(rate * self.time_step()?)
    }
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("schema assembly failed: {0}")]
    SchemaAssembly(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing a step of the conversion pipeline.
pub trait ProcessingStage {
    type Input;
    type Output;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()>;
    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output>;
    fn cleanup(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_step_is_reciprocal_of_frame_rate() {
        let config = StageConfig::new(25);
        assert!((config.time_step().unwrap() - 0.04).abs() < 1e-12);
        assert!((config.max_heading_change().unwrap() - 3.6).abs() < 1e-9);
    }

    #[test]
    fn non_positive_turn_rate_is_rejected() {
        let mut config = StageConfig::new(25);
        config.turn_rate_limit_deg_per_s = 0.0;
        assert!(config.max_heading_change().is_err());
    }

    #[test]
    fn zero_frame_rate_is_malformed() {
        let config = StageConfig::new(0);
        assert!(matches!(
            config.time_step(),
            Err(StageError::MalformedInput(_))
        ));
    }
}
