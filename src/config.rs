//! Run configuration shared by the TUI and headless mode

use crate::catalog::{check_size, Algorithm};
use crate::runtime::errors::{EngineError, InvalidInput};
use crate::runtime::history::History;

pub const DEFAULT_SPEED_MS: u64 = 150;
pub const MAX_SPEED_MS: u64 = 5_000;

/// Step used by the TUI's `+`/`-` keys
pub const SPEED_STEP_MS: u64 = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Delay after each checkpoint; 0 runs without pausing
    pub speed_ms: u64,
    /// Input size; `None` picks each algorithm's default
    pub size: Option<usize>,
    /// Seed for reproducible input
    pub seed: Option<u64>,
    /// Snapshot history budget in bytes
    pub history_limit: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            speed_ms: DEFAULT_SPEED_MS,
            size: None,
            seed: None,
            history_limit: History::DEFAULT_LIMIT,
        }
    }
}

impl RunConfig {
    pub fn size_for(&self, algorithm: Algorithm) -> usize {
        self.size.unwrap_or_else(|| algorithm.default_size())
    }

    pub fn validate(&self, algorithm: Algorithm) -> Result<(), EngineError> {
        if self.speed_ms > MAX_SPEED_MS {
            return Err(InvalidInput::InvalidSize {
                what: "speed in ms",
                value: usize::try_from(self.speed_ms).unwrap_or(usize::MAX),
                min: 0,
                max: MAX_SPEED_MS as usize,
            }
            .into());
        }
        if self.history_limit == 0 {
            return Err(InvalidInput::InvalidSize {
                what: "history limit",
                value: 0,
                min: 1,
                max: usize::MAX,
            }
            .into());
        }
        check_size(algorithm, self.size_for(algorithm))
    }

    pub fn faster(&mut self) {
        self.speed_ms = self.speed_ms.saturating_sub(SPEED_STEP_MS);
    }

    pub fn slower(&mut self) {
        self.speed_ms = (self.speed_ms + SPEED_STEP_MS).min(MAX_SPEED_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_for_every_algorithm() {
        let config = RunConfig::default();
        for algorithm in Algorithm::ALL {
            assert!(config.validate(algorithm).is_ok());
        }
    }

    #[test]
    fn oversized_input_is_rejected() {
        let config = RunConfig {
            size: Some(40),
            ..RunConfig::default()
        };
        assert!(config.validate(Algorithm::QuickSort).is_ok());
        assert!(config.validate(Algorithm::ListReverse).is_err());
        // sudoku has a fixed size
        assert!(config.validate(Algorithm::Sudoku).is_ok());
    }

    #[test]
    fn speed_stays_in_bounds() {
        let mut config = RunConfig {
            speed_ms: 10,
            ..RunConfig::default()
        };
        config.faster();
        assert_eq!(config.speed_ms, 0);
        config.speed_ms = MAX_SPEED_MS;
        config.slower();
        assert_eq!(config.speed_ms, MAX_SPEED_MS);
    }
}
