use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

/// Gap between consecutive positions in a lane
pub const POSITION_STEP: i64 = 1000;

/// Highest position value ever assigned
pub const POSITION_CEILING: i64 = 1_000_000;

/// Maps a lane-relative index to the integer position persisted for it.
///
/// Positions grow by `step` per index until they reach `ceiling`; every
/// index past that point maps to `ceiling`, so lanes longer than
/// `ceiling / step` end with several tasks sharing the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionScheme {
    pub step: i64,
    pub ceiling: i64,
}

impl PositionScheme {
    pub const fn new(step: i64, ceiling: i64) -> Self {
        Self { step, ceiling }
    }

    /// Position for the task at `index` (zero-based) within its lane
    pub fn position_for(&self, index: usize) -> i64 {
        let slot = i64::try_from(index).unwrap_or(i64::MAX).saturating_add(1);
        slot.saturating_mul(self.step).min(self.ceiling)
    }

    /// Number of indices that receive a distinct position
    pub fn distinct_slots(&self) -> usize {
        if self.step <= 0 {
            return 0;
        }
        usize::try_from(self.ceiling / self.step).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.step <= 0 {
            return Err(BoardError::ConfigError(format!(
                "position step must be positive, got {}",
                self.step
            )));
        }
        if self.ceiling < self.step {
            return Err(BoardError::ConfigError(format!(
                "position ceiling {} is below step {}",
                self.ceiling, self.step
            )));
        }
        Ok(())
    }
}

impl Default for PositionScheme {
    fn default() -> Self {
        Self::new(POSITION_STEP, POSITION_CEILING)
    }
}

/// Position for `index` under the default scheme
pub fn position_for(index: usize) -> i64 {
    PositionScheme::default().position_for(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_for_first_slots() {
        assert_eq!(position_for(0), 1000);
        assert_eq!(position_for(1), 2000);
        assert_eq!(position_for(41), 42_000);
    }

    #[test]
    fn test_position_for_caps_at_ceiling() {
        assert_eq!(position_for(998), 999_000);
        assert_eq!(position_for(999), 1_000_000);
        assert_eq!(position_for(1000), 1_000_000);
        assert_eq!(position_for(usize::MAX), 1_000_000);
    }

    #[test]
    fn test_position_for_non_decreasing() {
        let mut last = 0;
        for index in 0..1_500 {
            let position = position_for(index);
            assert!(position >= last);
            assert!(position <= POSITION_CEILING);
            last = position;
        }
    }

    #[test]
    fn test_distinct_slots() {
        assert_eq!(PositionScheme::default().distinct_slots(), 1000);
        assert_eq!(PositionScheme::new(10, 55).distinct_slots(), 5);
    }

    #[test]
    fn test_custom_scheme() {
        let scheme = PositionScheme::new(10, 30);
        assert_eq!(scheme.position_for(0), 10);
        assert_eq!(scheme.position_for(2), 30);
        assert_eq!(scheme.position_for(7), 30);
    }

    #[test]
    fn test_validate() {
        assert!(PositionScheme::default().validate().is_ok());
        assert!(PositionScheme::new(0, 100).validate().is_err());
        assert!(PositionScheme::new(-5, 100).validate().is_err());
        assert!(PositionScheme::new(100, 50).validate().is_err());
    }
}
