//! Difficulty adaptation between rounds.

use synapse_core::SessionResult;

/// Inclusive level range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBounds {
    pub min: u32,
    pub max: u32,
}

impl LevelBounds {
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn clamp(&self, level: u32) -> u32 {
        level.clamp(self.min, self.max)
    }

    pub fn contains(&self, level: u32) -> bool {
        (self.min..=self.max).contains(&level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub advance_accuracy: f64,
    pub retreat_accuracy: f64,
    /// Speed gate on advancement; `None` when the exercise is not speed-gated.
    pub max_average_ms: Option<f64>,
}

/// Steps the level by at most one, never leaving `bounds`.
pub fn next_level(
    result: &SessionResult,
    current: u32,
    bounds: LevelBounds,
    thresholds: &Thresholds,
) -> u32 {
    let current = bounds.clamp(current);
    let fast_enough = thresholds
        .max_average_ms
        .is_none_or(|limit| result.average_response_ms <= limit);

    if result.accuracy >= thresholds.advance_accuracy && fast_enough && current < bounds.max {
        current + 1
    } else if result.accuracy < thresholds.retreat_accuracy && current > bounds.min {
        current - 1
    } else {
        current
    }
}
