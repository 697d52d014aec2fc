use serde::{Deserialize, Serialize};
use synapse_core::{Colour, ExerciseKind};
use thiserror::Error;

use crate::adapt::{LevelBounds, Thresholds};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{exercise}: no difficulty levels configured")]
    NoLevels { exercise: ExerciseKind },

    #[error("{exercise}: level range {min}..={max} is empty or starts below 1")]
    LevelRange {
        exercise: ExerciseKind,
        min: u32,
        max: u32,
    },

    #[error("{exercise}: level {level} must run at least one trial")]
    NoTrials { exercise: ExerciseKind, level: u32 },

    #[error("{exercise}: level {level} has a zero time limit")]
    ZeroTimeLimit { exercise: ExerciseKind, level: u32 },

    #[error("{exercise}: grid size {size} must be between 1 and 15")]
    GridSize { exercise: ExerciseKind, size: u8 },

    #[error("{exercise}: level {level} palette of {colours} colours must hold 2..={max}")]
    Palette {
        exercise: ExerciseKind,
        level: u32,
        colours: usize,
        max: usize,
    },

    #[error("{exercise}: level {level} switch probability {value} is outside [0, 1]")]
    Probability {
        exercise: ExerciseKind,
        level: u32,
        value: f64,
    },

    #[error("{exercise}: {what} alphabet is empty")]
    EmptyAlphabet {
        exercise: ExerciseKind,
        what: &'static str,
    },

    #[error("{exercise}: thresholds are inconsistent (advance {advance}, retreat {retreat})")]
    Thresholds {
        exercise: ExerciseKind,
        advance: f64,
        retreat: f64,
    },
}

/// Hysteresis thresholds for one exercise.
///
/// `speed_ratio` gates advancement on the average response time staying
/// at or under that fraction of the level's time limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptPolicy {
    pub advance_accuracy: f64,
    pub retreat_accuracy: f64,
    #[serde(default)]
    pub speed_ratio: Option<f64>,
}

impl AdaptPolicy {
    pub fn thresholds(&self, time_limit_ms: u64) -> Thresholds {
        Thresholds {
            advance_accuracy: self.advance_accuracy,
            retreat_accuracy: self.retreat_accuracy,
            max_average_ms: self.speed_ratio.map(|r| time_limit_ms as f64 * r),
        }
    }

    fn validate(&self, exercise: ExerciseKind) -> Result<(), ConfigError> {
        let speed_ok = self.speed_ratio.is_none_or(|r| r > 0.0);
        if self.retreat_accuracy > self.advance_accuracy
            || !(0.0..=100.0).contains(&self.advance_accuracy)
            || !speed_ok
        {
            return Err(ConfigError::Thresholds {
                exercise,
                advance: self.advance_accuracy,
                retreat: self.retreat_accuracy,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DualNBackConfig {
    pub grid_size: u8,
    pub total_trials: usize,
    pub trial_ms: u64,
    pub letters: Vec<char>,
    pub min_level: u32,
    pub max_level: u32,
    pub policy: AdaptPolicy,
}

impl Default for DualNBackConfig {
    fn default() -> Self {
        Self {
            grid_size: 3,
            total_trials: 18,
            trial_ms: 2600,
            letters: vec!['C', 'H', 'K', 'L', 'Q', 'R', 'S', 'T'],
            min_level: 1,
            max_level: 4,
            policy: AdaptPolicy {
                advance_accuracy: 80.0,
                retreat_accuracy: 55.0,
                speed_ratio: None,
            },
        }
    }
}

impl DualNBackConfig {
    pub fn bounds(&self) -> LevelBounds {
        LevelBounds::new(self.min_level, self.max_level)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let exercise = ExerciseKind::DualNBack;
        if self.min_level == 0 || self.min_level > self.max_level {
            return Err(ConfigError::LevelRange {
                exercise,
                min: self.min_level,
                max: self.max_level,
            });
        }
        if self.total_trials == 0 {
            return Err(ConfigError::NoTrials {
                exercise,
                level: self.min_level,
            });
        }
        if self.trial_ms == 0 {
            return Err(ConfigError::ZeroTimeLimit {
                exercise,
                level: self.min_level,
            });
        }
        if !(1..=15).contains(&self.grid_size) {
            return Err(ConfigError::GridSize {
                exercise,
                size: self.grid_size,
            });
        }
        if self.letters.is_empty() {
            return Err(ConfigError::EmptyAlphabet {
                exercise,
                what: "letter",
            });
        }
        self.policy.validate(exercise)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StroopLevel {
    pub colours: usize,
    pub prompts: usize,
    pub limit_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StroopConfig {
    pub levels: Vec<StroopLevel>,
    pub policy: AdaptPolicy,
}

impl Default for StroopConfig {
    fn default() -> Self {
        let level = |colours, prompts, limit_ms| StroopLevel {
            colours,
            prompts,
            limit_ms,
        };
        Self {
            levels: vec![
                level(4, 10, 4500),
                level(5, 12, 3800),
                level(6, 14, 3200),
                level(6, 16, 2600),
            ],
            policy: AdaptPolicy {
                advance_accuracy: 85.0,
                retreat_accuracy: 70.0,
                speed_ratio: Some(0.65),
            },
        }
    }
}

impl StroopConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let exercise = ExerciseKind::StroopFocus;
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels { exercise });
        }
        for (level, settings) in (1u32..).zip(&self.levels) {
            if !(2..=Colour::POOL.len()).contains(&settings.colours) {
                return Err(ConfigError::Palette {
                    exercise,
                    level,
                    colours: settings.colours,
                    max: Colour::POOL.len(),
                });
            }
            if settings.prompts == 0 {
                return Err(ConfigError::NoTrials { exercise, level });
            }
            if settings.limit_ms == 0 {
                return Err(ConfigError::ZeroTimeLimit { exercise, level });
            }
        }
        self.policy.validate(exercise)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchLevel {
    pub prompts: usize,
    pub limit_ms: u64,
    pub switch_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskSwitchConfig {
    pub levels: Vec<SwitchLevel>,
    pub letters: Vec<char>,
    pub numbers: Vec<u8>,
    pub policy: AdaptPolicy,
}

impl Default for TaskSwitchConfig {
    fn default() -> Self {
        let level = |prompts, limit_ms, switch_probability| SwitchLevel {
            prompts,
            limit_ms,
            switch_probability,
        };
        Self {
            levels: vec![
                level(12, 4200, 0.45),
                level(16, 3500, 0.55),
                level(20, 3000, 0.65),
                level(24, 2600, 0.75),
            ],
            letters: "AEIOUBCDFGHLMNRST".chars().collect(),
            numbers: (1..=9).collect(),
            policy: AdaptPolicy {
                advance_accuracy: 85.0,
                retreat_accuracy: 70.0,
                speed_ratio: Some(0.70),
            },
        }
    }
}

impl TaskSwitchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let exercise = ExerciseKind::TaskSwitch;
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels { exercise });
        }
        for (level, settings) in (1u32..).zip(&self.levels) {
            if settings.prompts == 0 {
                return Err(ConfigError::NoTrials { exercise, level });
            }
            if settings.limit_ms == 0 {
                return Err(ConfigError::ZeroTimeLimit { exercise, level });
            }
            if !(0.0..=1.0).contains(&settings.switch_probability) {
                return Err(ConfigError::Probability {
                    exercise,
                    level,
                    value: settings.switch_probability,
                });
            }
        }
        if self.letters.is_empty() {
            return Err(ConfigError::EmptyAlphabet {
                exercise,
                what: "letter",
            });
        }
        if self.numbers.is_empty() {
            return Err(ConfigError::EmptyAlphabet {
                exercise,
                what: "number",
            });
        }
        self.policy.validate(exercise)
    }
}

/// Configuration for every exercise, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynapseConfig {
    pub dual_n_back: DualNBackConfig,
    pub stroop: StroopConfig,
    pub task_switch: TaskSwitchConfig,
}

impl SynapseConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dual_n_back.validate()?;
        self.stroop.validate()?;
        self.task_switch.validate()
    }
}
