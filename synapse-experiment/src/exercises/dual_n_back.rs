use rand::Rng;
use synapse_core::{Dimension, DimensionScore, ExerciseKind, GridLetter, SessionResult, Trial};

use super::{score, Exercise, RoundSettings};
use crate::adapt::{LevelBounds, Thresholds};
use crate::config::{ConfigError, DualNBackConfig};

/// Participant marks for one dual n-back trial. Unmarked means "new".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchMarks {
    pub position: bool,
    pub letter: bool,
}

/// Spatial + letter working-memory lookback. The level is the lookback
/// distance N.
#[derive(Debug, Clone, Default)]
pub struct DualNBack {
    config: DualNBackConfig,
}

impl DualNBack {
    pub fn new(config: DualNBackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DualNBackConfig {
        &self.config
    }

    fn reference<'a>(
        settings: &RoundSettings,
        history: &'a [Trial<GridLetter>],
        trial: &Trial<GridLetter>,
    ) -> Option<&'a Trial<GridLetter>> {
        trial
            .index
            .checked_sub(settings.level as usize)
            .and_then(|i| history.get(i))
    }
}

impl Exercise for DualNBack {
    type Stimulus = GridLetter;
    type Response = MatchMarks;

    fn kind(&self) -> ExerciseKind {
        ExerciseKind::DualNBack
    }

    fn bounds(&self) -> LevelBounds {
        self.config.bounds()
    }

    fn settings(&self, level: u32) -> RoundSettings {
        RoundSettings {
            level,
            total_trials: self.config.total_trials,
            time_limit_ms: self.config.trial_ms,
        }
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn generate<R: Rng + ?Sized>(
        &self,
        _settings: &RoundSettings,
        _history: &[Trial<GridLetter>],
        rng: &mut R,
    ) -> GridLetter {
        let cells = self.config.grid_size * self.config.grid_size;
        let letters = &self.config.letters;
        GridLetter {
            cell: rng.random_range(0..cells),
            letter: letters[rng.random_range(0..letters.len())],
        }
    }

    fn evaluate(
        &self,
        settings: &RoundSettings,
        history: &[Trial<GridLetter>],
        trial: &Trial<GridLetter>,
        response: &MatchMarks,
    ) -> Vec<DimensionScore> {
        let expected = self.expected_response(settings, history, trial);
        vec![
            score(Dimension::Position, expected.position == response.position),
            score(Dimension::Letter, expected.letter == response.letter),
        ]
    }

    fn expected_response(
        &self,
        settings: &RoundSettings,
        history: &[Trial<GridLetter>],
        trial: &Trial<GridLetter>,
    ) -> MatchMarks {
        match Self::reference(settings, history, trial) {
            Some(reference) => MatchMarks {
                position: reference.stimulus.cell == trial.stimulus.cell,
                letter: reference.stimulus.letter == trial.stimulus.letter,
            },
            None => MatchMarks::default(),
        }
    }

    fn perturb<R: Rng + ?Sized>(
        &self,
        _trial: &Trial<GridLetter>,
        expected: &MatchMarks,
        rng: &mut R,
    ) -> MatchMarks {
        let mut marks = *expected;
        if rng.random_bool(0.5) {
            marks.position = !marks.position;
        } else {
            marks.letter = !marks.letter;
        }
        marks
    }

    fn thresholds(&self, settings: &RoundSettings) -> Thresholds {
        self.config.policy.thresholds(settings.time_limit_ms)
    }

    fn describe(&self, result: &SessionResult) -> (String, String) {
        (
            format!("{:.0}% accuracy", result.accuracy),
            format!(
                "Tracked {} dual cues at {:.0}% accuracy (level {})",
                result.total_trials, result.accuracy, result.level
            ),
        )
    }

    fn level_note(&self, from: u32, to: u32) -> Option<String> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(format!("Advancing to {to}-back next round.")),
            std::cmp::Ordering::Less => Some(format!(
                "Stepping back to {to}-back to reinforce consistency."
            )),
            std::cmp::Ordering::Equal => None,
        }
    }
}
