use rand::Rng;
use synapse_core::{
    Colour, ColourWord, Dimension, DimensionScore, ExerciseKind, SessionResult, Trial,
};

use super::{score, Exercise, RoundSettings};
use crate::adapt::{LevelBounds, Thresholds};
use crate::config::{ConfigError, StroopConfig, StroopLevel};

static POOL: [Colour; 6] = Colour::POOL;

/// Colour-word interference: name the ink, ignore the word.
#[derive(Debug, Clone, Default)]
pub struct StroopFocus {
    config: StroopConfig,
}

impl StroopFocus {
    pub fn new(config: StroopConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StroopConfig {
        &self.config
    }

    fn level(&self, level: u32) -> &StroopLevel {
        let index = (self.bounds().clamp(level) - 1) as usize;
        &self.config.levels[index]
    }

    /// Colours in play at `level`.
    pub fn palette(&self, level: u32) -> &'static [Colour] {
        &POOL[..self.level(level).colours]
    }
}

impl Exercise for StroopFocus {
    type Stimulus = ColourWord;
    type Response = Option<Colour>;

    fn kind(&self) -> ExerciseKind {
        ExerciseKind::StroopFocus
    }

    fn bounds(&self) -> LevelBounds {
        LevelBounds::new(1, self.config.levels.len() as u32)
    }

    fn settings(&self, level: u32) -> RoundSettings {
        let settings = self.level(level);
        RoundSettings {
            level,
            total_trials: settings.prompts,
            time_limit_ms: settings.limit_ms,
        }
    }

    fn dimensions(&self) -> usize {
        1
    }

    fn generate<R: Rng + ?Sized>(
        &self,
        settings: &RoundSettings,
        _history: &[Trial<ColourWord>],
        rng: &mut R,
    ) -> ColourWord {
        let palette = self.palette(settings.level);
        let word = palette[rng.random_range(0..palette.len())];
        let mut ink_index = rng.random_range(0..palette.len());
        if palette[ink_index] == word {
            ink_index = (ink_index + 1) % palette.len();
        }
        ColourWord {
            word,
            ink: palette[ink_index],
        }
    }

    fn evaluate(
        &self,
        _settings: &RoundSettings,
        _history: &[Trial<ColourWord>],
        trial: &Trial<ColourWord>,
        response: &Option<Colour>,
    ) -> Vec<DimensionScore> {
        vec![score(Dimension::Ink, *response == Some(trial.stimulus.ink))]
    }

    fn expected_response(
        &self,
        _settings: &RoundSettings,
        _history: &[Trial<ColourWord>],
        trial: &Trial<ColourWord>,
    ) -> Option<Colour> {
        Some(trial.stimulus.ink)
    }

    // Reading the word instead of naming the ink.
    fn perturb<R: Rng + ?Sized>(
        &self,
        trial: &Trial<ColourWord>,
        _expected: &Option<Colour>,
        _rng: &mut R,
    ) -> Option<Colour> {
        Some(trial.stimulus.word)
    }

    fn thresholds(&self, settings: &RoundSettings) -> Thresholds {
        self.config.policy.thresholds(settings.time_limit_ms)
    }

    fn describe(&self, result: &SessionResult) -> (String, String) {
        let average = result.average_label();
        (
            format!("{:.0}% accuracy • {average}", result.accuracy),
            format!(
                "Identified {} colour cues with {:.0}% accuracy ({average} average response, level {})",
                result.total_trials, result.accuracy, result.level
            ),
        )
    }

    fn level_note(&self, from: u32, to: u32) -> Option<String> {
        if to > from {
            Some(format!("Palette expanding to level {to} next time."))
        } else if to < from {
            Some(format!("Stepping back to level {to} to reinforce accuracy."))
        } else {
            None
        }
    }
}
