use rand::Rng;
use synapse_core::{
    Dimension, DimensionScore, ExerciseKind, RulePrompt, SessionResult, Side, SwitchRule, Trial,
};

use super::{score, Exercise, RoundSettings};
use crate::adapt::{LevelBounds, Thresholds};
use crate::config::{ConfigError, SwitchLevel, TaskSwitchConfig};

/// Rule switching between a vowel check and a parity check on a shared
/// letter/number prompt.
#[derive(Debug, Clone, Default)]
pub struct TaskSwitch {
    config: TaskSwitchConfig,
}

impl TaskSwitch {
    pub fn new(config: TaskSwitchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TaskSwitchConfig {
        &self.config
    }

    fn level(&self, level: u32) -> &SwitchLevel {
        let index = (self.bounds().clamp(level) - 1) as usize;
        &self.config.levels[index]
    }

    pub fn switch_probability(&self, level: u32) -> f64 {
        self.level(level).switch_probability
    }

    fn random_rule<R: Rng + ?Sized>(rng: &mut R) -> SwitchRule {
        if rng.random::<f64>() < 0.5 {
            SwitchRule::Letter
        } else {
            SwitchRule::Number
        }
    }
}

impl Exercise for TaskSwitch {
    type Stimulus = RulePrompt;
    type Response = Option<Side>;

    fn kind(&self) -> ExerciseKind {
        ExerciseKind::TaskSwitch
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
        history: &[Trial<RulePrompt>],
        rng: &mut R,
    ) -> RulePrompt {
        let rule = match history.last() {
            None => Self::random_rule(rng),
            Some(previous) => {
                if rng.random::<f64>() < self.switch_probability(settings.level) {
                    Self::random_rule(rng)
                } else {
                    previous.stimulus.rule
                }
            }
        };
        let letters = &self.config.letters;
        let numbers = &self.config.numbers;
        RulePrompt {
            rule,
            letter: letters[rng.random_range(0..letters.len())],
            number: numbers[rng.random_range(0..numbers.len())],
        }
    }

    fn evaluate(
        &self,
        _settings: &RoundSettings,
        _history: &[Trial<RulePrompt>],
        trial: &Trial<RulePrompt>,
        response: &Option<Side>,
    ) -> Vec<DimensionScore> {
        vec![score(
            Dimension::Rule,
            *response == Some(trial.stimulus.correct_side()),
        )]
    }

    fn expected_response(
        &self,
        _settings: &RoundSettings,
        _history: &[Trial<RulePrompt>],
        trial: &Trial<RulePrompt>,
    ) -> Option<Side> {
        Some(trial.stimulus.correct_side())
    }

    // Answering under the other rule is only wrong half the time, so flip
    // the side directly.
    fn perturb<R: Rng + ?Sized>(
        &self,
        trial: &Trial<RulePrompt>,
        _expected: &Option<Side>,
        _rng: &mut R,
    ) -> Option<Side> {
        Some(trial.stimulus.correct_side().opposite())
    }

    fn thresholds(&self, settings: &RoundSettings) -> Thresholds {
        self.config.policy.thresholds(settings.time_limit_ms)
    }

    fn describe(&self, result: &SessionResult) -> (String, String) {
        let average = result.average_label();
        (
            format!("{:.0}% accuracy • {average}", result.accuracy),
            format!(
                "Navigated {} task switches with {:.0}% accuracy ({average} average response, level {})",
                result.total_trials, result.accuracy, result.level
            ),
        )
    }

    fn level_note(&self, from: u32, to: u32) -> Option<String> {
        if to > from {
            Some(format!("Level {to} unlocked for the next circuit."))
        } else if to < from {
            Some(format!("Dropping to level {to} to rebuild accuracy."))
        } else {
            None
        }
    }
}
