//! Exercise rulesets.
//!
//! An [`Exercise`] bundles everything exercise-specific: stimulus generation,
//! response evaluation, per-level settings and difficulty thresholds. The
//! round controller is generic over this trait and treats stimuli and
//! responses as opaque.

pub mod dual_n_back;
pub mod stroop;
pub mod task_switch;

pub use dual_n_back::{DualNBack, MatchMarks};
pub use stroop::StroopFocus;
pub use task_switch::TaskSwitch;

use rand::Rng;
use synapse_core::{DimensionScore, ExerciseKind, SessionResult, Stimulus, Trial};

use crate::adapt::{next_level, LevelBounds, Thresholds};

/// Parameters resolved for one round at a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSettings {
    pub level: u32,
    pub total_trials: usize,
    pub time_limit_ms: u64,
}

pub trait Exercise {
    type Stimulus: Stimulus;
    /// `Default` is the unmarked response a timeout submits.
    type Response: Clone + Default + std::fmt::Debug;

    fn kind(&self) -> ExerciseKind;

    fn bounds(&self) -> LevelBounds;

    /// Settings for `level`, which the caller has already clamped.
    fn settings(&self, level: u32) -> RoundSettings;

    /// Judged dimensions per trial.
    fn dimensions(&self) -> usize;

    /// Produces the stimulus for trial `history.len()`. `history` holds every
    /// trial generated so far this round, in order.
    fn generate<R: Rng + ?Sized>(
        &self,
        settings: &RoundSettings,
        history: &[Trial<Self::Stimulus>],
        rng: &mut R,
    ) -> Self::Stimulus;

    /// Scores `response` for `trial`. `history` is indexed by `Trial::index`.
    fn evaluate(
        &self,
        settings: &RoundSettings,
        history: &[Trial<Self::Stimulus>],
        trial: &Trial<Self::Stimulus>,
        response: &Self::Response,
    ) -> Vec<DimensionScore>;

    /// The response that scores every dimension correct.
    fn expected_response(
        &self,
        settings: &RoundSettings,
        history: &[Trial<Self::Stimulus>],
        trial: &Trial<Self::Stimulus>,
    ) -> Self::Response;

    /// A response that misses at least one dimension of `expected`.
    fn perturb<R: Rng + ?Sized>(
        &self,
        trial: &Trial<Self::Stimulus>,
        expected: &Self::Response,
        rng: &mut R,
    ) -> Self::Response;

    fn thresholds(&self, settings: &RoundSettings) -> Thresholds;

    fn adapt(&self, result: &SessionResult, settings: &RoundSettings) -> u32 {
        next_level(
            result,
            settings.level,
            self.bounds(),
            &self.thresholds(settings),
        )
    }

    /// Short label and one-line summary for the session log.
    fn describe(&self, result: &SessionResult) -> (String, String);

    /// Participant-facing note about a level change, if there was one.
    fn level_note(&self, from: u32, to: u32) -> Option<String>;
}

pub(crate) fn score(dimension: synapse_core::Dimension, correct: bool) -> DimensionScore {
    DimensionScore { dimension, correct }
}
