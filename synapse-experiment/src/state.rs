use super::error::EngineError;
use super::exercises::{Exercise, RoundSettings};
use super::trial::{TrialCue, TrialTicket};
use rand::Rng;
use std::time::Duration;
use synapse_core::{ExerciseKind, Outcome, RoundPhase, SessionResult, Stimulus, Trial};
use synapse_timing::{Timer, TrialClock};

/// Result of a completed round plus the suggested next level.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub result: SessionResult,
    pub next_level: u32,
}

/// Events produced by the controller. Front ends render from these.
#[derive(Debug, Clone)]
pub enum RoundEvent<S> {
    TrialStarted(TrialCue<S>),
    TrialScored { trial: Trial<S>, outcome: Outcome },
    RoundComplete(RoundSummary),
}

#[derive(Debug)]
struct RoundState<S> {
    id: u64,
    settings: RoundSettings,
    trials: Vec<Trial<S>>,
    awaiting: Option<usize>,
    correct: usize,
    decisions: usize,
    timeouts: usize,
    response_ms_total: f64,
}

impl<S> RoundState<S> {
    fn new(id: u64, settings: RoundSettings) -> Self {
        Self {
            id,
            settings,
            trials: Vec::with_capacity(settings.total_trials),
            awaiting: None,
            correct: 0,
            decisions: 0,
            timeouts: 0,
            response_ms_total: 0.0,
        }
    }

    fn ticket(&self, trial: usize) -> TrialTicket {
        TrialTicket {
            round: self.id,
            trial,
        }
    }

    fn result(&self, exercise: ExerciseKind) -> SessionResult {
        let total = self.trials.len();
        let accuracy = if self.decisions == 0 {
            0.0
        } else {
            (self.correct as f64 / self.decisions as f64 * 100.0).round()
        };
        let average_response_ms = if total == 0 {
            0.0
        } else {
            self.response_ms_total / total as f64
        };
        SessionResult {
            exercise,
            accuracy,
            average_response_ms,
            level: self.settings.level,
            total_trials: total,
            decisions: self.decisions,
            correct_count: self.correct,
            timeout_count: self.timeouts,
        }
    }
}

/// Drives one exercise through rounds of timed trials.
///
/// Single-threaded and cooperative: nothing happens between calls. Callers
/// deliver responses with [`submit_response`](Self::submit_response) and tick
/// the clock with [`update`](Self::update); each call returns the events it
/// produced.
pub struct RoundController<E, T, R>
where
    E: Exercise,
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    exercise: E,
    clock: TrialClock<T, TrialTicket>,
    rng: R,
    phase: RoundPhase,
    round: Option<RoundState<E::Stimulus>>,
    rounds_started: u64,
    last_summary: Option<RoundSummary>,
}

type Events<E> = Vec<RoundEvent<<E as Exercise>::Stimulus>>;

impl<E, T, R> RoundController<E, T, R>
where
    E: Exercise,
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub fn new(exercise: E, timer: T, rng: R) -> Self {
        Self {
            exercise,
            clock: TrialClock::new(timer),
            rng,
            phase: RoundPhase::default(),
            round: None,
            rounds_started: 0,
            last_summary: None,
        }
    }

    /// Begins a round at `level` (clamped to the exercise bounds).
    /// Ignored while a round is awaiting a response.
    pub fn start(&mut self, level: u32) -> Result<Events<E>, EngineError> {
        if !self.phase.can_start() {
            tracing::warn!(phase = ?self.phase, "start ignored, a round is already running");
            return Ok(Vec::new());
        }

        let level_clamped = self.exercise.bounds().clamp(level);
        if level_clamped != level {
            tracing::debug!(requested = level, level = level_clamped, "difficulty clamped");
        }
        let settings = self.exercise.settings(level_clamped);

        self.clock.disarm();
        self.rounds_started += 1;
        self.round = Some(RoundState::new(self.rounds_started, settings));
        self.last_summary = None;
        tracing::info!(
            exercise = %self.exercise.kind(),
            level = level_clamped,
            trials = settings.total_trials,
            limit_ms = settings.time_limit_ms,
            "round started"
        );

        let mut events = Vec::new();
        self.begin_trial(&mut events)?;
        Ok(events)
    }

    /// Scores `response` against the trial awaiting one. Ignored outside the
    /// response window.
    pub fn submit_response(&mut self, response: E::Response) -> Result<Events<E>, EngineError> {
        if !self.phase.allows_input() {
            tracing::debug!(phase = ?self.phase, "response ignored outside the response window");
            return Ok(Vec::new());
        }

        // A deadline that already passed wins over a late response.
        if let Some(ticket) = self.clock.poll() {
            tracing::debug!(trial = ticket.trial, "response arrived after the deadline");
            return self.on_timeout(ticket);
        }

        let elapsed = self.clock.elapsed().unwrap_or_default();
        self.clock.disarm();
        self.score(response, false, elapsed.as_secs_f64() * 1000.0)
    }

    /// Scores the awaiting trial as unanswered. Tickets that do not name the
    /// awaiting trial of the current round are ignored.
    pub fn on_timeout(&mut self, ticket: TrialTicket) -> Result<Events<E>, EngineError> {
        if !self.phase.allows_input() || self.current_ticket() != Some(ticket) {
            tracing::debug!(?ticket, "stale timeout ignored");
            return Ok(Vec::new());
        }

        self.clock.disarm();
        let limit_ms = self
            .round
            .as_ref()
            .map_or(0, |round| round.settings.time_limit_ms);
        self.score(E::Response::default(), true, limit_ms as f64)
    }

    /// Scheduler tick: fires the trial deadline if it has passed.
    pub fn update(&mut self) -> Result<Events<E>, EngineError> {
        match self.clock.poll() {
            Some(ticket) => self.on_timeout(ticket),
            None => Ok(Vec::new()),
        }
    }

    /// Abandons any round in progress without producing a result.
    pub fn reset(&mut self) {
        self.clock.disarm();
        if let Some(round) = self.round.take() {
            tracing::info!(
                exercise = %self.exercise.kind(),
                trials_played = round.trials.len(),
                "round abandoned"
            );
        }
        self.phase = RoundPhase::Idle;
    }

    fn begin_trial(&mut self, events: &mut Events<E>) -> Result<(), EngineError> {
        let Some(round) = self.round.as_mut() else {
            return Ok(());
        };

        let index = round.trials.len();
        let stimulus = self
            .exercise
            .generate(&round.settings, &round.trials, &mut self.rng);
        let trial = Trial { index, stimulus };
        round.trials.push(trial.clone());
        round.awaiting = Some(index);
        let ticket = round.ticket(index);
        let settings = round.settings;

        self.clock.disarm();
        self.clock
            .arm(Duration::from_millis(settings.time_limit_ms), ticket)?;
        self.phase = RoundPhase::AwaitingResponse;

        tracing::debug!(trial = index, stimulus = %trial.stimulus.display(), "trial started");
        events.push(RoundEvent::TrialStarted(TrialCue {
            trial,
            settings,
            ticket,
            deadline_ns: self.clock.deadline_ns().unwrap_or_default(),
        }));
        Ok(())
    }

    fn score(
        &mut self,
        response: E::Response,
        timed_out: bool,
        response_ms: f64,
    ) -> Result<Events<E>, EngineError> {
        let mut events = Vec::new();
        self.phase = RoundPhase::Evaluating;

        let Some(round) = self.round.as_mut() else {
            self.phase = RoundPhase::Idle;
            return Ok(events);
        };
        let Some(index) = round.awaiting.take() else {
            return Ok(events);
        };

        let trial = round.trials[index].clone();
        let scores = self
            .exercise
            .evaluate(&round.settings, &round.trials, &trial, &response);
        let outcome = Outcome {
            trial_index: index,
            scores,
            timed_out,
            response_ms,
        };

        round.correct += outcome.correct_count();
        round.decisions += self.exercise.dimensions();
        round.response_ms_total += response_ms;
        if timed_out {
            round.timeouts += 1;
        }
        let trials_remaining = round.trials.len() < round.settings.total_trials;

        tracing::debug!(
            trial = index,
            correct = outcome.correct_count(),
            timed_out,
            response_ms,
            "trial scored"
        );
        events.push(RoundEvent::TrialScored { trial, outcome });

        self.phase = RoundPhase::after_evaluation(trials_remaining);
        if trials_remaining {
            self.begin_trial(&mut events)?;
        } else {
            self.finish(&mut events);
        }
        Ok(events)
    }

    fn finish(&mut self, events: &mut Events<E>) {
        self.clock.disarm();
        let Some(round) = self.round.take() else {
            return;
        };

        let result = round.result(self.exercise.kind());
        let next_level = self.exercise.adapt(&result, &round.settings);
        tracing::info!(
            exercise = %result.exercise,
            accuracy = result.accuracy,
            average_ms = result.average_response_ms,
            timeouts = result.timeout_count,
            level = result.level,
            next_level,
            "round complete"
        );

        let summary = RoundSummary { result, next_level };
        self.last_summary = Some(summary.clone());
        events.push(RoundEvent::RoundComplete(summary));
    }

    pub fn exercise(&self) -> &E {
        &self.exercise
    }

    pub fn timer(&self) -> &T {
        self.clock.timer()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.phase.allows_input()
    }

    pub fn is_clock_armed(&self) -> bool {
        self.clock.is_armed()
    }

    pub fn time_remaining(&self) -> Option<Duration> {
        self.clock.remaining()
    }

    pub fn current_ticket(&self) -> Option<TrialTicket> {
        let round = self.round.as_ref()?;
        round.awaiting.map(|index| round.ticket(index))
    }

    pub fn current_settings(&self) -> Option<RoundSettings> {
        self.round.as_ref().map(|round| round.settings)
    }

    /// Trial awaiting a response, if any.
    pub fn current_trial(&self) -> Option<&Trial<E::Stimulus>> {
        let round = self.round.as_ref()?;
        round.awaiting.and_then(|index| round.trials.get(index))
    }

    /// Trials generated so far in the active round.
    pub fn history(&self) -> &[Trial<E::Stimulus>] {
        self.round
            .as_ref()
            .map_or(&[], |round| round.trials.as_slice())
    }

    /// The response that would score the awaiting trial fully correct.
    pub fn expected_response(&self) -> Option<E::Response> {
        let round = self.round.as_ref()?;
        let trial = self.current_trial()?;
        Some(
            self.exercise
                .expected_response(&round.settings, &round.trials, trial),
        )
    }

    /// Running `(correct, decisions, timeouts)` for the active round.
    pub fn running_totals(&self) -> Option<(usize, usize, usize)> {
        self.round
            .as_ref()
            .map(|round| (round.correct, round.decisions, round.timeouts))
    }

    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        self.round
            .as_ref()
            .map(|round| (round.trials.len(), round.settings.total_trials))
    }

    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.last_summary.as_ref()
    }
}
