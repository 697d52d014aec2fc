use rand::Rng;
use synapse_core::SessionRecord;
use synapse_timing::Timer;

use crate::collab::{DifficultyStore, SessionSink};
use crate::error::EngineError;
use crate::exercises::Exercise;
use crate::state::{RoundController, RoundEvent};

/// A controller wired to its difficulty store and session sink.
///
/// Rounds start at the stored difficulty. When a round completes, the next
/// level is written back (only if it changed) and a [`SessionRecord`] goes to
/// the sink.
pub struct ExerciseSession<E, T, R, D, K>
where
    E: Exercise,
    T: Timer<Timestamp = u64>,
    R: Rng,
    D: DifficultyStore,
    K: SessionSink,
{
    controller: RoundController<E, T, R>,
    store: D,
    sink: K,
}

type Events<E> = Vec<RoundEvent<<E as Exercise>::Stimulus>>;

impl<E, T, R, D, K> ExerciseSession<E, T, R, D, K>
where
    E: Exercise,
    T: Timer<Timestamp = u64>,
    R: Rng,
    D: DifficultyStore,
    K: SessionSink,
{
    pub fn new(controller: RoundController<E, T, R>, store: D, sink: K) -> Self {
        Self {
            controller,
            store,
            sink,
        }
    }

    pub fn start_round(&mut self) -> Result<Events<E>, EngineError> {
        let level = self.store.difficulty();
        let mut events = self.controller.start(level)?;
        self.absorb(&mut events);
        Ok(events)
    }

    pub fn submit(&mut self, response: E::Response) -> Result<Events<E>, EngineError> {
        let mut events = self.controller.submit_response(response)?;
        self.absorb(&mut events);
        Ok(events)
    }

    pub fn update(&mut self) -> Result<Events<E>, EngineError> {
        let mut events = self.controller.update()?;
        self.absorb(&mut events);
        Ok(events)
    }

    pub fn abandon(&mut self) {
        self.controller.reset();
    }

    fn absorb(&mut self, events: &mut Events<E>) {
        for event in events.iter_mut() {
            let RoundEvent::RoundComplete(summary) = event else {
                continue;
            };

            let level = summary.result.level;
            if summary.next_level != level {
                summary.next_level = self.store.update_difficulty(summary.next_level);
            }

            let exercise = self.controller.exercise();
            let (label, text) = exercise.describe(&summary.result);
            let note = exercise.level_note(level, summary.next_level);
            tracing::debug!(
                exercise = %summary.result.exercise,
                next_level = summary.next_level,
                "session recorded"
            );
            self.sink.record_session(SessionRecord {
                result: summary.result.clone(),
                label,
                summary: text,
                next_level: summary.next_level,
                note,
            });
        }
    }

    pub fn controller(&self) -> &RoundController<E, T, R> {
        &self.controller
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_parts(self) -> (RoundController<E, T, R>, D, K) {
        (self.controller, self.store, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapt::LevelBounds;
    use crate::collab::{MemoryDifficultyStore, SessionLog};
    use crate::exercises::TaskSwitch;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use synapse_core::RoundPhase;
    use synapse_timing::ManualTimer;

    fn session(
        level: u32,
    ) -> (
        ExerciseSession<TaskSwitch, ManualTimer, StdRng, MemoryDifficultyStore, SessionLog>,
        ManualTimer,
    ) {
        let timer = ManualTimer::new();
        let controller =
            RoundController::new(TaskSwitch::default(), timer.clone(), StdRng::seed_from_u64(4));
        let store = MemoryDifficultyStore::new(level, LevelBounds::new(1, 4));
        (
            ExerciseSession::new(controller, store, SessionLog::default()),
            timer,
        )
    }

    #[test]
    fn perfect_round_promotes_and_records() {
        let (mut s, timer) = session(2);
        s.start_round().unwrap();
        while s.controller().phase() != RoundPhase::Complete {
            timer.advance_ms(400);
            let answer = s.controller().expected_response().unwrap();
            s.submit(answer).unwrap();
        }
        assert_eq!(s.store().difficulty(), 3);
        assert_eq!(s.sink().len(), 1);
        let record = s.sink().latest().unwrap();
        assert_eq!(record.next_level, 3);
        assert_eq!(record.result.total_trials, 16);
        assert_eq!(
            record.summary,
            "Navigated 16 task switches with 100% accuracy (0.4 sec average response, level 2)"
        );
        assert_eq!(
            record.note.as_deref(),
            Some("Level 3 unlocked for the next circuit.")
        );
        assert_eq!(record.label, "100% accuracy • 0.4 sec");
    }

    #[test]
    fn silent_round_demotes() {
        let (mut s, timer) = session(3);
        s.start_round().unwrap();
        while s.controller().phase() != RoundPhase::Complete {
            timer.advance_ms(3000);
            s.update().unwrap();
        }
        let record = s.sink().latest().unwrap();
        assert_eq!(record.result.timeout_count, 20);
        assert_eq!(record.result.accuracy, 0.0);
        assert_eq!(s.store().difficulty(), 2);
        assert_eq!(
            record.note.as_deref(),
            Some("Dropping to level 2 to rebuild accuracy.")
        );
        assert!(!record.summary.contains("Dropping"));
    }

    #[test]
    fn abandoned_round_records_nothing() {
        let (mut s, _) = session(1);
        s.start_round().unwrap();
        s.abandon();
        assert!(s.sink().is_empty());
        assert_eq!(s.store().difficulty(), 1);
        assert_eq!(s.controller().phase(), RoundPhase::Idle);
    }
}
