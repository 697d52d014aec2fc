//! Collaborator seams: where difficulty comes from and where finished
//! sessions go.

use std::collections::VecDeque;

use synapse_core::SessionRecord;

use crate::adapt::LevelBounds;

/// Persisted per-exercise difficulty.
pub trait DifficultyStore {
    fn difficulty(&self) -> u32;

    /// Stores `next` and returns the authoritative value, which may be
    /// clamped.
    fn update_difficulty(&mut self, next: u32) -> u32;
}

/// Receives one record per completed round.
pub trait SessionSink {
    fn record_session(&mut self, record: SessionRecord);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryDifficultyStore {
    level: u32,
    bounds: LevelBounds,
}

impl MemoryDifficultyStore {
    pub fn new(level: u32, bounds: LevelBounds) -> Self {
        Self {
            level: bounds.clamp(level),
            bounds,
        }
    }
}

impl DifficultyStore for MemoryDifficultyStore {
    fn difficulty(&self) -> u32 {
        self.level
    }

    fn update_difficulty(&mut self, next: u32) -> u32 {
        if !self.bounds.contains(next) {
            tracing::debug!(
                requested = next,
                min = self.bounds.min,
                max = self.bounds.max,
                "difficulty clamped"
            );
        }
        self.level = self.bounds.clamp(next);
        self.level
    }
}

/// Most recent sessions, newest last.
#[derive(Debug, Clone)]
pub struct SessionLog {
    records: VecDeque<SessionRecord>,
    capacity: usize,
}

impl SessionLog {
    pub const DEFAULT_CAPACITY: usize = 60;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&SessionRecord> {
        self.records.back()
    }

    /// Highest accuracy, ties broken by the faster average.
    pub fn best(&self) -> Option<&SessionRecord> {
        self.records.iter().max_by(|a, b| {
            a.result
                .accuracy
                .total_cmp(&b.result.accuracy)
                .then(b.result.average_response_ms.total_cmp(&a.result.average_response_ms))
        })
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl SessionSink for SessionLog {
    fn record_session(&mut self, record: SessionRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_core::{ExerciseKind, SessionResult};

    fn record(accuracy: f64, average_response_ms: f64) -> SessionRecord {
        SessionRecord {
            result: SessionResult {
                exercise: ExerciseKind::StroopFocus,
                accuracy,
                average_response_ms,
                level: 1,
                total_trials: 10,
                decisions: 10,
                correct_count: (accuracy / 10.0) as usize,
                timeout_count: 0,
            },
            label: String::new(),
            summary: String::new(),
            next_level: 1,
            note: None,
        }
    }

    #[test]
    fn store_clamps() {
        let mut store = MemoryDifficultyStore::new(9, LevelBounds::new(1, 4));
        assert_eq!(store.difficulty(), 4);
        assert_eq!(store.update_difficulty(0), 1);
        assert_eq!(store.update_difficulty(3), 3);
        assert_eq!(store.difficulty(), 3);
    }

    #[test]
    fn log_drops_oldest() {
        let mut log = SessionLog::with_capacity(2);
        log.record_session(record(10.0, 1.0));
        log.record_session(record(20.0, 1.0));
        log.record_session(record(30.0, 1.0));
        assert_eq!(log.len(), 2);
        let kept: Vec<f64> = log.records().map(|r| r.result.accuracy).collect();
        assert_eq!(kept, vec![20.0, 30.0]);
        assert_eq!(log.latest().map(|r| r.result.accuracy), Some(30.0));
    }

    #[test]
    fn best_prefers_accuracy_then_speed() {
        let mut log = SessionLog::default();
        assert!(log.best().is_none());
        log.record_session(record(90.0, 900.0));
        log.record_session(record(90.0, 700.0));
        log.record_session(record(80.0, 100.0));
        let best = log.best().unwrap();
        assert_eq!(best.result.accuracy, 90.0);
        assert_eq!(best.result.average_response_ms, 700.0);
    }
}
