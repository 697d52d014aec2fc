//! Single-deadline trial clock.
//!
//! The clock never blocks and never calls back into its owner. It is polled
//! from the owner's control loop and hands back the ticket it was armed with
//! exactly once, after the deadline has passed.

use crate::timer::Timer;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    /// The owner must disarm before arming again.
    #[error("trial clock is already armed ({remaining_ms} ms remaining)")]
    AlreadyArmed { remaining_ms: u64 },
}

#[derive(Debug, Clone)]
struct Armed<K> {
    started: u64,
    deadline: u64,
    ticket: K,
}

#[derive(Debug, Clone)]
pub struct TrialClock<T, K>
where
    T: Timer<Timestamp = u64>,
{
    timer: T,
    armed: Option<Armed<K>>,
}

impl<T, K> TrialClock<T, K>
where
    T: Timer<Timestamp = u64>,
{
    pub fn new(timer: T) -> Self {
        Self { timer, armed: None }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn arm(&mut self, limit: Duration, ticket: K) -> Result<(), ClockError> {
        if self.armed.is_some() {
            let remaining_ms = self.remaining().unwrap_or_default().as_millis() as u64;
            return Err(ClockError::AlreadyArmed { remaining_ms });
        }
        let started = self.timer.now();
        let limit_ns = u64::try_from(limit.as_nanos()).unwrap_or(u64::MAX);
        self.armed = Some(Armed {
            started,
            deadline: started.saturating_add(limit_ns),
            ticket,
        });
        Ok(())
    }

    /// Cancels the outstanding deadline, if any. Safe in every state.
    pub fn disarm(&mut self) -> Option<K> {
        self.armed.take().map(|a| a.ticket)
    }

    /// Fires the deadline: returns the ticket once the deadline has passed.
    pub fn poll(&mut self) -> Option<K> {
        let now = self.timer.now();
        let due = matches!(&self.armed, Some(armed) if now >= armed.deadline);
        if due {
            self.disarm()
        } else {
            None
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.armed
            .as_ref()
            .map(|a| Duration::from_nanos(a.deadline.saturating_sub(self.timer.now())))
    }

    /// Time since the current deadline was armed.
    pub fn elapsed(&self) -> Option<Duration> {
        self.armed.as_ref().map(|a| self.timer.elapsed(a.started))
    }

    pub fn deadline_ns(&self) -> Option<u64> {
        self.armed.as_ref().map(|a| a.deadline)
    }
}
