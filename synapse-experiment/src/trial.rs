use std::time::Duration;
use synapse_core::Trial;

use crate::exercises::RoundSettings;

/// Identity attached to an armed deadline. A timeout is only honoured when
/// its ticket names the round and trial currently awaiting a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrialTicket {
    pub round: u64,
    pub trial: usize,
}

/// Everything a front end needs to present a trial.
#[derive(Debug, Clone)]
pub struct TrialCue<S> {
    pub trial: Trial<S>,
    pub settings: RoundSettings,
    pub ticket: TrialTicket,
    /// Timer timestamp (ns) at which the trial times out.
    pub deadline_ns: u64,
}

impl<S> TrialCue<S> {
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.settings.time_limit_ms)
    }

    /// 1-based position and round length, for progress displays.
    pub fn progress(&self) -> (usize, usize) {
        (self.trial.index + 1, self.settings.total_trials)
    }
}
