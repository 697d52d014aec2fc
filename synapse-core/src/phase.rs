/// Round controller states.
///
/// `Evaluating` is transient: it is only observable from inside the
/// controller while a response is being scored.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    AwaitingResponse,
    Evaluating,
    Complete,
}

impl Default for RoundPhase {
    fn default() -> Self {
        RoundPhase::Idle
    }
}

impl RoundPhase {
    pub fn allows_input(&self) -> bool {
        matches!(self, Self::AwaitingResponse)
    }

    /// A new round may only begin from a resting state.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Complete)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Where scoring leads, given whether trials remain in the round.
    pub fn after_evaluation(trials_remaining: bool) -> Self {
        if trials_remaining {
            Self::AwaitingResponse
        } else {
            Self::Complete
        }
    }
}
