use synapse_timing::ClockError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Clock(#[from] ClockError),
}
