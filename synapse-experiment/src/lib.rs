pub mod adapt;
pub mod collab;
pub mod config;
pub mod error;
pub mod exercises;
pub mod session;
pub mod state;
pub mod trial;

pub use adapt::{next_level, LevelBounds, Thresholds};
pub use collab::{DifficultyStore, MemoryDifficultyStore, SessionLog, SessionSink};
pub use config::{
    AdaptPolicy, ConfigError, DualNBackConfig, StroopConfig, StroopLevel, SwitchLevel,
    SynapseConfig, TaskSwitchConfig,
};
pub use error::EngineError;
pub use exercises::{DualNBack, Exercise, MatchMarks, RoundSettings, StroopFocus, TaskSwitch};
pub use session::ExerciseSession;
pub use state::{RoundController, RoundEvent, RoundSummary};
pub use trial::{TrialCue, TrialTicket};
