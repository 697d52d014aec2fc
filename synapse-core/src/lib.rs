pub mod phase;
pub mod session;
pub mod stimulus;
pub mod trial;

pub use phase::RoundPhase;
pub use session::{format_seconds, ExerciseKind, SessionRecord, SessionResult};
pub use stimulus::{Colour, ColourWord, GridLetter, RulePrompt, Side, Stimulus, SwitchRule};
pub use trial::{Dimension, DimensionScore, Outcome, Trial};
