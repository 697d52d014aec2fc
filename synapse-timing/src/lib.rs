pub mod clock;
pub mod timer;

pub use clock::{ClockError, TrialClock};
pub use timer::{HighPrecisionTimer, ManualTimer, Timer};
