use serde::{Deserialize, Serialize};
use std::fmt;

/// The exercises the engine knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    DualNBack,
    StroopFocus,
    TaskSwitch,
}

impl ExerciseKind {
    pub fn id(self) -> &'static str {
        match self {
            ExerciseKind::DualNBack => "dual-n-back",
            ExerciseKind::StroopFocus => "stroop-focus",
            ExerciseKind::TaskSwitch => "task-switch",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExerciseKind::DualNBack => "Dual N-Back Focus",
            ExerciseKind::StroopFocus => "Stroop Focus Lab",
            ExerciseKind::TaskSwitch => "Task Switch Circuit",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Terminal summary of one completed round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub exercise: ExerciseKind,
    /// Whole-number percentage of correct decisions, 0..=100.
    pub accuracy: f64,
    pub average_response_ms: f64,
    pub level: u32,
    pub total_trials: usize,
    /// Judged decisions: dimensions per trial times trials.
    pub decisions: usize,
    pub correct_count: usize,
    pub timeout_count: usize,
}

impl SessionResult {
    pub fn average_label(&self) -> String {
        format_seconds(self.average_response_ms)
    }
}

/// What the session sink receives once per round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(flatten)]
    pub result: SessionResult,
    pub label: String,
    pub summary: String,
    pub next_level: u32,
    /// Participant-facing note about a level change, if the level moved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Formats milliseconds as seconds with one decimal, e.g. `2.3 sec`.
pub fn format_seconds(ms: f64) -> String {
    let seconds = (ms / 1000.0 * 10.0).round() / 10.0;
    format!("{:.1} sec", seconds.max(0.0))
}
