use serde::{Deserialize, Serialize};

/// One generated trial. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial<S> {
    pub index: usize,
    pub stimulus: S,
}

/// A judged aspect of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Position,
    Letter,
    Ink,
    Rule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub correct: bool,
}

/// Evaluated result of one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub trial_index: usize,
    pub scores: Vec<DimensionScore>,
    pub timed_out: bool,
    pub response_ms: f64,
}

impl Outcome {
    pub fn correct_count(&self) -> usize {
        self.scores.iter().filter(|s| s.correct).count()
    }

    pub fn all_correct(&self) -> bool {
        self.scores.iter().all(|s| s.correct)
    }

    pub fn is_correct(&self, dimension: Dimension) -> Option<bool> {
        self.scores
            .iter()
            .find(|s| s.dimension == dimension)
            .map(|s| s.correct)
    }
}
