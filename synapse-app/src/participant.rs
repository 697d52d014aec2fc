use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use synapse_core::Trial;
use synapse_experiment::Exercise;

/// How a virtual participant behaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub accuracy: f64,
    pub miss_rate: f64,
    pub response_ms: u64,
}

impl Profile {
    pub fn new(accuracy: f64, miss_rate: f64, response_ms: u64) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&accuracy),
            "accuracy must be within 0..=1, got {accuracy}"
        );
        ensure!(
            (0.0..=1.0).contains(&miss_rate),
            "miss rate must be within 0..=1, got {miss_rate}"
        );
        Ok(Self {
            accuracy,
            miss_rate,
            response_ms,
        })
    }
}

/// Seeded stand-in for a person at the keyboard.
#[derive(Debug)]
pub struct Participant {
    profile: Profile,
    rng: StdRng,
}

impl Participant {
    pub fn new(profile: Profile, seed: u64) -> Self {
        Self {
            profile,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Chooses a response for `trial`, or `None` to let it time out.
    pub fn respond<E: Exercise>(
        &mut self,
        exercise: &E,
        trial: &Trial<E::Stimulus>,
        expected: E::Response,
    ) -> Option<E::Response> {
        if self.rng.random_bool(self.profile.miss_rate) {
            return None;
        }
        if self.rng.random_bool(self.profile.accuracy) {
            Some(expected)
        } else {
            Some(exercise.perturb(trial, &expected, &mut self.rng))
        }
    }

    /// Reaction time drawn around the profile mean, always inside the limit.
    pub fn reaction_ms(&mut self, limit_ms: u64) -> u64 {
        let mean = self.profile.response_ms.max(2);
        let ms = self
            .rng
            .random_range(mean / 2..=mean.saturating_add(mean / 2));
        ms.clamp(1, limit_ms.saturating_sub(1).max(1))
    }
}
