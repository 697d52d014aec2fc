use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use synapse_core::ExerciseKind;
use synapse_experiment::{
    DifficultyStore, DualNBack, Exercise, ExerciseSession, MemoryDifficultyStore, RoundController,
    RoundEvent, SessionLog, StroopFocus, SynapseConfig, TaskSwitch,
};
use synapse_timing::{HighPrecisionTimer, ManualTimer, Timer};

use crate::participant::{Participant, Profile};
use crate::sink::RecordWriter;
use crate::terminal::{feedback, TerminalPrompt};
use crate::OutputFormat;

const BETWEEN_ROUNDS: Duration = Duration::from_millis(1500);

pub struct App {
    config: SynapseConfig,
}

impl App {
    /// Loads exercise configuration, falling back to the built-in tables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                SynapseConfig::from_json(&json)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => SynapseConfig::default(),
        };
        config.validate()?;
        Ok(Self { config })
    }

    pub fn simulate(
        &self,
        kind: ExerciseKind,
        level: u32,
        rounds: usize,
        profile: Profile,
        seed: u64,
        format: OutputFormat,
    ) -> Result<()> {
        tracing::info!(exercise = %kind, level, rounds, seed, "simulating participant");
        let out = io::stdout().lock();
        let log = match kind {
            ExerciseKind::DualNBack => simulate(
                DualNBack::new(self.config.dual_n_back.clone())?,
                level,
                rounds,
                profile,
                seed,
                RecordWriter::new(out, format),
            )?,
            ExerciseKind::StroopFocus => simulate(
                StroopFocus::new(self.config.stroop.clone())?,
                level,
                rounds,
                profile,
                seed,
                RecordWriter::new(out, format),
            )?,
            ExerciseKind::TaskSwitch => simulate(
                TaskSwitch::new(self.config.task_switch.clone())?,
                level,
                rounds,
                profile,
                seed,
                RecordWriter::new(out, format),
            )?,
        };
        report(&log);
        Ok(())
    }

    pub fn play(&self, kind: ExerciseKind, level: u32, rounds: usize) -> Result<()> {
        let input = spawn_stdin_reader();
        let log = match kind {
            ExerciseKind::DualNBack => play(
                DualNBack::new(self.config.dual_n_back.clone())?,
                level,
                rounds,
                &input,
            )?,
            ExerciseKind::StroopFocus => play(
                StroopFocus::new(self.config.stroop.clone())?,
                level,
                rounds,
                &input,
            )?,
            ExerciseKind::TaskSwitch => play(
                TaskSwitch::new(self.config.task_switch.clone())?,
                level,
                rounds,
                &input,
            )?,
        };
        report(&log);
        Ok(())
    }
}

fn report(log: &SessionLog) {
    if let Some(best) = log.best() {
        tracing::info!(
            sessions = log.len(),
            best_accuracy = best.result.accuracy,
            best_average_ms = best.result.average_response_ms,
            final_level = log.latest().map_or(best.next_level, |r| r.next_level),
            "sessions finished"
        );
    }
}

fn simulate<E: Exercise, W: Write>(
    exercise: E,
    level: u32,
    rounds: usize,
    profile: Profile,
    seed: u64,
    sink: RecordWriter<W>,
) -> Result<SessionLog> {
    let timer = ManualTimer::new();
    let store = MemoryDifficultyStore::new(level, exercise.bounds());
    let controller = RoundController::new(exercise, timer.clone(), StdRng::seed_from_u64(seed));
    let mut session = ExerciseSession::new(controller, store, sink);
    let mut participant = Participant::new(profile, seed.wrapping_add(1));

    for _ in 0..rounds {
        session.start_round()?;
        while !session.controller().phase().is_complete() {
            let controller = session.controller();
            let (Some(trial), Some(expected), Some(settings)) = (
                controller.current_trial().cloned(),
                controller.expected_response(),
                controller.current_settings(),
            ) else {
                break;
            };

            match participant.respond(controller.exercise(), &trial, expected) {
                Some(response) => {
                    timer.advance_ms(participant.reaction_ms(settings.time_limit_ms));
                    session.submit(response)?;
                }
                None => {
                    timer.advance_ms(settings.time_limit_ms);
                    session.update()?;
                }
            }
        }
    }

    let (_, _, sink) = session.into_parts();
    sink.finish()
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn play<E: TerminalPrompt>(
    exercise: E,
    level: u32,
    rounds: usize,
    input: &Receiver<String>,
) -> Result<SessionLog> {
    let timer = HighPrecisionTimer::new();
    let store = MemoryDifficultyStore::new(level, exercise.bounds());
    let kind = exercise.kind();
    let controller = RoundController::new(exercise, timer.clone(), rand::rng());
    let mut session = ExerciseSession::new(controller, store, SessionLog::default());
    let mut out = io::stdout().lock();

    writeln!(out, "=== {} ===", kind.name())?;
    writeln!(out, "Type q to quit.\n")?;

    'rounds: for round in 0..rounds {
        if round > 0 {
            writeln!(out, "\nNext round shortly...")?;
            out.flush()?;
            timer.sleep(BETWEEN_ROUNDS);
        }

        let level = session.store().difficulty();
        writeln!(out, "{}\n", session.controller().exercise().instructions(level))?;
        let mut events = session.start_round()?;

        loop {
            for event in &events {
                match event {
                    RoundEvent::TrialStarted(cue) => {
                        writeln!(out, "\n{}", session.controller().exercise().render(cue))?;
                    }
                    RoundEvent::TrialScored { trial, outcome } => {
                        writeln!(out, "{}", feedback(&trial.stimulus, outcome))?;
                    }
                    RoundEvent::RoundComplete(_) => {
                        if let Some(record) = session.sink().latest() {
                            writeln!(out, "\n{}\n{}", record.label, record.summary)?;
                            if let Some(note) = &record.note {
                                writeln!(out, "{note}")?;
                            }
                        }
                    }
                }
            }
            out.flush()?;

            if session.controller().phase().is_complete() {
                break;
            }

            let wait = session.controller().time_remaining().unwrap_or_default();
            events = match input.recv_timeout(wait) {
                Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                    session.abandon();
                    break 'rounds;
                }
                Ok(line) => match session.controller().exercise().parse(&line) {
                    Some(response) => session.submit(response)?,
                    None => {
                        writeln!(out, "  ? not an answer here")?;
                        Vec::new()
                    }
                },
                Err(RecvTimeoutError::Timeout) => session.update()?,
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("input closed, leaving the round");
                    session.abandon();
                    break 'rounds;
                }
            };
        }
    }

    let (_, _, log) = session.into_parts();
    Ok(log)
}
