use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use synapse_core::ExerciseKind;

mod app;
mod participant;
mod sink;
mod terminal;

pub use app::App;

#[derive(Parser)]
#[command(name = "synapse", version, about = "Adaptive cognitive exercises in the terminal")]
struct Cli {
    /// JSON file overriding the exercise level tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play rounds interactively
    Play {
        #[arg(long, value_enum, default_value = "stroop-focus")]
        exercise: ExerciseArg,

        /// Starting difficulty (clamped to the exercise's levels)
        #[arg(long, default_value = "1")]
        level: u32,

        #[arg(long, default_value = "1")]
        rounds: usize,
    },

    /// Run a seeded virtual participant and print one record per round
    Simulate {
        #[arg(long, value_enum)]
        exercise: ExerciseArg,

        #[arg(long, default_value = "1")]
        level: u32,

        #[arg(long, default_value = "5")]
        rounds: usize,

        /// Probability of answering a trial correctly
        #[arg(long, default_value = "0.9")]
        accuracy: f64,

        /// Probability of letting a trial time out
        #[arg(long, default_value = "0.0")]
        miss_rate: f64,

        /// Mean response time in milliseconds
        #[arg(long, default_value = "900")]
        response_ms: u64,

        /// RNG seed; random when omitted
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExerciseArg {
    DualNBack,
    StroopFocus,
    TaskSwitch,
}

impl From<ExerciseArg> for ExerciseKind {
    fn from(arg: ExerciseArg) -> Self {
        match arg {
            ExerciseArg::DualNBack => ExerciseKind::DualNBack,
            ExerciseArg::StroopFocus => ExerciseKind::StroopFocus,
            ExerciseArg::TaskSwitch => ExerciseKind::TaskSwitch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let app = App::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Play {
            exercise,
            level,
            rounds,
        } => app.play(exercise.into(), level, rounds)?,
        Commands::Simulate {
            exercise,
            level,
            rounds,
            accuracy,
            miss_rate,
            response_ms,
            seed,
            format,
        } => {
            let profile = participant::Profile::new(accuracy, miss_rate, response_ms)?;
            let seed = seed.unwrap_or_else(rand::random::<u64>);
            app.simulate(exercise.into(), level, rounds, profile, seed, format)?
        }
    }

    Ok(())
}
