use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameConfig, GameOverPolicy, GameSession, SessionSeed, StageClearPolicy};
use clap::{Parser, Subcommand};
use rand::Rng as _;

use crate::settings::Settings;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run a session without input and print the final state as JSON
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Options shared by every mode that starts a session.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionArg {
    /// Settings file (JSON)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Session seed as 32 hex digits; drawn at random when omitted
    #[clap(long)]
    seed: Option<SessionSeed>,
    /// What happens when a new piece cannot spawn [halt, restart]
    #[clap(long)]
    game_over: Option<GameOverPolicy>,
    /// What happens when the winning score is reached [advance, freeze, continue]
    #[clap(long)]
    stage_clear: Option<StageClearPolicy>,
    /// Probability that a cell of the seeded region starts filled
    #[clap(long)]
    fill_probability: Option<f64>,
}

impl SessionArg {
    /// Loads the settings file, if any, and applies the command line overrides.
    pub(crate) fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let game = &mut settings.game;
        if let Some(policy) = self.game_over {
            game.game_over_policy = policy;
        }
        if let Some(policy) = self.stage_clear {
            game.stage_clear_policy = policy;
        }
        if let Some(probability) = self.fill_probability {
            game.fill_probability = probability;
        }
        Ok(settings)
    }

    pub(crate) fn start_session(&self, config: GameConfig) -> anyhow::Result<GameSession> {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        GameSession::with_seed(config, seed).context("Invalid game configuration")
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
