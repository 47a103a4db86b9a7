use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use blockfall_engine::{GameSession, GameSnapshot, SessionEvent, SessionSeed};
use rand::Rng;
use serde::Serialize;

use super::SessionArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(super) session: SessionArg,
    /// Number of timer steps to run (gravity ticks and stage transitions)
    #[clap(long, default_value_t = 1000)]
    ticks: usize,
    /// Output file; stdout when omitted
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport<'a> {
    seed: Option<SessionSeed>,
    steps: usize,
    events: Vec<SessionEvent>,
    snapshot: GameSnapshot<'a>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        session: session_arg,
        ticks,
        output,
    } = arg;

    let settings = session_arg.settings()?;
    let mut session = session_arg.start_session(settings.game)?;
    let (steps, events) = simulate(&mut session, *ticks);
    let report = SimulationReport {
        seed: session.seed(),
        steps,
        events,
        snapshot: session.snapshot(),
    };
    write_report(&report, output.as_deref())
}

/// Runs up to `max_steps` timer firings with no input.
///
/// Each step advances the session by exactly the time left on its timer, so a
/// step is one gravity tick or one stage-advance delay. Stops early once the
/// timer is stopped (game over or frozen stage). Returns the number of steps
/// taken and every event the session produced.
fn simulate<R>(session: &mut GameSession<R>, max_steps: usize) -> (usize, Vec<SessionEvent>)
where
    R: Rng,
{
    let mut events: Vec<_> = session.drain_events().collect();
    let mut steps = 0;
    while steps < max_steps
        && let Some(remaining) = session.timer().remaining()
    {
        session.advance(remaining);
        events.extend(session.drain_events());
        steps += 1;
    }
    (steps, events)
}

fn write_report(report: &SimulationReport<'_>, output: Option<&Path>) -> anyhow::Result<()> {
    let (mut writer, target): (Box<dyn Write>, String) = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{BlockColor, Board, Cell, GameConfig, GameOverPolicy};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn seed() -> SessionSeed {
        "00112233445566778899aabbccddeeff".parse().unwrap()
    }

    #[test]
    fn test_steps_are_gravity_ticks() {
        let config = GameConfig {
            fill_probability: 0.0,
            ..GameConfig::default()
        };
        let mut session = GameSession::with_seed(config, seed()).unwrap();
        let (steps, events) = simulate(&mut session, 5);
        assert_eq!(steps, 5);
        assert_eq!(session.falling_piece().position().y(), 5);
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::StageStarted { stage: 1, .. }]
        ));
    }

    #[test]
    fn test_stops_at_game_over() {
        let mut board = Board::new(10, 20);
        for x in 0..9 {
            board.set_cell(x, 2, Cell::Filled(BlockColor::Gray));
        }
        let config = GameConfig {
            game_over_policy: GameOverPolicy::Halt,
            ..GameConfig::default()
        };
        let mut session =
            GameSession::with_board(config, board, Pcg32::seed_from_u64(7)).unwrap();
        let (steps, events) = simulate(&mut session, 1000);
        assert!(steps < 1000);
        assert!(session.session_state().is_game_over());
        assert!(matches!(events.last(), Some(SessionEvent::GameOver { .. })));
    }

    #[test]
    fn test_same_seed_same_report() {
        let run = || {
            let mut session = GameSession::with_seed(GameConfig::default(), seed()).unwrap();
            let (steps, events) = simulate(&mut session, 300);
            let report = SimulationReport {
                seed: session.seed(),
                steps,
                events,
                snapshot: session.snapshot(),
            };
            serde_json::to_string(&report).unwrap()
        };
        let report = run();
        assert_eq!(report, run());
        assert!(report.contains("\"seed\":\"00112233445566778899aabbccddeeff\""));
    }
}
