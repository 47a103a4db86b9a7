use crate::tui::Runtime;

use self::app::PlayApp;

use super::SessionArg;

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    session: SessionArg,
    /// Do not mark where the active piece would land
    #[clap(long)]
    no_ghost: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { session, no_ghost } = arg;

    let mut settings = session.settings()?;
    if *no_ghost {
        settings.display.show_ghost = false;
    }
    let mut app = PlayApp::new(session.start_session(settings.game)?, settings.display);

    Runtime::new().run(&mut app)?;

    let session = app.session();
    if let Some(seed) = session.seed() {
        println!(
            "stage {}, score {} (total {}), seed {seed}",
            session.stats().stage(),
            session.stats().score(),
            session.stats().total_score(),
        );
    }
    Ok(())
}
