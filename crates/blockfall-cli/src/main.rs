mod command;
mod settings;
mod tui;
mod ui;

fn main() -> anyhow::Result<()> {
    command::run()
}
