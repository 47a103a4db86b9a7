use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use super::Runtime;

/// Trait for TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called at the start of `Runtime::run()`. Use this to configure the tick and render rates.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);

    /// Updates application state; `elapsed` is the wall-clock time since the previous update.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);
}
