use std::{collections::VecDeque, time::Duration};

use blockfall_engine::{GameSession, SessionEvent, SessionState};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};

use crate::{
    settings::DisplayConfig,
    tui::{App, RenderMode, Runtime},
    ui::widgets::{SessionDisplay, style},
};

const FPS: f64 = 60.0;
const EVENT_LOG_SIZE: usize = 8;

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    display: DisplayConfig,
    event_log: VecDeque<SessionEvent>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession, display: DisplayConfig) -> Self {
        let mut app = Self {
            session,
            display,
            event_log: VecDeque::with_capacity(EVENT_LOG_SIZE),
            is_exiting: false,
        };
        app.collect_events();
        app
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Moves new session events into the log, dropping the oldest entries.
    fn collect_events(&mut self) {
        for event in self.session.drain_events() {
            if matches!(event, SessionEvent::PieceLocked { .. }) {
                continue;
            }
            if self.event_log.len() == EVENT_LOG_SIZE {
                self.event_log.pop_front();
            }
            self.event_log.push_back(event);
        }
    }

    fn help_text(&self) -> &'static str {
        match self.session.session_state() {
            SessionState::Playing => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ Space (Rotate) | P (Pause) | R (Restart) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | R (Restart) | Q (Quit)",
            SessionState::StageAdvance => "Controls: Q (Quit)",
            SessionState::StageCleared | SessionState::GameOver => {
                "Controls: R (Restart) | Q (Quit)"
            }
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
        runtime.set_tick_rate(Some(FPS));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) {
        let is_playing = self.session.session_state().is_playing();

        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Left if is_playing => _ = self.session.try_move_left(),
                KeyCode::Right if is_playing => _ = self.session.try_move_right(),
                KeyCode::Down if is_playing => _ = self.session.try_soft_drop(),
                KeyCode::Up | KeyCode::Char(' ') if is_playing => _ = self.session.try_rotate(),
                KeyCode::Char('p') => self.session.toggle_pause(),
                KeyCode::Char('r') if !self.session.session_state().is_stage_advance() => {
                    self.session.restart();
                }
                KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
                _ => {}
            }
        }
        self.collect_events();
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.session.snapshot();
        let session_display = SessionDisplay::new(&snapshot, &self.event_log, EVENT_LOG_SIZE)
            .block_size(self.display.block_size)
            .show_ghost(self.display.show_ghost);
        let help_text = Text::from(self.help_text()).style(style::HELP).centered();

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        self.session.advance(elapsed);
        self.collect_events();
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameConfig, SessionSeed};
    use crossterm::event::KeyEvent;

    use super::*;

    fn app() -> PlayApp {
        let seed: SessionSeed = "0f0e0d0c0b0a09080706050403020100".parse().unwrap();
        let session = GameSession::with_seed(GameConfig::default(), seed).unwrap();
        PlayApp::new(session, DisplayConfig::default())
    }

    fn press(app: &mut PlayApp, code: KeyCode) {
        app.handle_event(&mut Runtime::new(), &Event::Key(KeyEvent::from(code)));
    }

    #[test]
    fn test_start_event_is_logged() {
        let app = app();
        assert!(matches!(
            app.event_log.front(),
            Some(SessionEvent::StageStarted { stage: 1, .. })
        ));
        assert!(app.session().events().is_empty());
    }

    #[test]
    fn test_keys_move_piece() {
        let mut app = app();
        let start = app.session().falling_piece().position();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.session().falling_piece().position().x(), start.x() - 1);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session().falling_piece().position().y(), start.y() + 1);
    }

    #[test]
    fn test_pause_blocks_movement() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        assert!(app.session().session_state().is_paused());
        let position = app.session().falling_piece().position();
        press(&mut app, KeyCode::Right);
        app.update(&mut Runtime::new(), Duration::from_secs(5));
        assert_eq!(app.session().falling_piece().position(), position);
        press(&mut app, KeyCode::Char('p'));
        assert!(app.session().session_state().is_playing());
    }

    #[test]
    fn test_restart_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.session().games_played(), 2);
        assert!(matches!(
            app.event_log.back(),
            Some(SessionEvent::StageStarted { stage: 1, .. })
        ));
        assert!(!app.should_exit());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit());
    }

    #[test]
    fn test_event_log_is_bounded() {
        let mut app = app();
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('r'));
        }
        assert_eq!(app.event_log.len(), EVENT_LOG_SIZE);
    }
}
