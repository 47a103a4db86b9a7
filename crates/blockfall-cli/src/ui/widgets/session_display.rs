use std::collections::VecDeque;

use blockfall_engine::{GameSnapshot, SessionEvent, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use super::{BoardDisplay, EventLogDisplay, SessionStatsDisplay, color, style};

/// Board in the middle, stats on the left, recent events on the right, and a
/// status popup over the board while play is stopped.
///
/// A message raised during play (a stage cleared under the `continue`
/// policy) goes into the board's top border so no cells are hidden.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: &'a GameSnapshot<'a>,
    events: &'a VecDeque<SessionEvent>,
    log_size: usize,
    show_ghost: bool,
    block_size: u16,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(
        snapshot: &'a GameSnapshot<'a>,
        events: &'a VecDeque<SessionEvent>,
        log_size: usize,
    ) -> Self {
        Self {
            snapshot,
            events,
            log_size,
            show_ghost: true,
            block_size: 2,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn block_size(self, block_size: u16) -> Self {
        Self { block_size, ..self }
    }

    fn board_display(&self) -> BoardDisplay<'a> {
        let mut block = Block::bordered()
            .border_style(self.border_color())
            .style(style::DEFAULT);
        if self.snapshot.state.is_playing()
            && let Some(message) = self.snapshot.message()
        {
            block = block.title(Line::from(message).centered());
        }
        let mut widget = BoardDisplay::new(self.snapshot.board)
            .block_size(self.block_size)
            .block(block);
        if let Some(piece) = self.snapshot.piece {
            widget = widget.falling_piece(piece);
        }
        if self.show_ghost
            && let Some(ghost) = self.snapshot.ghost
        {
            widget = widget.ghost(ghost);
        }
        widget
    }

    /// Rows needed to draw the whole display.
    pub fn height(&self) -> u16 {
        self.board_display().height()
    }

    fn border_color(&self) -> Color {
        match self.snapshot.state {
            SessionState::Playing if self.snapshot.stage_cleared => color::GREEN,
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::StageAdvance | SessionState::StageCleared => color::GREEN,
            SessionState::GameOver => color::RED,
        }
    }

    fn popup_style(&self) -> Style {
        match self.snapshot.state {
            SessionState::Playing | SessionState::StageAdvance | SessionState::StageCleared => {
                Style::new().fg(color::BLACK).bg(color::GREEN)
            }
            SessionState::Paused => Style::new().fg(color::BLACK).bg(color::YELLOW),
            SessionState::GameOver => Style::new().fg(color::WHITE).bg(color::RED),
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let border_style = self.border_color();
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let game_board = self.board_display();
        let session_stats = SessionStatsDisplay::new(self.snapshot).block(panel("STATS"));
        let log_lines = usize::from(game_board.height().saturating_sub(2)).min(self.log_size);
        let event_log = EventLogDisplay::new(self.events, log_lines).block(panel("LOG"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(event_log.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [log_area] =
            Layout::vertical([Constraint::Length(event_log.height())]).areas(right_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        event_log.render(log_area, buf);

        if !self.snapshot.state.is_playing()
            && let Some(message) = self.snapshot.message()
        {
            let style = self.popup_style();
            let block = Block::new().style(style);
            let text = Text::styled(message, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
