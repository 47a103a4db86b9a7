use std::collections::VecDeque;

use blockfall_engine::SessionEvent;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Text},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{style, to_u16};

/// The most recent session events, oldest first.
pub struct EventLogDisplay<'a> {
    events: &'a VecDeque<SessionEvent>,
    lines: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> EventLogDisplay<'a> {
    pub fn new(events: &'a VecDeque<SessionEvent>, lines: usize) -> Self {
        Self {
            events,
            lines,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        32 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        to_u16(self.lines) + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for EventLogDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let skip = self.events.len().saturating_sub(self.lines);
        let lines: Vec<Line> = self
            .events
            .iter()
            .skip(skip)
            .map(|event| Line::styled(event.to_string(), style::DEFAULT))
            .collect();
        Text::from(lines).render(area, buf);
    }
}
