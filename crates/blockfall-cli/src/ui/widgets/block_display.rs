use blockfall_engine::{BlockColor, Cell};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::style;

/// One board cell, drawn `block_size` columns wide.
#[derive(Debug, Clone, Copy)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn filled(color: BlockColor) -> Self {
        Self::new(style::block(color), "")
    }

    pub const fn ghost() -> Self {
        Self::new(style::GHOST, "[]")
    }

    pub const fn from_cell(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Self::new(style::EMPTY_DOT, "."),
            Cell::Filled(color) => Self::filled(color),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
