use blockfall_engine::{Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{BlockDisplay, to_u16};

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    falling_piece: Option<&'a Piece>,
    block_size: u16,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            falling_piece: None,
            block_size: 2,
            block: None,
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn falling_piece(self, piece: &'a Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    /// Terminal columns per cell; at least 1.
    pub fn block_size(self, block_size: u16) -> Self {
        Self {
            block_size: block_size.max(1),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        to_u16(self.board.width())
            .saturating_mul(self.block_size)
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        to_u16(self.board.height()).saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    /// Board cells with the ghost and the falling piece drawn on top, row by row.
    fn blocks(&self) -> Vec<Vec<BlockDisplay>> {
        let mut blocks: Vec<Vec<_>> = self
            .board
            .rows()
            .map(|row| row.cells().iter().map(|&cell| BlockDisplay::from_cell(cell)).collect())
            .collect();
        let mut overlay = |piece: &Piece, display: BlockDisplay| {
            for (x, y) in piece.occupied_positions() {
                if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                    && let Some(block) = blocks.get_mut(y).and_then(|row| row.get_mut(x))
                {
                    *block = display;
                }
            }
        };
        if let Some(ghost) = &self.ghost {
            overlay(ghost, BlockDisplay::ghost());
        }
        if let Some(piece) = self.falling_piece {
            overlay(piece, BlockDisplay::filled(piece.color()));
        }
        blocks
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let board_width = to_u16(self.board.width()).saturating_mul(self.block_size);
        let left = area.x + area.width.saturating_sub(board_width) / 2;

        for (y, row) in self.blocks().iter().enumerate() {
            for (x, block) in row.iter().enumerate() {
                let cell_area = Rect::new(
                    left.saturating_add(to_u16(x).saturating_mul(self.block_size)),
                    area.y.saturating_add(to_u16(y)),
                    self.block_size,
                    1,
                )
                .intersection(area);
                if !cell_area.is_empty() {
                    block.render(cell_area, buf);
                }
            }
        }
    }
}
