use rand::{Rng, seq::IndexedRandom as _};
use serde::{Serialize, Serializer};

use super::{piece::Piece, shape::BlockColor};

/// A single board cell.
///
/// Locked piece cells and pre-seeded terrain both end up as `Filled`; only the
/// color survives, so the two are indistinguishable once on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::IsVariant)]
pub enum Cell {
    #[default]
    Empty,
    Filled(BlockColor),
}

impl Cell {
    #[must_use]
    pub const fn color(self) -> Option<BlockColor> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(color),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // `null` for empty cells, the color token otherwise
        self.color().serialize(serializer)
    }
}

/// One row of the board. Its length is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BoardRow {
    cells: Vec<Cell>,
}

impl BoardRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; width],
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_filled())
    }
}

/// The locked-cell grid.
///
/// `(x, y)` addresses column `x` (left to right) and row `y` (top to bottom).
/// Dimensions never change after construction; clearing a row always inserts
/// a fresh empty row at the top, so every row keeps exactly `width` cells.
///
/// Accessors take coordinates on trust: callers validate positions through
/// [`can_place`](super::collision::can_place) first, and an out-of-range
/// coordinate is a programming error that panics.
///
/// # Example
///
/// ```
/// use blockfall_engine::{BlockColor, Board, Cell};
///
/// let mut board = Board::new(4, 3);
/// for x in 0..4 {
///     board.set_cell(x, 2, Cell::Filled(BlockColor::Red));
/// }
/// assert!(board.is_row_full(2));
/// assert_eq!(board.clear_full_rows(), 1);
/// assert_eq!(board.filled_cells(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board {
    #[serde(skip)]
    width: usize,
    rows: Vec<BoardRow>,
}

impl Board {
    /// Creates a `width × height` board with every cell empty.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board must not be empty");
        Self {
            width,
            rows: vec![BoardRow::empty(width); height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y].cells[x]
    }

    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y].cells[x] = cell;
    }

    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    /// Number of non-empty cells on the board.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| &row.cells)
            .filter(|cell| cell.is_filled())
            .count()
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].is_filled()
    }

    /// Removes row `y` and inserts an empty row at the top.
    ///
    /// Rows above `y` move down by one; rows below `y` stay where they are.
    pub fn clear_row(&mut self, y: usize) {
        self.rows.remove(y);
        self.rows.insert(0, BoardRow::empty(self.width));
    }

    /// Clears every full row and returns how many were removed.
    ///
    /// Rows are scanned bottom to top. After a clear the same index is tested
    /// again, since the row that just shifted into it may be full as well.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut count = 0;
        let mut y = self.height();
        while y > 0 {
            if self.is_row_full(y - 1) {
                self.clear_row(y - 1);
                count += 1;
            } else {
                y -= 1;
            }
        }
        count
    }

    /// Writes the piece's color into every cell it occupies.
    ///
    /// # Panics
    ///
    /// Panics if any occupied cell lies outside the board.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let cell = Cell::Filled(piece.color());
        for (x, y) in piece.occupied_positions() {
            let (Ok(col), Ok(row)) = (usize::try_from(x), usize::try_from(y)) else {
                panic!("piece cell ({x}, {y}) lies outside the board");
            };
            self.set_cell(col, row, cell);
        }
    }

    /// Randomly fills the rows from `start_row` to the bottom.
    ///
    /// Each cell independently becomes a uniformly chosen palette color with
    /// probability `fill_probability`, and stays untouched otherwise.
    /// Full rows produced here are left in place; they clear on the next lock.
    ///
    /// # Panics
    ///
    /// Panics if `fill_probability` is not within `0.0..=1.0`.
    pub fn seed_random_fill<R>(
        &mut self,
        fill_probability: f64,
        start_row: usize,
        palette: &[BlockColor],
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        let start_row = start_row.min(self.height());
        for row in &mut self.rows[start_row..] {
            for cell in &mut row.cells {
                if rng.random_bool(fill_probability)
                    && let Some(&color) = palette.choose(rng)
                {
                    *cell = Cell::Filled(color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::core::{piece::PiecePosition, shape::PieceKind};

    const RED: Cell = Cell::Filled(BlockColor::Red);
    const BLUE: Cell = Cell::Filled(BlockColor::Blue);

    fn fill_row(board: &mut Board, y: usize, cell: Cell) {
        for x in 0..board.width() {
            board.set_cell(x, y, cell);
        }
    }

    fn row_cells(board: &Board, y: usize) -> Vec<Cell> {
        (0..board.width()).map(|x| board.cell(x, y)).collect()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 20);
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        assert_eq!(board.filled_cells(), 0);
        assert!(board.rows().all(|row| row.cells().len() == 10));
    }

    #[test]
    #[should_panic(expected = "board must not be empty")]
    fn test_zero_sized_board_panics() {
        let _ = Board::new(0, 20);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_access_panics() {
        let board = Board::new(10, 20);
        let _ = board.cell(10, 0);
    }

    #[test]
    fn test_row_full_requires_every_cell() {
        let mut board = Board::new(5, 4);
        for x in 0..4 {
            board.set_cell(x, 3, RED);
        }
        assert!(!board.is_row_full(3));
        board.set_cell(4, 3, BLUE);
        assert!(board.is_row_full(3));
    }

    #[test]
    fn test_clear_row_shifts_rows_above() {
        let mut board = Board::new(3, 4);
        board.set_cell(0, 0, RED);
        board.set_cell(1, 1, BLUE);
        fill_row(&mut board, 2, RED);
        board.set_cell(2, 3, BLUE);

        board.clear_row(2);

        assert_eq!(board.height(), 4);
        assert_eq!(row_cells(&board, 0), vec![Cell::Empty; 3]);
        assert_eq!(row_cells(&board, 1), vec![RED, Cell::Empty, Cell::Empty]);
        assert_eq!(row_cells(&board, 2), vec![Cell::Empty, BLUE, Cell::Empty]);
        // below the cleared row: untouched
        assert_eq!(row_cells(&board, 3), vec![Cell::Empty, Cell::Empty, BLUE]);
    }

    #[test]
    fn test_clear_full_rows_none() {
        let mut board = Board::new(4, 4);
        board.set_cell(0, 3, RED);
        let before = board.clone();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_full_rows_cascades_consecutive() {
        let mut board = Board::new(4, 6);
        board.set_cell(0, 1, BLUE);
        board.set_cell(3, 2, RED);
        fill_row(&mut board, 3, RED);
        fill_row(&mut board, 4, RED);
        fill_row(&mut board, 5, BLUE);

        assert_eq!(board.clear_full_rows(), 3);

        for y in 0..3 {
            assert_eq!(row_cells(&board, y), vec![Cell::Empty; 4], "row {y}");
        }
        assert_eq!(
            row_cells(&board, 4),
            vec![BLUE, Cell::Empty, Cell::Empty, Cell::Empty]
        );
        assert_eq!(
            row_cells(&board, 5),
            vec![Cell::Empty, Cell::Empty, Cell::Empty, RED]
        );
    }

    #[test]
    fn test_clear_full_rows_non_adjacent() {
        let mut board = Board::new(3, 5);
        fill_row(&mut board, 1, RED);
        board.set_cell(1, 2, BLUE);
        fill_row(&mut board, 3, RED);
        board.set_cell(2, 4, BLUE);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.filled_cells(), 2);
        assert_eq!(row_cells(&board, 3), vec![Cell::Empty, BLUE, Cell::Empty]);
        assert_eq!(row_cells(&board, 4), vec![Cell::Empty, Cell::Empty, BLUE]);
    }

    #[test]
    fn test_clear_full_rows_whole_board() {
        let mut board = Board::new(3, 4);
        for y in 0..4 {
            fill_row(&mut board, y, RED);
        }
        assert_eq!(board.clear_full_rows(), 4);
        assert_eq!(board, Board::new(3, 4));
    }

    #[test]
    fn test_fill_piece_writes_color_only() {
        let mut board = Board::new(10, 20);
        let piece = Piece::new(
            PieceKind::O,
            BlockColor::Yellow,
            PiecePosition::new(4, 18),
        );
        board.fill_piece(&piece);

        let yellow = Cell::Filled(BlockColor::Yellow);
        assert_eq!(board.cell(4, 18), yellow);
        assert_eq!(board.cell(5, 18), yellow);
        assert_eq!(board.cell(4, 19), yellow);
        assert_eq!(board.cell(5, 19), yellow);
        assert_eq!(board.filled_cells(), 4);
    }

    #[test]
    fn test_seed_random_fill_respects_start_row() {
        let mut board = Board::new(10, 20);
        let mut rng = Pcg32::seed_from_u64(42);
        board.seed_random_fill(1.0, 15, &[BlockColor::Gray], &mut rng);

        for y in 0..15 {
            assert!(row_cells(&board, y).iter().all(|c| c.is_empty()), "row {y}");
        }
        for y in 15..20 {
            assert!(board.is_row_full(y), "row {y}");
        }
        assert_eq!(board.cell(0, 19), Cell::Filled(BlockColor::Gray));
    }

    #[test]
    fn test_seed_random_fill_zero_probability() {
        let mut board = Board::new(10, 20);
        let mut rng = Pcg32::seed_from_u64(1);
        board.seed_random_fill(0.0, 0, &[BlockColor::Red], &mut rng);
        assert_eq!(board.filled_cells(), 0);
    }

    #[test]
    fn test_seed_random_fill_is_deterministic_and_partial() {
        let palette = [BlockColor::Red, BlockColor::Green, BlockColor::Blue];
        let mut a = Board::new(10, 20);
        let mut b = Board::new(10, 20);
        a.seed_random_fill(0.5, 10, &palette, &mut Pcg32::seed_from_u64(9));
        b.seed_random_fill(0.5, 10, &palette, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a, b);

        let filled = a.filled_cells();
        assert!(filled > 0 && filled < 100, "filled = {filled}");
        assert!(a.rows().flat_map(BoardRow::cells).all(|cell| match cell {
            Cell::Empty => true,
            Cell::Filled(color) => palette.contains(color),
        }));
    }

    #[test]
    fn test_seed_start_row_past_bottom_is_noop() {
        let mut board = Board::new(4, 4);
        board.seed_random_fill(1.0, 10, &[BlockColor::Red], &mut Pcg32::seed_from_u64(0));
        assert_eq!(board.filled_cells(), 0);
    }

    #[test]
    fn test_cell_serialization() {
        assert_eq!(serde_json::to_string(&Cell::Empty).unwrap(), "null");
        assert_eq!(serde_json::to_string(&RED).unwrap(), "\"red\"");

        let mut board = Board::new(2, 2);
        board.set_cell(1, 1, BLUE);
        assert_eq!(
            serde_json::to_string(&board).unwrap(),
            "[[null,null],[null,\"blue\"]]"
        );
    }
}
