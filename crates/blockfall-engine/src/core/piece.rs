use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{
    board::Board,
    collision::can_place,
    shape::{BlockColor, Orientation, PieceKind},
};

/// Horizontal offsets tried, in order, when committing a rotation.
const KICK_OFFSETS: [i32; 3] = [0, 1, -1];

/// The active (falling) piece.
///
/// Pieces are immutable values: movement and rotation return new `Piece`s,
/// which the session checks against the board before committing.
///
/// # Coordinate System
///
/// - `position` is the top-left corner of the orientation matrix in board coordinates
/// - `x` grows to the right, `y` grows downwards
/// - both are signed so that out-of-board candidates (e.g. `x = -1` during a
///   wall kick) can be represented and rejected
///
/// # Example
///
/// ```
/// use blockfall_engine::{BlockColor, Piece, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::I, BlockColor::Cyan, 10);
/// assert_eq!((piece.position().x(), piece.position().y()), (3, 0));
///
/// let moved = piece.left().down();
/// assert_eq!((moved.position().x(), moved.position().y()), (2, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Piece {
    kind: PieceKind,
    orientation: Orientation,
    color: BlockColor,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece in its base orientation at `position`.
    #[must_use]
    pub const fn new(kind: PieceKind, color: BlockColor, position: PiecePosition) -> Self {
        Self {
            kind,
            orientation: kind.template(),
            color,
            position,
        }
    }

    /// Creates a piece at the spawn position of a board `board_width` columns wide.
    ///
    /// The anchor is horizontally centered (`board_width / 2 - width / 2`) on row 0.
    #[must_use]
    pub fn spawn(kind: PieceKind, color: BlockColor, board_width: usize) -> Self {
        let x = (board_width / 2).saturating_sub(kind.template().width() / 2);
        Self::new(kind, color, PiecePosition::new(to_coord(x), 0))
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    #[must_use]
    pub const fn color(&self) -> BlockColor {
        self.color
    }

    #[must_use]
    pub const fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub const fn with_position(self, position: PiecePosition) -> Self {
        Self { position, ..self }
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.with_position(self.position.offset(-1, 0))
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.with_position(self.position.offset(1, 0))
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.with_position(self.position.offset(0, 1))
    }

    /// Returns the piece rotated 90° clockwise around its anchor, without any kick.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        Self {
            orientation: self.orientation.rotated_clockwise(),
            ..*self
        }
    }

    /// Returns the rotated piece at every kick position, in the order they are tried:
    /// same position, one column right, one column left.
    #[must_use]
    pub fn rotation_candidates(&self) -> ArrayVec<Self, 3> {
        let rotated = self.rotated();
        KICK_OFFSETS
            .iter()
            .map(|&dx| rotated.with_position(rotated.position.offset(dx, 0)))
            .collect()
    }

    /// Rotates clockwise, applying the first kick that fits on `board`.
    ///
    /// Returns `None` when no candidate fits; the caller keeps the current piece.
    #[must_use]
    pub fn kicked_rotation(&self, board: &Board) -> Option<Self> {
        self.rotation_candidates()
            .into_iter()
            .find(|piece| piece.fits(board))
    }

    /// Returns whether the piece can be placed on `board` at its current position.
    #[must_use]
    pub fn fits(&self, board: &Board) -> bool {
        can_place(
            board,
            &self.orientation,
            self.position.x(),
            self.position.y(),
        )
    }

    /// Returns the piece moved down as far as it fits.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> Self {
        let mut piece = *self;
        while piece.down().fits(board) {
            piece = piece.down();
        }
        piece
    }

    /// Iterates over the board coordinates covered by the piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let PiecePosition { x, y } = self.position;
        self.orientation
            .occupied_cells()
            .map(move |(dx, dy)| (x.saturating_add(dx.into()), y.saturating_add(dy.into())))
    }
}

fn to_coord(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Anchor of a piece: the board coordinate of its matrix's top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::Cell;

    fn piece_at(kind: PieceKind, x: i32, y: i32) -> Piece {
        Piece::new(kind, BlockColor::White, PiecePosition::new(x, y))
    }

    #[test]
    fn test_spawn_is_centered_on_top_row() {
        let expected = [
            (PieceKind::I, 3),
            (PieceKind::O, 4),
            (PieceKind::T, 4),
            (PieceKind::S, 4),
            (PieceKind::Z, 4),
            (PieceKind::J, 4),
            (PieceKind::L, 4),
        ];
        for (kind, x) in expected {
            let piece = Piece::spawn(kind, BlockColor::Red, 10);
            assert_eq!(piece.position(), PiecePosition::new(x, 0), "{kind:?}");
            assert_eq!(*piece.orientation(), kind.template());
        }
    }

    #[test]
    fn test_spawn_on_odd_width_board() {
        // 11 / 2 - 4 / 2 = 3
        let piece = Piece::spawn(PieceKind::I, BlockColor::Red, 11);
        assert_eq!(piece.position().x(), 3);
        // 11 / 2 - 3 / 2 = 4
        let piece = Piece::spawn(PieceKind::L, BlockColor::Red, 11);
        assert_eq!(piece.position().x(), 4);
    }

    #[test]
    fn test_movement_keeps_orientation() {
        let piece = piece_at(PieceKind::T, 4, 4);
        assert_eq!(piece.left().position(), PiecePosition::new(3, 4));
        assert_eq!(piece.right().position(), PiecePosition::new(5, 4));
        assert_eq!(piece.down().position(), PiecePosition::new(4, 5));
        assert_eq!(piece.left().orientation(), piece.orientation());
    }

    #[test]
    fn test_rotated_four_times_is_original() {
        for kind in PieceKind::ALL {
            let piece = piece_at(kind, 3, 3);
            let rotated = piece.rotated().rotated().rotated().rotated();
            assert_eq!(rotated, piece);
        }
    }

    #[test]
    fn test_rotation_candidates_order() {
        let piece = piece_at(PieceKind::T, 4, 2);
        let xs: Vec<_> = piece
            .rotation_candidates()
            .iter()
            .map(|p| p.position().x())
            .collect();
        assert_eq!(xs, vec![4, 5, 3]);
        assert!(
            piece
                .rotation_candidates()
                .iter()
                .all(|p| p.position().y() == 2 && *p.orientation() == piece.rotated().orientation)
        );
    }

    #[test]
    fn test_kicked_rotation_in_open_space_keeps_position() {
        let board = Board::new(10, 20);
        let piece = piece_at(PieceKind::J, 4, 5);
        assert_eq!(piece.kicked_rotation(&board), Some(piece.rotated()));
    }

    #[test]
    fn test_kicked_rotation_kicks_right() {
        let mut board = Board::new(10, 20);
        // vertical I at x = 0 would cover (0, 7); blocked
        board.set_cell(0, 7, Cell::Filled(BlockColor::Gray));
        let piece = piece_at(PieceKind::I, 0, 5);

        let rotated = piece.kicked_rotation(&board).unwrap();
        assert_eq!(rotated.position(), PiecePosition::new(1, 5));
        assert_eq!(rotated.orientation().height(), 4);
    }

    #[test]
    fn test_kicked_rotation_kicks_left_at_right_wall() {
        let board = Board::new(10, 20);
        // T rotated once is 2 wide; at x = 8 it touches the right wall
        let piece = piece_at(PieceKind::T, 8, 5).rotated();
        assert!(piece.fits(&board));

        let rotated = piece.kicked_rotation(&board).unwrap();
        assert_eq!(rotated.position(), PiecePosition::new(7, 5));
        assert_eq!(rotated.orientation().width(), 3);
    }

    #[test]
    fn test_kicked_rotation_rejected_when_no_candidate_fits() {
        let mut board = Board::new(10, 20);
        board.set_cell(1, 10, Cell::Filled(BlockColor::Gray));
        let piece = piece_at(PieceKind::I, 0, 10).rotated();
        assert!(piece.fits(&board));

        assert_eq!(piece.kicked_rotation(&board), None);
    }

    #[test]
    fn test_drop_position_lands_on_floor_and_stack() {
        let mut board = Board::new(10, 20);
        let piece = Piece::spawn(PieceKind::I, BlockColor::Cyan, 10);
        assert_eq!(piece.drop_position(&board).position(), PiecePosition::new(3, 19));

        board.set_cell(5, 12, Cell::Filled(BlockColor::Gray));
        assert_eq!(piece.drop_position(&board).position(), PiecePosition::new(3, 11));
    }

    #[test]
    fn test_occupied_positions_are_offset_by_anchor() {
        let piece = piece_at(PieceKind::S, 2, 7);
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, vec![(3, 7), (4, 7), (2, 8), (3, 8)]);
    }

    #[test]
    fn test_piece_serialization() {
        let piece = piece_at(PieceKind::O, 4, 0);
        let json = serde_json::to_value(piece).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "O",
                "orientation": [[1, 1], [1, 1]],
                "color": "white",
                "position": { "x": 4, "y": 0 },
            })
        );
    }
}
