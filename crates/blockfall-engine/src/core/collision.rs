use super::{board::Board, shape::Orientation};

/// Returns whether `orientation` anchored at `(x, y)` fits on `board`.
///
/// An occupied cell of the matrix blocks placement when its column falls
/// outside `0..width`, when its row is at or below the bottom edge, or when it
/// overlaps a filled board cell. Rows above the top edge (`y < 0`) never
/// collide, so pieces may hang partly above the visible board.
///
/// The check has no side effects and never panics, so it is safe to call for
/// speculative positions (movement previews, rotation kicks).
///
/// ```
/// use blockfall_engine::{Board, PieceKind, can_place};
///
/// let board = Board::new(10, 20);
/// let i = PieceKind::I.template();
/// assert!(can_place(&board, &i, 6, 0));
/// assert!(!can_place(&board, &i, 7, 0));
/// assert!(!can_place(&board, &i, 0, 20));
/// assert!(can_place(&board, &i, 0, -3));
/// ```
#[must_use]
pub fn can_place(board: &Board, orientation: &Orientation, x: i32, y: i32) -> bool {
    orientation.occupied_cells().all(|(dx, dy)| {
        let Ok(col) = usize::try_from(x.saturating_add(dx.into())) else {
            return false;
        };
        if col >= board.width() {
            return false;
        }
        let Ok(row) = usize::try_from(y.saturating_add(dy.into())) else {
            return true;
        };
        row < board.height() && board.cell(col, row).is_empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        board::Cell,
        shape::{BlockColor, PieceKind},
    };

    const GRAY: Cell = Cell::Filled(BlockColor::Gray);

    #[test]
    fn test_empty_board_interior() {
        let board = Board::new(10, 20);
        for kind in PieceKind::ALL {
            assert!(can_place(&board, &kind.template(), 3, 5), "{kind:?}");
        }
    }

    #[test]
    fn test_side_walls() {
        let board = Board::new(10, 20);
        let o = PieceKind::O.template();
        assert!(can_place(&board, &o, 0, 0));
        assert!(!can_place(&board, &o, -1, 0));
        assert!(can_place(&board, &o, 8, 0));
        assert!(!can_place(&board, &o, 9, 0));
    }

    #[test]
    fn test_floor() {
        let board = Board::new(10, 20);
        let o = PieceKind::O.template();
        assert!(can_place(&board, &o, 4, 18));
        assert!(!can_place(&board, &o, 4, 19));
    }

    #[test]
    fn test_above_top_never_collides() {
        let mut board = Board::new(10, 20);
        let vertical_i = PieceKind::I.template().rotated_clockwise();
        assert!(can_place(&board, &vertical_i, 0, -3));
        assert!(can_place(&board, &vertical_i, 0, -100));

        // only the visible part is checked against filled cells
        board.set_cell(0, 0, GRAY);
        assert!(can_place(&board, &vertical_i, 0, -4));
        assert!(!can_place(&board, &vertical_i, 0, -3));
        // walls still apply above the board
        assert!(!can_place(&board, &vertical_i, 10, -3));
    }

    #[test]
    fn test_filled_cells_block_only_occupied_matrix_cells() {
        let mut board = Board::new(10, 20);
        let t = PieceKind::T.template();
        // T = [[0,1,0],[1,1,1]]: the top-left matrix cell is empty
        board.set_cell(3, 5, GRAY);
        assert!(can_place(&board, &t, 3, 5));
        board.set_cell(4, 5, GRAY);
        assert!(!can_place(&board, &t, 3, 5));
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let board = Board::new(10, 20);
        let i = PieceKind::I.template();
        assert!(!can_place(&board, &i, i32::MAX, 0));
        assert!(!can_place(&board, &i, i32::MIN, 0));
        assert!(!can_place(&board, &i, 0, i32::MAX));
    }

    #[test]
    fn test_boundary_collision_is_monotonic() {
        let board = Board::new(10, 20);
        for kind in PieceKind::ALL {
            let mut orientation = kind.template();
            for _ in 0..4 {
                // right wall
                let right = (0..20).find(|&x| !can_place(&board, &orientation, x, 5));
                if let Some(x0) = right {
                    assert!((x0..x0 + 10).all(|x| !can_place(&board, &orientation, x, 5)));
                }
                // left wall
                assert!(!can_place(&board, &orientation, -1, 5));
                assert!((-10..-1).all(|x| !can_place(&board, &orientation, x, 5)));
                // floor
                let bottom = (0..40).find(|&y| !can_place(&board, &orientation, 3, y));
                let y0 = bottom.unwrap();
                assert!((y0..y0 + 10).all(|y| !can_place(&board, &orientation, 3, y)));

                orientation = orientation.rotated_clockwise();
            }
        }
    }
}
