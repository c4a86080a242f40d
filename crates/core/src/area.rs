//! Area clears shared by bomb pieces and bomb abilities.
//!
//! These are pure: each takes a board and returns a new one of the same size.

use crate::board::Board;

/// Whether floating cells fall after an area clear.
///
/// Early bomb variants settled the board afterwards; later ones leave the
/// surviving cells exactly where they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaGravity {
    Settle,
    #[default]
    Freeze,
}

/// Empty every cell whose row or column lies within `half_width` of the
/// centre. Returns the new board and the number of filled cells removed.
pub fn cross_clear(
    board: &Board,
    cx: i32,
    cy: i32,
    half_width: u32,
    gravity: AreaGravity,
) -> (Board, usize) {
    let hw = half_width as i32;
    clear_where(board, gravity, |x, y| {
        (y - cy).abs() <= hw || (x - cx).abs() <= hw
    })
}

/// Empty every cell within Euclidean distance `radius` of the centre.
pub fn circle_clear(
    board: &Board,
    cx: i32,
    cy: i32,
    radius: f64,
    gravity: AreaGravity,
) -> (Board, usize) {
    let r2 = radius * radius;
    clear_where(board, gravity, |x, y| {
        let dx = (x - cx) as f64;
        let dy = (y - cy) as f64;
        dx * dx + dy * dy <= r2
    })
}

fn clear_where(
    board: &Board,
    gravity: AreaGravity,
    hit: impl Fn(i32, i32) -> bool,
) -> (Board, usize) {
    let mut next = board.clone();
    let mut removed = 0;
    for y in 0..board.height() as i32 {
        for x in 0..board.width() as i32 {
            if hit(x, y) && board.is_occupied(x, y) {
                next.set(x, y, None);
                removed += 1;
            }
        }
    }
    if gravity == AreaGravity::Settle {
        next = settle(&next);
    }
    (next, removed)
}

/// Let every filled cell fall to the lowest empty cell in its column,
/// keeping the column's top-to-bottom order.
pub fn settle(board: &Board) -> Board {
    let mut next = board.clone();
    next.clear();
    let height = board.height() as i32;
    for x in 0..board.width() as i32 {
        let mut write_y = height - 1;
        for y in (0..height).rev() {
            if let Some(Some(kind)) = board.get(x, y) {
                next.set(x, write_y, Some(kind));
                write_y -= 1;
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_clear_removes_row_and_column_band() {
        let board = Board::from_ascii(&["####", "####", "####", "####"]).unwrap();
        let (next, removed) = cross_clear(&board, 1, 2, 0, AreaGravity::Freeze);

        assert_eq!(removed, 7);
        assert!(next.is_row_empty(2));
        for y in 0..4 {
            assert_eq!(next.get(1, y), Some(None));
        }
        assert_eq!(next.get(0, 0), Some(Some(crate::types::PieceKind::I)));
    }

    #[test]
    fn circle_clear_respects_radius() {
        let board = Board::from_ascii(&[".....", ".....", "#####", "#####", "#####"]).unwrap();
        let (next, removed) = circle_clear(&board, 2, 3, 1.0, AreaGravity::Freeze);
        // centre plus its four neighbours that are filled
        assert_eq!(removed, 5);
        assert_eq!(next.get(1, 2), Some(Some(crate::types::PieceKind::I)));
        assert_eq!(next.get(2, 2), Some(None));
    }

    #[test]
    fn settle_drops_floating_cells() {
        let board = Board::from_ascii(&["#...", "....", ".#..", "...."]).unwrap();
        let next = settle(&board);
        assert_eq!(next.count_filled(), 2);
        assert!(next.is_occupied(0, 3));
        assert!(next.is_occupied(1, 3));
    }

    #[test]
    fn settle_gravity_option_applies() {
        let board = Board::from_ascii(&["#...", "#...", "#...", "####"]).unwrap();
        let (frozen, _) = cross_clear(&board, 3, 2, 0, AreaGravity::Freeze);
        let (settled, _) = cross_clear(&board, 3, 2, 0, AreaGravity::Settle);
        assert_eq!(frozen.get(0, 0), Some(Some(crate::types::PieceKind::I)));
        assert_eq!(settled.get(0, 0), Some(None));
        assert_eq!(settled.column_height(0), 3);
    }
}
