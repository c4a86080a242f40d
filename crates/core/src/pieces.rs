//! Pieces module - tetromino shapes, ability-installed custom shapes and
//! rotation.
//!
//! Standard pieces look their cells up in per-kind rotation tables. Abilities
//! can replace the falling piece with an arbitrary matrix (dominoes, hollow
//! rings); those rotate by transposing the matrix. A [`PieceShape`] records
//! which of the two a piece is, so rotation never has to guess.
//!
//! Reference for the tables and kicks: https://tetris.wiki/SRS

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::board::Board;
use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i32, i32);

/// Occupied offsets of a piece (at most a full 4x4 matrix)
pub type PieceCells = ArrayVec<MinoOffset, 16>;

/// Rotation states every piece cycles through
pub const NUM_ROTATIONS: u8 = 4;

/// Largest custom shape side
pub const MAX_SHAPE_SIDE: usize = 4;

/// Get the mino offsets for a standard piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> [MinoOffset; 4] {
    use Rotation::*;
    match (kind, rotation) {
        (PieceKind::I, North) => [(0, 1), (1, 1), (2, 1), (3, 1)],
        (PieceKind::I, East) => [(2, 0), (2, 1), (2, 2), (2, 3)],
        (PieceKind::I, South) => [(0, 2), (1, 2), (2, 2), (3, 2)],
        (PieceKind::I, West) => [(1, 0), (1, 1), (1, 2), (1, 3)],

        (PieceKind::O, _) => [(1, 0), (2, 0), (1, 1), (2, 1)],

        (PieceKind::T, North) => [(1, 0), (0, 1), (1, 1), (2, 1)],
        (PieceKind::T, East) => [(1, 0), (1, 1), (2, 1), (1, 2)],
        (PieceKind::T, South) => [(0, 1), (1, 1), (2, 1), (1, 2)],
        (PieceKind::T, West) => [(1, 0), (0, 1), (1, 1), (1, 2)],

        (PieceKind::S, North) => [(1, 0), (2, 0), (0, 1), (1, 1)],
        (PieceKind::S, East) => [(1, 0), (1, 1), (2, 1), (2, 2)],
        (PieceKind::S, South) => [(1, 1), (2, 1), (0, 2), (1, 2)],
        (PieceKind::S, West) => [(0, 0), (0, 1), (1, 1), (1, 2)],

        (PieceKind::Z, North) => [(0, 0), (1, 0), (1, 1), (2, 1)],
        (PieceKind::Z, East) => [(2, 0), (1, 1), (2, 1), (1, 2)],
        (PieceKind::Z, South) => [(0, 1), (1, 1), (1, 2), (2, 2)],
        (PieceKind::Z, West) => [(1, 0), (0, 1), (1, 1), (0, 2)],

        (PieceKind::J, North) => [(0, 0), (0, 1), (1, 1), (2, 1)],
        (PieceKind::J, East) => [(1, 0), (2, 0), (1, 1), (1, 2)],
        (PieceKind::J, South) => [(0, 1), (1, 1), (2, 1), (2, 2)],
        (PieceKind::J, West) => [(1, 0), (1, 1), (0, 2), (1, 2)],

        (PieceKind::L, North) => [(2, 0), (0, 1), (1, 1), (2, 1)],
        (PieceKind::L, East) => [(1, 0), (1, 1), (1, 2), (2, 2)],
        (PieceKind::L, South) => [(0, 1), (1, 1), (2, 1), (0, 2)],
        (PieceKind::L, West) => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Malformed custom shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape matrix has no occupied cells")]
    Empty,
    #[error("shape matrix is {rows}x{cols}, limit is 4x4")]
    TooLarge { rows: usize, cols: usize },
    #[error("shape matrix rows have different lengths")]
    Ragged,
}

impl ShapeError {
    pub fn code(&self) -> &'static str {
        match self {
            ShapeError::Empty => "empty_shape",
            ShapeError::TooLarge { .. } => "shape_too_large",
            ShapeError::Ragged => "ragged_shape",
        }
    }
}

/// A raw occupancy matrix of at most 4x4 cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    rows: u8,
    cols: u8,
    bits: [[bool; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl ShapeMatrix {
    /// Build from boolean rows
    pub fn from_rows(rows: &[&[bool]]) -> Result<Self, ShapeError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(ShapeError::Ragged);
        }
        if n_rows > MAX_SHAPE_SIDE || n_cols > MAX_SHAPE_SIDE {
            return Err(ShapeError::TooLarge {
                rows: n_rows,
                cols: n_cols,
            });
        }

        let mut bits = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (r, row) in rows.iter().enumerate() {
            bits[r][..row.len()].copy_from_slice(row);
        }
        let matrix = Self {
            rows: n_rows as u8,
            cols: n_cols as u8,
            bits,
        };
        if matrix.cells().is_empty() {
            return Err(ShapeError::Empty);
        }
        Ok(matrix)
    }

    /// Build from text rows where `#` is occupied
    ///
    /// ```
    /// use versus_tetris_core::ShapeMatrix;
    ///
    /// let domino = ShapeMatrix::from_strs(&["##"]).unwrap();
    /// assert_eq!(domino.cells().len(), 2);
    /// assert!(ShapeMatrix::from_strs(&[".."]).is_err());
    /// ```
    pub fn from_strs(rows: &[&str]) -> Result<Self, ShapeError> {
        let owned: Vec<Vec<bool>> = rows
            .iter()
            .map(|r| r.chars().map(|c| c == '#').collect())
            .collect();
        let borrowed: Vec<&[bool]> = owned.iter().map(Vec::as_slice).collect();
        Self::from_rows(&borrowed)
    }

    /// Horizontal two-cell domino
    pub fn domino() -> Self {
        let mut bits = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        bits[0][0] = true;
        bits[0][1] = true;
        Self {
            rows: 1,
            cols: 2,
            bits,
        }
    }

    /// 4x4 ring with an empty 2x2 centre
    pub fn hollow() -> Self {
        let mut bits = [[true; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        bits[1][1] = false;
        bits[1][2] = false;
        bits[2][1] = false;
        bits[2][2] = false;
        Self {
            rows: 4,
            cols: 4,
            bits,
        }
    }

    /// The 4x4 table matrix of a standard piece
    pub fn standard(kind: PieceKind, rotation: Rotation) -> Self {
        let mut bits = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (dx, dy) in get_shape(kind, rotation) {
            bits[dy as usize][dx as usize] = true;
        }
        Self {
            rows: 4,
            cols: 4,
            bits,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.bits[row][col]
    }

    /// Occupied cells as (x, y) offsets
    pub fn cells(&self) -> PieceCells {
        let mut out = PieceCells::new();
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                if self.bits[r][c] {
                    out.push((c as i32, r as i32));
                }
            }
        }
        out
    }

    /// Rotate 90° clockwise: `new[r][c] = old[rows - 1 - c][r]`
    pub fn rotate_cw(&self) -> Self {
        let (rows, cols) = (self.rows(), self.cols());
        let mut bits = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (r, row) in bits.iter_mut().enumerate().take(cols) {
            for (c, bit) in row.iter_mut().enumerate().take(rows) {
                *bit = self.bits[rows - 1 - c][r];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            bits,
        }
    }

    /// Rotate 90° counter-clockwise: `new[r][c] = old[c][cols - 1 - r]`
    pub fn rotate_ccw(&self) -> Self {
        let (rows, cols) = (self.rows(), self.cols());
        let mut bits = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (r, row) in bits.iter_mut().enumerate().take(cols) {
            for (c, bit) in row.iter_mut().enumerate().take(rows) {
                *bit = self.bits[c][cols - 1 - r];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            bits,
        }
    }
}

/// How a piece's cells are defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceShape {
    /// Table lookup by kind and rotation
    Standard { rotation: Rotation },
    /// Raw matrix installed by an ability. `turns` counts clockwise quarter
    /// turns since installation (mod 4).
    Custom { matrix: ShapeMatrix, turns: u8 },
}

/// A falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: PieceShape,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Standard piece in its spawn orientation at (x, y)
    pub fn new(kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            shape: PieceShape::Standard {
                rotation: Rotation::North,
            },
            x,
            y,
        }
    }

    /// Standard piece at the spawn anchor of a board `board_width` wide
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        Self::new(kind, spawn_x(board_width), 0)
    }

    /// Same position and kind with a custom matrix
    pub fn with_custom_shape(&self, matrix: ShapeMatrix) -> Self {
        Self {
            shape: PieceShape::Custom { matrix, turns: 0 },
            ..*self
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.shape, PieceShape::Custom { .. })
    }

    /// Rotation index in `0..4`
    pub fn rotation_index(&self) -> u8 {
        match self.shape {
            PieceShape::Standard { rotation } => rotation.index(),
            PieceShape::Custom { turns, .. } => turns % NUM_ROTATIONS,
        }
    }

    /// Occupancy matrix for the current rotation
    pub fn matrix(&self) -> ShapeMatrix {
        match self.shape {
            PieceShape::Standard { rotation } => ShapeMatrix::standard(self.kind, rotation),
            PieceShape::Custom { matrix, .. } => matrix,
        }
    }

    /// Occupied offsets relative to (x, y)
    pub fn cells(&self) -> PieceCells {
        match self.shape {
            PieceShape::Standard { rotation } => {
                get_shape(self.kind, rotation).into_iter().collect()
            }
            PieceShape::Custom { matrix, .. } => matrix.cells(),
        }
    }

    /// Occupied board coordinates
    pub fn board_cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x, y) = (self.x, self.y);
        self.cells().into_iter().map(move |(dx, dy)| (x + dx, y + dy))
    }

    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn at(&self, x: i32, y: i32) -> Self {
        Self { x, y, ..*self }
    }

    /// Rotated a quarter turn in place (no kicks)
    pub fn rotated(&self, clockwise: bool) -> Self {
        let shape = match self.shape {
            PieceShape::Standard { rotation } => PieceShape::Standard {
                rotation: if clockwise {
                    rotation.rotate_cw()
                } else {
                    rotation.rotate_ccw()
                },
            },
            PieceShape::Custom { matrix, turns } => PieceShape::Custom {
                matrix: if clockwise {
                    matrix.rotate_cw()
                } else {
                    matrix.rotate_ccw()
                },
                turns: if clockwise {
                    (turns + 1) % NUM_ROTATIONS
                } else {
                    (turns + NUM_ROTATIONS - 1) % NUM_ROTATIONS
                },
            },
        };
        Self { shape, ..*self }
    }

    /// Rotated clockwise `times` quarter turns
    pub fn rotated_cw_times(&self, times: u8) -> Self {
        (0..times % NUM_ROTATIONS).fold(*self, |p, _| p.rotated(true))
    }

    /// Board coordinate of the piece's visual centre (rounded down)
    pub fn center(&self) -> (i32, i32) {
        let cells = self.cells();
        let n = cells.len().max(1) as i32;
        let (sx, sy) = cells
            .iter()
            .fold((0, 0), |(ax, ay), &(dx, dy)| (ax + dx, ay + dy));
        (self.x + sx.div_euclid(n), self.y + sy.div_euclid(n))
    }
}

/// Spawn anchor column for a board of the given width
pub fn spawn_x(board_width: usize) -> i32 {
    (board_width as i32 - 4).max(0) / 2
}

/// True when every occupied cell is on a free board cell (see
/// [`Board::is_free`]).
pub fn is_valid_position(board: &Board, piece: &Piece) -> bool {
    piece.board_cells().all(|(x, y)| board.is_free(x, y))
}

/// Number of rows the piece can fall before resting
pub fn drop_distance(board: &Board, piece: &Piece) -> i32 {
    let mut distance = 0;
    while is_valid_position(board, &piece.moved(0, distance + 1)) {
        distance += 1;
    }
    distance
}

/// The piece moved to its resting row
pub fn hard_drop_position(board: &Board, piece: &Piece) -> Piece {
    piece.moved(0, drop_distance(board, piece))
}

/// Copy of the board with the piece merged in. Cells above row 0 are lost.
pub fn lock_piece(board: &Board, piece: &Piece) -> Board {
    let mut next = board.clone();
    next.lock_cells(piece.board_cells(), piece.kind);
    next
}

/// SRS wall kick data, indexed by [`kick_index`]
pub type KickTable = [[(i32, i32); 5]; 8];

const O_KICKS: KickTable = [[(0, 0); 5]; 8];

const JLSTZ_KICKS: KickTable = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

const I_KICKS: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Custom shapes get a small symmetric nudge set instead of SRS data
const CUSTOM_KICKS: [(i32, i32); 5] = [(0, 0), (-1, 0), (1, 0), (0, -1), (0, -2)];

fn kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

fn kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,
        (Rotation::North, false) => 1,
        (Rotation::East, false) => 2,
        (Rotation::East, true) => 3,
        (Rotation::South, false) => 4,
        (Rotation::South, true) => 5,
        (Rotation::West, false) => 6,
        (Rotation::West, true) => 7,
    }
}

/// Try to rotate a piece, testing kick offsets in order.
/// Returns the rotated piece and the kick that was applied.
pub fn try_rotate(board: &Board, piece: &Piece, clockwise: bool) -> Option<(Piece, (i32, i32))> {
    let rotated = piece.rotated(clockwise);
    let kicks: &[(i32, i32)] = match piece.shape {
        PieceShape::Standard { rotation } => {
            &kick_table(piece.kind)[kick_index(rotation, clockwise)]
        }
        PieceShape::Custom { .. } => &CUSTOM_KICKS,
    };

    kicks.iter().find_map(|&(dx, dy)| {
        let candidate = rotated.moved(dx, dy);
        is_valid_position(board, &candidate).then_some((candidate, (dx, dy)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_matrix_matches_table() {
        let m = ShapeMatrix::standard(PieceKind::T, Rotation::North);
        assert!(m.get(0, 1));
        assert!(m.get(1, 0) && m.get(1, 1) && m.get(1, 2));
        assert_eq!(m.cells().len(), 4);
    }

    #[test]
    fn custom_rotation_transposes() {
        let bar = ShapeMatrix::from_strs(&["###"]).unwrap();
        let cw = bar.rotate_cw();
        assert_eq!((cw.rows(), cw.cols()), (3, 1));
        assert_eq!(cw.cells().as_slice(), &[(0, 0), (0, 1), (0, 2)]);

        let l = ShapeMatrix::from_strs(&["#.", "##"]).unwrap();
        assert_eq!(l.rotate_cw().rotate_ccw(), l);
        assert_eq!(l.rotate_cw().rotate_cw().rotate_cw().rotate_cw(), l);
        // top-left cell moves to top-right on a clockwise turn
        let cw = l.rotate_cw();
        assert!(cw.get(0, 1));
        assert!(!cw.get(1, 1));
    }

    #[test]
    fn shape_errors() {
        assert_eq!(ShapeMatrix::from_strs(&["...."]).unwrap_err(), ShapeError::Empty);
        assert_eq!(
            ShapeMatrix::from_strs(&["#####"]).unwrap_err(),
            ShapeError::TooLarge { rows: 1, cols: 5 }
        );
        assert_eq!(ShapeMatrix::from_strs(&["##", "#"]).unwrap_err(), ShapeError::Ragged);
        assert_eq!(ShapeError::Empty.code(), "empty_shape");
    }

    #[test]
    fn hollow_shape_has_twelve_cells() {
        assert_eq!(ShapeMatrix::hollow().cells().len(), 12);
        assert_eq!(ShapeMatrix::domino().cells().len(), 2);
    }

    #[test]
    fn spawn_above_board_is_valid_on_full_board() {
        let board = Board::from_ascii(&["####"; 4]).unwrap();
        let piece = Piece::new(PieceKind::I, 0, -2);
        assert!(is_valid_position(&board, &piece));
        assert!(!is_valid_position(&board, &piece.moved(0, 1)));
    }

    #[test]
    fn rotation_index_tracks_custom_turns() {
        let p = Piece::new(PieceKind::T, 0, 0).with_custom_shape(ShapeMatrix::domino());
        assert_eq!(p.rotation_index(), 0);
        assert_eq!(p.rotated(true).rotation_index(), 1);
        assert_eq!(p.rotated(false).rotation_index(), 3);
        assert_eq!(p.rotated_cw_times(4), p);
    }

    #[test]
    fn hard_drop_lands_on_floor() {
        let board = Board::standard();
        let piece = Piece::spawn(PieceKind::I, 10);
        let dropped = hard_drop_position(&board, &piece);
        assert_eq!(dropped.y, 18);
        let locked = lock_piece(&board, &dropped);
        assert!(!locked.is_row_full(19));
        assert_eq!(locked.row(19).iter().filter(|c| c.is_some()).count(), 4);
    }

    #[test]
    fn try_rotate_kicks_off_wall() {
        let board = Board::standard();
        // Vertical I hugging the left wall; rotating back to flat needs a kick.
        let piece = Piece {
            kind: PieceKind::I,
            shape: PieceShape::Standard {
                rotation: Rotation::West,
            },
            x: -1,
            y: 5,
        };
        assert!(is_valid_position(&board, &piece));
        let (rotated, kick) = try_rotate(&board, &piece, true).expect("kicked rotation");
        assert_ne!(kick, (0, 0));
        assert!(is_valid_position(&board, &rotated));
    }
}
