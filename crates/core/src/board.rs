//! Board module - manages the game grid
//!
//! The board is a `width x height` grid (10x20 by default) where each cell is
//! empty or tagged with a piece kind. Storage is a flat row-major vector; the
//! dimensions are fixed at construction and no operation ever changes them.
//!
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Negative y addresses the hidden area above the board, which pieces may
//! occupy while spawning but which is never stored.

use thiserror::Error;

use crate::types::{Cell, PieceKind, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};

/// Malformed board input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: usize, height: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown cell character {0:?}")]
    BadCell(char),
}

impl BoardError {
    pub fn code(&self) -> &'static str {
        match self {
            BoardError::ZeroDimension { .. } => "zero_dimension",
            BoardError::RaggedRow { .. } => "ragged_row",
            BoardError::BadCell(_) => "bad_cell",
        }
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::ZeroDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width * height],
        })
    }

    /// Empty 10x20 board
    pub fn standard() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            cells: vec![None; DEFAULT_BOARD_WIDTH * DEFAULT_BOARD_HEIGHT],
        }
    }

    /// Build from rows (top row first)
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(BoardError::ZeroDimension { width, height });
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != width {
                return Err(BoardError::RaggedRow {
                    row,
                    found: cols.len(),
                    expected: width,
                });
            }
            cells.extend(cols);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build from text rows: `.` is empty, a piece letter fills with that
    /// kind and `#` fills with `I`.
    ///
    /// ```
    /// use versus_tetris_core::Board;
    ///
    /// let board = Board::from_ascii(&["....", "#.T#"]).unwrap();
    /// assert_eq!(board.width(), 4);
    /// assert_eq!(board.count_filled(), 3);
    /// ```
    pub fn from_ascii(lines: &[&str]) -> Result<Self, BoardError> {
        let mut rows = Vec::with_capacity(lines.len());
        for line in lines {
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                let cell = match ch {
                    '.' => None,
                    '#' => Some(PieceKind::I),
                    other => Some(
                        PieceKind::from_str(&other.to_string())
                            .ok_or(BoardError::BadCell(other))?,
                    ),
                };
                row.push(cell);
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// Rows as nested vectors (top row first)
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.width).map(<[Cell]>::to_vec).collect()
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is inside the board and empty
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is inside the board and filled
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Collision rule for piece cells: horizontally in bounds, not below the
    /// floor, and empty when on the board. Rows above the board are free.
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        if x < 0 || x as usize >= self.width || y >= self.height as i32 {
            return false;
        }
        y < 0 || self.is_valid(x, y)
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        y < self.height && self.row(y).iter().all(Option::is_some)
    }

    pub fn is_row_empty(&self, y: usize) -> bool {
        y < self.height && self.row(y).iter().all(Option::is_none)
    }

    /// Clear all full rows and return the row indices that were cleared
    /// (bottom to top). Remaining rows shift down; empty rows pad the top.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let mut cleared_rows = Vec::new();
        let width = self.width;
        let mut write_y = self.height;

        for read_y in (0..self.height).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared_rows
    }

    /// Copy of this board with full rows cleared, plus the number cleared
    pub fn with_lines_cleared(&self) -> (Board, usize) {
        let mut next = self.clone();
        let cleared = next.clear_full_rows().len();
        (next, cleared)
    }

    /// Merge cells into the board. Cells above row 0 or outside the board
    /// are discarded. Returns the number of cells written.
    pub fn lock_cells<I>(&mut self, cells: I, kind: PieceKind) -> usize
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut written = 0;
        for (x, y) in cells {
            if self.set(x, y, Some(kind)) {
                written += 1;
            }
        }
        written
    }

    /// Height of a column (distance from the floor to its topmost filled cell)
    pub fn column_height(&self, x: usize) -> usize {
        (0..self.height)
            .find(|&y| self.cells[y * self.width + x].is_some())
            .map(|top| self.height - top)
            .unwrap_or(0)
    }

    /// Height of the tallest column
    pub fn max_height(&self) -> usize {
        (0..self.width)
            .map(|x| self.column_height(x))
            .max()
            .unwrap_or(0)
    }

    pub fn count_filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// True when both boards have the same width and height
    pub fn same_dimensions(&self, other: &Board) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::standard();
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            Board::new(0, 20).unwrap_err(),
            BoardError::ZeroDimension {
                width: 0,
                height: 20
            }
        );
        assert!(Board::new(4, 0).is_err());
        assert_eq!(Board::from_rows(vec![]).unwrap_err().code(), "zero_dimension");
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Board::from_rows(vec![vec![None; 3], vec![None; 2]]).unwrap_err();
        assert_eq!(
            err,
            BoardError::RaggedRow {
                row: 1,
                found: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn test_is_free_allows_hidden_rows() {
        let mut board = Board::new(4, 4).unwrap();
        board.set(1, 0, Some(PieceKind::T));

        assert!(board.is_free(1, -1));
        assert!(board.is_free(0, -3));
        assert!(!board.is_free(1, 0));
        assert!(!board.is_free(-1, -1));
        assert!(!board.is_free(4, 0));
        assert!(!board.is_free(0, 4));
    }

    #[test]
    fn test_clear_full_rows_pads_top() {
        let mut board = Board::from_ascii(&["....", "T...", "####", "..S.", "####"]).unwrap();

        let cleared = board.clear_full_rows();
        assert_eq!(cleared, vec![4, 2]);
        assert_eq!(board.height(), 5);
        assert!(board.is_row_empty(0));
        assert!(board.is_row_empty(1));
        assert!(board.is_row_empty(2));
        assert_eq!(board.get(0, 3), Some(Some(PieceKind::T)));
        assert_eq!(board.get(2, 4), Some(Some(PieceKind::S)));
    }

    #[test]
    fn test_column_height() {
        let board = Board::from_ascii(&["....", ".#..", ".#..", "##.."]).unwrap();
        assert_eq!(board.column_height(0), 1);
        assert_eq!(board.column_height(1), 3);
        assert_eq!(board.column_height(2), 0);
        assert_eq!(board.max_height(), 3);
    }

    #[test]
    fn test_lock_cells_discards_hidden_rows() {
        let mut board = Board::new(4, 4).unwrap();
        let written = board.lock_cells([(0, -1), (0, 0), (1, 0)], PieceKind::J);
        assert_eq!(written, 2);
        assert_eq!(board.count_filled(), 2);
    }
}
