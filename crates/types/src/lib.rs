//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used by every crate in the
//! workspace: the engine, the ability effects and the AI opponents. All types
//! are plain data with no behavior beyond parsing and formatting, so they can be
//! handed across the boundary to a host loop or a renderer without pulling in
//! engine code.
//!
//! # Board Dimensions
//!
//! The default playfield is 10 columns by 20 rows. Boards of any non-zero size
//! are supported by the engine; these constants are only the defaults.
//!
//! # Game Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `DROP_INTERVALS[0]` | 1000 | Gravity at level 0 |
//! | `DROP_INTERVAL_FLOOR_MS` | 120 | Fastest gravity |
//!
//! # Star Economy
//!
//! Stars are the in-match currency spent on abilities. A line clear earns
//! `LINE_CLEAR_BASE_STARS[lines]` plus additive bonuses for combos,
//! back-to-back clears, T-spins and perfect clears.
//!
//! # Examples
//!
//! ```
//! use versus_tetris_types::{GameAction, PieceKind, Rotation, DEFAULT_BOARD_HEIGHT};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::from_index(6), Rotation::South);
//!
//! assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
//! assert_eq!(DEFAULT_BOARD_HEIGHT, 20);
//! ```

use serde::Serialize;

/// Default board width in cells (10 columns)
pub const DEFAULT_BOARD_WIDTH: usize = 10;

/// Default board height in cells (20 rows)
pub const DEFAULT_BOARD_HEIGHT: usize = 20;

/// Minimum number of pieces kept in the upcoming-piece queue
pub const QUEUE_PREVIEW_LEN: usize = 5;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Drop intervals by level (milliseconds per row)
///
/// Index 0 = Level 0, Index 8 = Level 8
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Drop interval floor once the table is exhausted (120ms)
pub const DROP_INTERVAL_FLOOR_MS: u32 = 120;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Points are multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Base stars for clearing 0..=4 lines at once
pub const LINE_CLEAR_BASE_STARS: [u32; 5] = [0, 5, 12, 22, 35];

/// Stars added per step of an active combo streak
pub const COMBO_BONUS_STARS: u32 = 3;

/// Stars added when a clear continues a back-to-back chain
pub const BACK_TO_BACK_BONUS_STARS: u32 = 8;

/// T-spin single/double/triple star bonuses
pub const TSPIN_BONUS_STARS: [u32; 3] = [10, 20, 30];

/// Stars added when a clear leaves the board completely empty
pub const PERFECT_CLEAR_BONUS_STARS: u32 = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_table_matches_clear_sizes() {
        assert_eq!(LINE_CLEAR_BASE_STARS[1..], [5, 12, 22, 35]);
        assert_eq!(LINE_CLEAR_BASE_STARS[0], 0);
    }

    #[test]
    fn rotation_index_wraps() {
        assert_eq!(Rotation::from_index(0), Rotation::North);
        assert_eq!(Rotation::from_index(5), Rotation::East);
        assert_eq!(Rotation::West.index(), 3);
    }

    #[test]
    fn piece_kind_round_trips_through_strings() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PieceKind::from_str("x"), None);
    }
}

/// The seven tetromino piece kinds
///
/// Board cells are tagged with the kind of the piece that filled them, including
/// cells injected by abilities (garbage rows, spawned blocks) which pick a kind
/// at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in bag order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use versus_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Rotation states of a standard piece
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: Rotated 90° clockwise (index 1)
/// - **South**: Rotated 180° (index 2)
/// - **West**: Rotated 270° clockwise (index 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation from a table index, taken mod 4
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Table index (0..4)
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Player or AI inputs that move the active piece
///
/// AI decisions are emitted as a flat list of these actions; the host replays
/// them against the engine one per input frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (with soft drop scoring)
    SoftDrop,
    /// Instantly drop piece to lowest valid position
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
}

impl GameAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use versus_tetris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
        }
    }
}

/// T-Spin detection result
///
/// - **None**: Not a T-spin
/// - **Mini**: 3+ corners filled but not both front corners
/// - **Full**: 3+ corners filled including both front corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TSpinKind {
    None,
    Mini,
    Full,
}

/// Area-clear flavour carried by a disguised bomb piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BombKind {
    Cross,
    Circle,
}

/// Event emitted by the engine after a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub points: u32,
    pub stars: u32,
    pub tspin: Option<TSpinKind>,
    pub combo: u32,
    pub back_to_back: bool,
    pub perfect_clear: bool,
    pub bomb: Option<BombKind>,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled with the specified piece kind
pub type Cell = Option<PieceKind>;
