//! Core game logic - pure, deterministic, and testable
//!
//! Everything a single player's board needs during a versus match: the grid,
//! the pieces, the seeded randomness both players share, scoring in points
//! and stars, and the engine state machine. No rendering, networking or I/O.
//!
//! # Module Structure
//!
//! - [`board`]: width x height grid with collision and line clearing
//! - [`pieces`]: standard tetromino tables, custom shape matrices and kicks
//! - [`area`]: cross and circle area clears plus column settling
//! - [`rng`]: seeded LCG, ambient RNG and the 7-bag queue
//! - [`clock`]: millisecond clocks for timed effects
//! - [`scoring`]: classic points and the star economy
//! - [`game_state`]: the engine state machine
//! - [`place`]: replaying AI move lists against the engine
//!
//! # Example
//!
//! ```
//! use versus_tetris_core::GameState;
//! use versus_tetris_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! // Hard drop awards points; the next piece spawns on the next tick.
//! assert!(game.score() > 0);
//! assert!(game.current().is_none());
//! game.tick(16);
//! assert!(game.current().is_some());
//! ```

pub mod area;
pub mod board;
pub mod clock;
pub mod game_state;
pub mod pieces;
pub mod place;
pub mod rng;
pub mod scoring;

pub use versus_tetris_types as types;

pub use area::{circle_clear, cross_clear, settle, AreaGravity};
pub use board::{Board, BoardError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use game_state::{EngineError, EnginePhase, GameState};
pub use pieces::{
    get_shape, hard_drop_position, is_valid_position, lock_piece, try_rotate, Piece, PieceShape,
    ShapeError, ShapeMatrix,
};
pub use place::{apply_moves, apply_place, PlaceError};
pub use rng::{AmbientRng, PieceQueue, RandomSource, SeededRng};
pub use scoring::{calculate_score, calculate_stars, ScoreResult, StarOptions, StarResult};
