//! Game state module - one player's match state
//!
//! Ties the board, the falling piece, the piece queue and both scoring
//! currencies together. Every mutation of a player's match goes through
//! [`GameState`]; ability effects compute a new board elsewhere and hand it
//! back through [`GameState::replace_board`].
//!
//! Spawning is deferred: a lock leaves the state without a piece (phase
//! [`EnginePhase::Locked`] or [`EnginePhase::LinesCleared`]) and the next
//! [`GameState::tick`] spawns from the queue.

use std::collections::VecDeque;

use thiserror::Error;

use crate::area::{circle_clear, cross_clear, AreaGravity};
use crate::board::Board;
use crate::pieces::{self, drop_distance, is_valid_position, Piece, PieceShape, ShapeMatrix};
use crate::rng::PieceQueue;
use crate::scoring::{
    calculate_drop_score, calculate_level, calculate_score, calculate_stars,
    get_drop_interval_ms, StarOptions,
};
use crate::types::{
    BombKind, GameAction, LockEvent, PieceKind, Rotation, TSpinKind, QUEUE_PREVIEW_LEN,
};

/// Radius of the area cleared by a circle bomb piece
pub const BOMB_CIRCLE_RADIUS: f64 = 2.0;

/// Half-width of the bands cleared by a cross bomb piece
pub const BOMB_CROSS_HALF_WIDTH: u32 = 0;

/// Where the engine is in a piece's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnginePhase {
    /// A piece just entered and has not moved yet
    Spawned,
    /// The piece has moved at least once
    Falling,
    /// A piece locked without clearing; the next tick spawns
    Locked,
    /// A piece locked and cleared rows; the next tick spawns
    LinesCleared,
    /// Terminal
    GameOver,
}

/// Engine operation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no active piece")]
    NoActivePiece,
    #[error("board is {found_width}x{found_height}, expected {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },
    #[error("need {needed} stars, have {available}")]
    InsufficientStars { needed: u32, available: u32 },
    #[error("custom shape does not fit at the active piece")]
    ShapeBlocked,
    #[error("game is over")]
    GameOver,
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::NoActivePiece => "no_active_piece",
            EngineError::DimensionMismatch { .. } => "dimension_mismatch",
            EngineError::InsufficientStars { .. } => "insufficient_stars",
            EngineError::ShapeBlocked => "shape_blocked",
            EngineError::GameOver => "game_over",
        }
    }
}

/// Complete state of one player's board in a match
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current: Option<Piece>,
    next_queue: VecDeque<PieceKind>,
    piece_queue: PieceQueue,
    phase: EnginePhase,
    started: bool,
    score: u32,
    stars: u32,
    level: u32,
    lines: u32,
    /// Consecutive clearing locks so far
    combo: u32,
    back_to_back: bool,
    /// Bomb flavour of the current (or next) piece
    bomb: Option<BombKind>,
    include_combo_bonus: bool,
    match_clock_ms: u64,
    last_clear_at_ms: Option<u64>,
    drop_timer_ms: u32,
    last_action_was_rotate: bool,
    pieces_spawned: u32,
    pieces_locked: u32,
    last_event: Option<LockEvent>,
}

impl GameState {
    /// Create a new game on an empty 10x20 board
    pub fn new(seed: u32) -> Self {
        Self::with_board(Board::standard(), seed)
    }

    /// Create a new game on the given board
    pub fn with_board(board: Board, seed: u32) -> Self {
        let mut piece_queue = PieceQueue::new(seed);
        let next_queue = (0..QUEUE_PREVIEW_LEN).map(|_| piece_queue.draw()).collect();

        Self {
            board,
            current: None,
            next_queue,
            piece_queue,
            phase: EnginePhase::Locked,
            started: false,
            score: 0,
            stars: 0,
            level: 0,
            lines: 0,
            combo: 0,
            back_to_back: false,
            bomb: None,
            include_combo_bonus: true,
            match_clock_ms: 0,
            last_clear_at_ms: None,
            drop_timer_ms: 0,
            last_action_was_rotate: false,
            pieces_spawned: 0,
            pieces_locked: 0,
            last_event: None,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_piece();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn game_over(&self) -> bool {
        self.phase == EnginePhase::GameOver
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    /// Upcoming pieces, next first
    pub fn next_queue(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.next_queue.iter().copied()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.back_to_back
    }

    pub fn bomb(&self) -> Option<BombKind> {
        self.bomb
    }

    pub fn match_clock_ms(&self) -> u64 {
        self.match_clock_ms
    }

    /// Match-clock time of the most recent clearing lock
    pub fn last_clear_at_ms(&self) -> Option<u64> {
        self.last_clear_at_ms
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    /// Seed state of the piece queue
    pub fn seed(&self) -> u32 {
        self.piece_queue.seed()
    }

    /// Spawn the next piece from the queue. A spawn that collides inside the
    /// visible rows ends the game.
    pub fn spawn_piece(&mut self) -> bool {
        if self.phase == EnginePhase::GameOver {
            return false;
        }

        let kind = match self.next_queue.pop_front() {
            Some(kind) => kind,
            None => self.piece_queue.draw(),
        };
        while self.next_queue.len() < QUEUE_PREVIEW_LEN {
            self.next_queue.push_back(self.piece_queue.draw());
        }

        let piece = Piece::spawn(kind, self.board.width());
        if !is_valid_position(&self.board, &piece) {
            self.current = None;
            self.phase = EnginePhase::GameOver;
            return false;
        }

        self.current = Some(piece);
        self.phase = EnginePhase::Spawned;
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        self.drop_timer_ms = 0;
        self.last_action_was_rotate = false;
        true
    }

    /// Gravity interval at the current level
    pub fn drop_interval_ms(&self) -> u32 {
        get_drop_interval_ms(self.level)
    }

    /// Try to move the active piece
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let Some(active) = self.current else {
            return false;
        };

        let moved = active.moved(dx, dy);
        if !is_valid_position(&self.board, &moved) {
            return false;
        }

        self.current = Some(moved);
        self.phase = EnginePhase::Falling;
        if dx != 0 {
            self.last_action_was_rotate = false;
        }
        true
    }

    /// Try to rotate the active piece: plain rotation first, then kicks
    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        let Some(active) = self.current else {
            return false;
        };

        match pieces::try_rotate(&self.board, &active, clockwise) {
            Some((rotated, _kick)) => {
                self.current = Some(rotated);
                self.phase = EnginePhase::Falling;
                self.last_action_was_rotate = true;
                true
            }
            None => false,
        }
    }

    /// Hard drop the active piece and lock it. Returns the drop points.
    pub fn hard_drop(&mut self) -> u32 {
        let Some(active) = self.current else {
            return 0;
        };

        let distance = drop_distance(&self.board, &active);
        if distance > 0 {
            self.current = Some(active.moved(0, distance));
        }
        let drop_score = calculate_drop_score(distance as u32, true);
        self.score += drop_score;
        self.lock_piece();
        drop_score
    }

    /// Row the active piece would land on
    pub fn ghost_y(&self) -> Option<i32> {
        let active = self.current?;
        Some(active.y + drop_distance(&self.board, &active))
    }

    /// Lock the active piece onto the board and handle line clears.
    ///
    /// A bomb piece does not merge; its area clear is applied at the piece
    /// centre instead, and rows it completes are never cleared by it.
    pub fn lock_piece(&mut self) {
        let Some(active) = self.current.take() else {
            return;
        };
        let bomb = self.bomb.take();

        let tspin = if bomb.is_none() {
            self.t_spin_kind(&active)
        } else {
            TSpinKind::None
        };

        match bomb {
            Some(BombKind::Cross) => {
                let (cx, cy) = active.center();
                let (next, _) = cross_clear(
                    &self.board,
                    cx,
                    cy,
                    BOMB_CROSS_HALF_WIDTH,
                    AreaGravity::Freeze,
                );
                self.board = next;
            }
            Some(BombKind::Circle) => {
                let (cx, cy) = active.center();
                let (next, _) =
                    circle_clear(&self.board, cx, cy, BOMB_CIRCLE_RADIUS, AreaGravity::Freeze);
                self.board = next;
            }
            None => {
                self.board.lock_cells(active.board_cells(), active.kind);
            }
        }

        let lines_cleared = self.board.clear_full_rows().len();
        self.pieces_locked = self.pieces_locked.wrapping_add(1);

        let mut event = LockEvent {
            lines_cleared: lines_cleared as u32,
            points: 0,
            stars: 0,
            tspin: (tspin != TSpinKind::None).then_some(tspin),
            combo: 0,
            back_to_back: false,
            perfect_clear: false,
            bomb,
        };

        if lines_cleared > 0 {
            let combo_count = self.combo;
            self.combo += 1;

            self.lines += lines_cleared as u32;
            self.level = calculate_level(self.lines);

            let score_result =
                calculate_score(lines_cleared, self.level, tspin, combo_count, self.back_to_back);
            self.score += score_result.total;
            self.back_to_back = score_result.qualifies_for_b2b;

            let perfect_clear = self.board.is_empty();
            let star_result = calculate_stars(
                lines_cleared,
                &StarOptions {
                    combo_count,
                    include_combo_bonus: self.include_combo_bonus,
                    back_to_back: score_result.b2b_applied,
                    tspin: tspin != TSpinKind::None,
                    tspin_tier: None,
                    perfect_clear,
                },
            );
            self.stars += star_result.total;
            self.last_clear_at_ms = Some(self.match_clock_ms);

            event.points = score_result.total;
            event.stars = star_result.total;
            event.combo = combo_count;
            event.back_to_back = score_result.b2b_applied;
            event.perfect_clear = perfect_clear;
            self.phase = EnginePhase::LinesCleared;
        } else {
            self.combo = 0;
            self.back_to_back = false;
            self.phase = EnginePhase::Locked;
        }

        self.last_event = Some(event);
    }

    /// Take and clear the last lock event
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Corner rule on the pre-merge board; only a standard T whose last
    /// action was a rotation qualifies.
    fn t_spin_kind(&self, piece: &Piece) -> TSpinKind {
        let PieceShape::Standard { rotation } = piece.shape else {
            return TSpinKind::None;
        };
        if piece.kind != PieceKind::T || !self.last_action_was_rotate {
            return TSpinKind::None;
        }

        let filled = |&(cx, cy): &(i32, i32)| !self.board.is_valid(piece.x + cx, piece.y + cy);

        let corners = [(0, 0), (2, 0), (0, 2), (2, 2)];
        if corners.iter().filter(|c| filled(c)).count() < 3 {
            return TSpinKind::None;
        }

        let front_corners = match rotation {
            Rotation::North => [(0, 0), (2, 0)],
            Rotation::East => [(2, 0), (2, 2)],
            Rotation::South => [(0, 2), (2, 2)],
            Rotation::West => [(0, 0), (0, 2)],
        };
        if front_corners.iter().all(filled) {
            TSpinKind::Full
        } else {
            TSpinKind::Mini
        }
    }

    /// Advance the match clock. Spawns when no piece is active, otherwise
    /// applies gravity (moving down one row or locking). Returns true when
    /// something changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.started || self.phase == EnginePhase::GameOver {
            return false;
        }

        self.match_clock_ms += u64::from(elapsed_ms);

        if self.current.is_none() {
            return self.spawn_piece();
        }

        self.drop_timer_ms += elapsed_ms;
        let interval = self.drop_interval_ms();
        if self.drop_timer_ms < interval {
            return false;
        }
        self.drop_timer_ms = 0;

        if !self.try_move(0, 1) {
            self.lock_piece();
        }
        true
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if self.phase == EnginePhase::GameOver {
            return false;
        }
        match action {
            GameAction::MoveLeft => self.try_move(-1, 0),
            GameAction::MoveRight => self.try_move(1, 0),
            GameAction::SoftDrop => {
                let moved = self.try_move(0, 1);
                if moved {
                    self.score += calculate_drop_score(1, false);
                }
                moved
            }
            GameAction::HardDrop => {
                if self.current.is_none() {
                    return false;
                }
                self.hard_drop();
                true
            }
            GameAction::RotateCw => self.try_rotate(true),
            GameAction::RotateCcw => self.try_rotate(false),
        }
    }

    /// Replace the current piece's shape with a custom matrix at the same
    /// anchor, nudging it up when the new shape collides.
    pub fn install_custom_shape(&mut self, matrix: ShapeMatrix) -> Result<(), EngineError> {
        let active = self.current.ok_or(EngineError::NoActivePiece)?;
        let custom = active.with_custom_shape(matrix);

        let fitted = (0..=pieces::MAX_SHAPE_SIDE as i32)
            .map(|lift| custom.moved(0, -lift))
            .find(|p| is_valid_position(&self.board, p))
            .ok_or(EngineError::ShapeBlocked)?;

        self.current = Some(fitted);
        Ok(())
    }

    /// Mark the current piece (or the next one, if none is active) as a bomb
    pub fn arm_bomb(&mut self, kind: BombKind) -> Result<(), EngineError> {
        if self.phase == EnginePhase::GameOver {
            return Err(EngineError::GameOver);
        }
        self.bomb = Some(kind);
        Ok(())
    }

    /// Swap in a transformed board of the same size.
    ///
    /// An active piece that now overlaps filled cells is pushed up until it
    /// fits.
    pub fn replace_board(&mut self, board: Board) -> Result<(), EngineError> {
        if !self.board.same_dimensions(&board) {
            return Err(EngineError::DimensionMismatch {
                width: self.board.width(),
                height: self.board.height(),
                found_width: board.width(),
                found_height: board.height(),
            });
        }
        self.board = board;

        if let Some(active) = self.current {
            let max_lift = (self.board.height() + pieces::MAX_SHAPE_SIDE) as i32;
            match (0..=max_lift)
                .map(|lift| active.moved(0, -lift))
                .find(|p| is_valid_position(&self.board, p))
            {
                Some(fitted) => self.current = Some(fitted),
                None => {
                    self.current = None;
                    self.phase = EnginePhase::GameOver;
                }
            }
        }
        Ok(())
    }

    /// Deduct stars. On failure the balance is unchanged.
    pub fn spend_stars(&mut self, amount: u32) -> Result<u32, EngineError> {
        if amount > self.stars {
            return Err(EngineError::InsufficientStars {
                needed: amount,
                available: self.stars,
            });
        }
        self.stars -= amount;
        Ok(self.stars)
    }

    pub fn add_stars(&mut self, amount: u32) {
        self.stars = self.stars.saturating_add(amount);
    }

    /// Whether combo streaks add star bonuses (on by default)
    pub fn set_include_combo_bonus(&mut self, include: bool) {
        self.include_combo_bonus = include;
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_current(&mut self, piece: Option<Piece>) {
        self.current = piece;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
