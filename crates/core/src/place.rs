//! Move-list execution against a live [`GameState`].
//!
//! AI opponents decide a placement off-board and emit it as a list of
//! actions or a target. These helpers replay either one step at a time so
//! the engine's own collision rules decide what is legal.

use thiserror::Error;

use crate::game_state::GameState;
use crate::pieces::{Piece, NUM_ROTATIONS};
use crate::types::GameAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("could not rotate to target rotation")]
    RotationBlocked,
    #[error("a move in the list collided")]
    MoveBlocked,
    #[error("game is not playable")]
    NotPlayable,
    #[error("no active piece")]
    NoActive,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::RotationBlocked
            | PlaceError::MoveBlocked
            | PlaceError::NoActive => "invalid_place",
        }
    }
}

/// Apply `moves` in order, then hard drop when `hard_drop` is set.
///
/// Stops at the first action the engine refuses. Actions applied before the
/// failure are kept.
pub fn apply_moves(
    state: &mut GameState,
    moves: &[GameAction],
    hard_drop: bool,
) -> Result<(), PlaceError> {
    playable_piece(state)?;

    for &action in moves {
        if !state.apply_action(action) {
            return Err(match action {
                GameAction::RotateCw | GameAction::RotateCcw => PlaceError::RotationBlocked,
                _ if state.current().is_none() => PlaceError::NoActive,
                _ => PlaceError::MoveBlocked,
            });
        }
    }

    if hard_drop && state.current().is_some() {
        state.apply_action(GameAction::HardDrop);
    }
    Ok(())
}

/// Turn clockwise to `target_rotation`, slide until the anchor column is
/// `target_x`, then hard drop.
///
/// The slide is measured after the turns, so a wall kick taken while
/// rotating does not leave the piece off target. Like [`apply_moves`], steps
/// taken before a failure are kept.
pub fn apply_place(
    state: &mut GameState,
    target_x: i32,
    target_rotation: u8,
) -> Result<(), PlaceError> {
    let piece = playable_piece(state)?;

    let turns = (target_rotation % NUM_ROTATIONS + NUM_ROTATIONS - piece.rotation_index())
        % NUM_ROTATIONS;
    for _ in 0..turns {
        if !state.try_rotate(true) {
            return Err(PlaceError::RotationBlocked);
        }
    }

    let turned = state.current().ok_or(PlaceError::NoActive)?;
    let dx = target_x - turned.x;
    for _ in 0..dx.unsigned_abs() {
        if !state.try_move(dx.signum(), 0) {
            return Err(PlaceError::MoveBlocked);
        }
    }

    state.apply_action(GameAction::HardDrop);
    Ok(())
}

fn playable_piece(state: &GameState) -> Result<Piece, PlaceError> {
    if !state.started() || state.game_over() {
        return Err(PlaceError::NotPlayable);
    }
    state.current().ok_or(PlaceError::NoActive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::is_valid_position;
    use crate::types::PieceKind;

    #[test]
    fn moves_rejected_before_start() {
        let mut gs = GameState::new(1);
        let err = apply_moves(&mut gs, &[GameAction::MoveLeft], true).unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
        assert_eq!(err.code(), "not_playable");
    }

    #[test]
    fn moves_then_hard_drop() {
        let mut gs = GameState::new(1);
        gs.start();
        let x0 = gs.current().unwrap().x;

        apply_moves(&mut gs, &[GameAction::MoveLeft, GameAction::MoveLeft], false).unwrap();
        assert_eq!(gs.current().unwrap().x, x0 - 2);

        apply_moves(&mut gs, &[], true).unwrap();
        assert!(gs.current().is_none());
        assert_eq!(gs.pieces_locked(), 1);
    }

    #[test]
    fn blocked_move_reports_error() {
        let mut gs = GameState::new(1);
        gs.start();
        let moves = [GameAction::MoveLeft; 12];
        let err = apply_moves(&mut gs, &moves, true).unwrap_err();
        assert_eq!(err, PlaceError::MoveBlocked);
        // nothing locked on failure
        assert!(gs.current().is_some());
    }

    /// Started game whose first piece is an I
    fn game_with_i() -> GameState {
        (1u32..10_000)
            .map(|seed| {
                let mut gs = GameState::new(seed);
                gs.start();
                gs
            })
            .find(|gs| gs.current().map(|p| p.kind) == Some(PieceKind::I))
            .unwrap()
    }

    #[test]
    fn place_blocked_by_wall_of_cells() {
        let mut gs = GameState::new(1);
        gs.start();
        let a = gs.current().unwrap();

        let max_dx = a.cells().iter().map(|&(dx, _)| dx).max().unwrap();
        let wall_x = a.x + max_dx + 1;
        for y in 0..20 {
            gs.board_mut().set(wall_x, y, Some(PieceKind::I));
        }

        let err = apply_place(&mut gs, a.x + 2, a.rotation_index()).unwrap_err();
        assert_eq!(err, PlaceError::MoveBlocked);
        assert_eq!(err.code(), "invalid_place");
    }

    #[test]
    fn place_turns_and_locks() {
        let mut gs = GameState::new(1);
        gs.start();
        let a = gs.current().unwrap();
        apply_place(&mut gs, a.x, (a.rotation_index() + 3) % 4).unwrap();
        assert_eq!(gs.pieces_locked(), 1);
        assert!(gs.take_last_event().is_some());
    }

    #[test]
    fn place_lands_on_target_after_kick() {
        let mut gs = game_with_i();
        let spawn = gs.current().unwrap();
        // Blocks the unkicked vertical I at the spawn anchor
        let plain = spawn.rotated(true);
        let (bx, by) = plain.board_cells().nth(2).unwrap();
        gs.board_mut().set(bx, by, Some(PieceKind::Z));
        assert!(!is_valid_position(gs.board(), &plain));

        let target_x = spawn.x - 3;
        apply_place(&mut gs, target_x, 1).unwrap();

        let (column, _) = plain.at(target_x, 0).board_cells().next().unwrap();
        let height = gs.board().height() as i32;
        for y in height - 4..height {
            assert_eq!(gs.board().get(column, y), Some(Some(PieceKind::I)), "row {y}");
        }
    }
}
