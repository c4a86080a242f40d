//! One-piece lookahead placement search.
//!
//! Every (rotation, column) pair is tried on a scratch copy of the board:
//! hard drop, lock, clear, evaluate. Candidates are visited rotation-major
//! with ascending x, and only a strictly better score replaces the current
//! best, so ties keep the earliest candidate.

use versus_tetris_core::pieces::NUM_ROTATIONS;
use versus_tetris_core::{hard_drop_position, is_valid_position, lock_piece, Board, Piece};
use versus_tetris_types::GameAction;

use crate::evaluator::{evaluate, AiWeights};

/// Columns scanned past each wall, so pieces whose matrix has empty
/// leading columns can still reach the edge
const X_MARGIN: i32 = 2;

/// A move plan for the active piece
#[derive(Debug, Clone, PartialEq)]
pub struct AiDecision {
    /// Inputs to replay, in order
    pub moves: Vec<GameAction>,
    pub target_x: i32,
    /// Anchor row the piece will rest on
    pub target_y: i32,
    /// Absolute rotation index in `0..4`
    pub target_rotation: u8,
    pub score: f64,
}

/// A reachable resting spot and its evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Clockwise quarter turns from the piece's current orientation
    pub turns: u8,
    pub x: i32,
    pub y: i32,
    pub score: f64,
}

/// Every collision-free placement in search order
pub fn enumerate_placements(board: &Board, piece: &Piece, weights: &AiWeights) -> Vec<Placement> {
    let width = board.width() as i32;
    let mut placements = Vec::new();

    for turns in 0..NUM_ROTATIONS {
        let rotated = piece.rotated_cw_times(turns);
        for x in -X_MARGIN..width + X_MARGIN {
            let candidate = rotated.at(x, piece.y);
            if !is_valid_position(board, &candidate) {
                continue;
            }
            let landed = hard_drop_position(board, &candidate);
            let (after, _) = lock_piece(board, &landed).with_lines_cleared();
            placements.push(Placement {
                turns,
                x,
                y: landed.y,
                score: evaluate(&after).score(weights),
            });
        }
    }
    placements
}

/// Highest-scoring placement, first one on ties
pub fn best_placement(placements: &[Placement]) -> Option<&Placement> {
    let mut best: Option<&Placement> = None;
    for placement in placements {
        if best.map_or(true, |b| placement.score > b.score) {
            best = Some(placement);
        }
    }
    best
}

/// Search all placements and plan the inputs for the best one.
///
/// When nothing fits, the plan is a hard drop where the piece stands, scored
/// negative infinity.
pub fn find_best_placement(board: &Board, piece: &Piece, weights: &AiWeights) -> AiDecision {
    let placements = enumerate_placements(board, piece, weights);
    match best_placement(&placements) {
        Some(best) => decision_for(piece, best),
        None => fallback_decision(board, piece),
    }
}

/// Plan the inputs that realise `placement` for `piece`
pub fn decision_for(piece: &Piece, placement: &Placement) -> AiDecision {
    let target_rotation = (piece.rotation_index() + placement.turns) % NUM_ROTATIONS;
    AiDecision {
        moves: generate_moves(piece, placement.x, target_rotation),
        target_x: placement.x,
        target_y: placement.y,
        target_rotation,
        score: placement.score,
    }
}

fn fallback_decision(board: &Board, piece: &Piece) -> AiDecision {
    AiDecision {
        moves: vec![GameAction::HardDrop],
        target_x: piece.x,
        target_y: hard_drop_position(board, piece).y,
        target_rotation: piece.rotation_index(),
        score: f64::NEG_INFINITY,
    }
}

/// Clockwise turns to reach `target_rotation`, then horizontal steps to
/// `target_x`. No drop input is included.
///
/// The step count assumes every turn rotates in place. A wall kick shifts
/// the anchor, so hosts that must land on target replay with
/// `apply_place` instead.
pub fn generate_moves(piece: &Piece, target_x: i32, target_rotation: u8) -> Vec<GameAction> {
    let turns = (target_rotation + NUM_ROTATIONS - piece.rotation_index() % NUM_ROTATIONS)
        % NUM_ROTATIONS;
    let dx = target_x - piece.x;
    let step = if dx < 0 {
        GameAction::MoveLeft
    } else {
        GameAction::MoveRight
    };

    let mut moves = Vec::with_capacity(turns as usize + dx.unsigned_abs() as usize);
    moves.extend(std::iter::repeat(GameAction::RotateCw).take(turns as usize));
    moves.extend(std::iter::repeat(step).take(dx.unsigned_abs() as usize));
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use versus_tetris_types::PieceKind;

    #[test]
    fn flat_i_on_empty_board() {
        let board = Board::standard();
        let piece = Piece::spawn(PieceKind::I, board.width());
        let decision = find_best_placement(&board, &piece, &AiWeights::CLASSIC);

        assert!(decision.target_rotation == 0 || decision.target_rotation == 2);
        assert!(decision.target_y >= board.height() as i32 - 4);
        // Flush with the left wall
        assert_eq!(decision.target_x, 0);
        assert_eq!(decision.moves, vec![GameAction::MoveLeft; 3]);
    }

    #[test]
    fn ties_keep_first_candidate() {
        // O at either wall scores the same; the left wall comes first
        let board = Board::standard();
        let piece = Piece::spawn(PieceKind::O, board.width());
        let placements = enumerate_placements(&board, &piece, &AiWeights::CLASSIC);
        let left = placements.iter().find(|p| p.turns == 0 && p.x == -1).unwrap();
        let right = placements.iter().find(|p| p.turns == 0 && p.x == 7).unwrap();
        assert_eq!(left.score, right.score);

        let decision = find_best_placement(&board, &piece, &AiWeights::CLASSIC);
        assert_eq!((decision.target_rotation, decision.target_x), (0, -1));
    }

    #[test]
    fn completes_a_line_when_possible() {
        let mut rows = vec!["..........".to_string(); 19];
        rows.push("######....".to_string());
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let board = Board::from_ascii(&refs).unwrap();

        let piece = Piece::spawn(PieceKind::I, board.width());
        let decision = find_best_placement(&board, &piece, &AiWeights::CLASSIC);
        assert_eq!(decision.target_x, 6);
        assert_eq!(decision.target_rotation % 2, 0);
    }

    #[test]
    fn blocked_piece_falls_back_to_hard_drop() {
        let rows = vec!["##########"; 4];
        let board = Board::from_ascii(&rows).unwrap();
        let piece = Piece::new(PieceKind::T, 3, 0);
        let decision = find_best_placement(&board, &piece, &AiWeights::CLASSIC);
        assert_eq!(decision.score, f64::NEG_INFINITY);
        assert_eq!(decision.moves, vec![GameAction::HardDrop]);
        assert_eq!(decision.target_x, 3);
    }

    #[test]
    fn move_generation_wraps_rotation() {
        let piece = Piece::new(PieceKind::T, 3, 0).rotated_cw_times(3);
        assert_eq!(
            generate_moves(&piece, 5, 1),
            vec![
                GameAction::RotateCw,
                GameAction::RotateCw,
                GameAction::MoveRight,
                GameAction::MoveRight
            ]
        );
        assert!(generate_moves(&piece, 3, 3).is_empty());
    }
}
