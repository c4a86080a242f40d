//! Fixed-weight opponent with a configurable reaction cadence.

use std::time::Duration;

use versus_tetris_core::{Board, Piece};

use crate::evaluator::AiWeights;
use crate::search::{find_best_placement, AiDecision};

pub const MIN_REACTION_MS: u64 = 60;
pub const MAX_REACTION_MS: u64 = 1_200;

#[derive(Debug, Clone, PartialEq)]
pub struct BattleAi {
    weights: AiWeights,
    reaction_ms: u64,
}

impl BattleAi {
    /// Classic weights; `reaction_ms` is clamped to the supported range
    pub fn new(reaction_ms: u64) -> Self {
        Self::with_weights(AiWeights::CLASSIC, reaction_ms)
    }

    pub fn with_weights(weights: AiWeights, reaction_ms: u64) -> Self {
        Self {
            weights,
            reaction_ms: reaction_ms.clamp(MIN_REACTION_MS, MAX_REACTION_MS),
        }
    }

    pub fn weights(&self) -> &AiWeights {
        &self.weights
    }

    pub fn reaction_ms(&self) -> u64 {
        self.reaction_ms
    }

    /// How long the host should wait before replaying the next decision
    pub fn decide_move_delay(&self) -> Duration {
        Duration::from_millis(self.reaction_ms)
    }

    pub fn find_move(&self, board: &Board, piece: &Piece) -> AiDecision {
        find_best_placement(board, piece, &self.weights)
    }
}

impl Default for BattleAi {
    fn default() -> Self {
        Self::new(250)
    }
}
