//! An opponent that paces itself on the human's metrics and errs on purpose.

use std::time::Duration;

use versus_tetris_core::{Board, Piece, RandomSource};

use crate::evaluator::AiWeights;
use crate::metrics::PlayerMetrics;
use crate::search::{
    best_placement, decision_for, enumerate_placements, find_best_placement, AiDecision,
};

pub const DEFAULT_MISTAKE_RATE: f64 = 0.35;
pub const MIN_MISTAKE_RATE: f64 = 0.05;
pub const MAX_MISTAKE_RATE: f64 = 0.6;
pub const DEFAULT_SLOWDOWN: f64 = 1.15;
/// Lock time assumed before any sample exists
pub const DEFAULT_LOCK_TIME_MS: f64 = 900.0;
/// Relative delay jitter, both directions
const DELAY_JITTER: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct AdaptiveAi<R: RandomSource> {
    weights: AiWeights,
    metrics: PlayerMetrics,
    slowdown_factor: f64,
    rng: R,
}

impl<R: RandomSource> AdaptiveAi<R> {
    pub fn new(rng: R) -> Self {
        Self {
            weights: AiWeights::CLASSIC,
            metrics: PlayerMetrics::default(),
            slowdown_factor: DEFAULT_SLOWDOWN,
            rng,
        }
    }

    pub fn with_slowdown(mut self, slowdown_factor: f64) -> Self {
        self.slowdown_factor = slowdown_factor.max(0.0);
        self
    }

    pub fn metrics(&self) -> &PlayerMetrics {
        &self.metrics
    }

    pub fn update_metrics(&mut self, metrics: PlayerMetrics) {
        self.metrics = metrics;
    }

    /// Chance that the next decision is a deliberate mistake
    pub fn mistake_probability(&self) -> f64 {
        if !self.metrics.has_samples() {
            return DEFAULT_MISTAKE_RATE;
        }
        ((DEFAULT_MISTAKE_RATE + self.metrics.mistake_rate) / 2.0)
            .clamp(MIN_MISTAKE_RATE, MAX_MISTAKE_RATE)
    }

    /// Human lock pace times the slowdown, jittered by up to 20 % either way
    pub fn decide_move_delay(&mut self) -> Duration {
        let base = if self.metrics.has_samples() {
            self.metrics.average_lock_time_ms
        } else {
            DEFAULT_LOCK_TIME_MS
        };
        let jitter = 1.0 + DELAY_JITTER * (2.0 * self.rng.next_f64() - 1.0);
        let ms = (base * self.slowdown_factor * jitter).max(0.0);
        Duration::from_millis(ms.round() as u64)
    }

    pub fn find_move(&mut self, board: &Board, piece: &Piece) -> AiDecision {
        if !self.rng.chance(self.mistake_probability()) {
            return find_best_placement(board, piece, &self.weights);
        }

        let placements = enumerate_placements(board, piece, &self.weights);
        let Some(best) = best_placement(&placements).copied() else {
            return find_best_placement(board, piece, &self.weights);
        };
        // Equal scores can rebuild the optimal board from another rotation
        let worse: Vec<_> = placements.iter().filter(|p| p.score < best.score).collect();
        if worse.is_empty() {
            return decision_for(piece, &best);
        }
        let chosen = *worse[self.rng.next_int(worse.len() as u32) as usize];

        let mut decision = decision_for(piece, &chosen);
        decision.score = decision.score.min(0.0);
        decision
    }
}
