//! Rolling statistics about how a human opponent plays.

use crate::evaluator::BoardEvaluation;

/// Play statistics used to pace the adaptive AI
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerMetrics {
    pub pieces_per_minute: f64,
    pub average_lock_time_ms: f64,
    pub average_board_height: f64,
    /// Fraction of locks that were counted as mistakes, in `[0, 1]`
    pub mistake_rate: f64,

    pub pieces_placed: u32,
    pub mistakes: u32,
    pub total_lock_time_ms: u64,
    pub total_board_height: u64,
}

impl PlayerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_samples(&self) -> bool {
        self.pieces_placed > 0
    }

    /// Fold one lock into the counters and recompute the averages.
    /// `lock_time_ms` is the time from spawn to lock.
    pub fn record_lock(&mut self, lock_time_ms: u64, board_height: u32, mistake: bool) {
        self.pieces_placed += 1;
        self.total_lock_time_ms += lock_time_ms;
        self.total_board_height += u64::from(board_height);
        if mistake {
            self.mistakes += 1;
        }

        let n = f64::from(self.pieces_placed);
        self.average_lock_time_ms = self.total_lock_time_ms as f64 / n;
        self.average_board_height = self.total_board_height as f64 / n;
        self.mistake_rate = f64::from(self.mistakes) / n;
        self.pieces_per_minute = if self.total_lock_time_ms == 0 {
            0.0
        } else {
            n * 60_000.0 / self.total_lock_time_ms as f64
        };
    }
}

/// A lock counts as a mistake when it buried a new hole
pub fn is_mistake(before: &BoardEvaluation, after: &BoardEvaluation) -> bool {
    after.holes > before.holes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_follow_counters() {
        let mut m = PlayerMetrics::new();
        assert!(!m.has_samples());

        m.record_lock(500, 4, false);
        m.record_lock(1_500, 6, true);

        assert_eq!(m.pieces_placed, 2);
        assert_eq!(m.average_lock_time_ms, 1_000.0);
        assert_eq!(m.average_board_height, 5.0);
        assert_eq!(m.mistake_rate, 0.5);
        assert_eq!(m.pieces_per_minute, 60.0);
    }

    #[test]
    fn new_holes_are_mistakes() {
        let clean = BoardEvaluation::default();
        let holed = BoardEvaluation {
            holes: 1,
            ..clean
        };
        assert!(is_mistake(&clean, &holed));
        assert!(!is_mistake(&holed, &holed));
    }
}
