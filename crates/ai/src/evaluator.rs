//! Board evaluation: the four classic features and a linear score over them.

use versus_tetris_core::Board;

/// Feature vector of a locked board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardEvaluation {
    /// Sum of column heights
    pub aggregate_height: u32,
    /// Rows with no empty cell
    pub complete_lines: u32,
    /// Empty cells with a filled cell somewhere above in the same column
    pub holes: u32,
    /// Sum of height differences between neighbouring columns
    pub bumpiness: u32,
}

impl BoardEvaluation {
    /// Weighted sum of the features
    pub fn score(&self, weights: &AiWeights) -> f64 {
        weights.aggregate_height * f64::from(self.aggregate_height)
            + weights.complete_lines * f64::from(self.complete_lines)
            + weights.holes * f64::from(self.holes)
            + weights.bumpiness * f64::from(self.bumpiness)
    }
}

/// One coefficient per feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiWeights {
    pub aggregate_height: f64,
    pub complete_lines: f64,
    pub holes: f64,
    pub bumpiness: f64,
}

impl AiWeights {
    /// Widely used hand-tuned weights for one-piece lookahead
    pub const CLASSIC: AiWeights = AiWeights {
        aggregate_height: -0.510066,
        complete_lines: 0.760666,
        holes: -0.35663,
        bumpiness: -0.184483,
    };
}

impl Default for AiWeights {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Extract the features in one column-major pass.
///
/// ```
/// use versus_tetris_ai::evaluate;
/// use versus_tetris_core::Board;
///
/// let board = Board::from_ascii(&["....", "#...", ".#..", "####"]).unwrap();
/// let eval = evaluate(&board);
/// assert_eq!(eval.complete_lines, 1);
/// assert_eq!(eval.holes, 1);
/// ```
pub fn evaluate(board: &Board) -> BoardEvaluation {
    let (width, height) = (board.width(), board.height());
    let mut heights = vec![0u32; width];
    let mut holes = 0u32;

    for (x, column_height) in heights.iter_mut().enumerate() {
        let mut seen_block = false;
        for y in 0..height {
            let filled = board.row(y)[x].is_some();
            if filled {
                if !seen_block {
                    *column_height = (height - y) as u32;
                    seen_block = true;
                }
            } else if seen_block {
                holes += 1;
            }
        }
    }

    let complete_lines = (0..height).filter(|&y| board.is_row_full(y)).count() as u32;
    let bumpiness = heights
        .windows(2)
        .map(|pair| pair[0].abs_diff(pair[1]))
        .sum();

    BoardEvaluation {
        aggregate_height: heights.iter().sum(),
        complete_lines,
        holes,
        bumpiness,
    }
}
