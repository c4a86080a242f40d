//! Computer opponents.
//!
//! Both policies look one piece ahead: [`search`] tries every rotation and
//! column, [`evaluator`] scores the resulting board. [`BattleAi`] always
//! plays the best placement at a fixed cadence; [`AdaptiveAi`] follows the
//! human's pace and sometimes picks a worse spot on purpose.

pub mod adaptive;
pub mod battle;
pub mod evaluator;
pub mod metrics;
pub mod search;

pub use adaptive::AdaptiveAi;
pub use battle::BattleAi;
pub use evaluator::{evaluate, AiWeights, BoardEvaluation};
pub use metrics::{is_mistake, PlayerMetrics};
pub use search::{
    best_placement, enumerate_placements, find_best_placement, generate_moves, AiDecision,
    Placement,
};
