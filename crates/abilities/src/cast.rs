//! Casting abilities in a match.
//!
//! A cast charges the caster, then either rewrites a board right away,
//! arms a bomb on the caster's piece, or registers an effect that keeps
//! firing (timed or per piece) on the side it targets.

use serde_json::json;
use thiserror::Error;

use versus_tetris_core::{Clock, EngineError, GameState, RandomSource, ShapeMatrix};
use versus_tetris_types::BombKind;

use crate::catalog::{AbilityCatalog, AbilityCategory, AbilityId, AbilitySpec};
use crate::effects::{self, SpawnRule};
use crate::tracker::{CountedEffects, EffectTracker};

/// Rows removed by `clear_rows`
pub const CLEAR_ROWS_COUNT: usize = 2;
/// Garbage rows pushed by `junk_rows`
pub const JUNK_ROWS_COUNT: usize = 2;
/// Blocks removed by `gold_digger`
pub const GOLD_DIGGER_CELLS: usize = 6;
/// Cells filled by `column_drop`
pub const COLUMN_DROP_CELLS: usize = 4;
/// Blocks placed per `random_spawner` trigger
pub const SPAWNER_CELLS_PER_TRIGGER: u64 = 1;

/// Board a resolved ability lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastTarget {
    Caster,
    Opponent,
}

impl From<AbilityCategory> for CastTarget {
    fn from(category: AbilityCategory) -> Self {
        match category {
            AbilityCategory::Buff => CastTarget::Caster,
            AbilityCategory::Debuff => CastTarget::Opponent,
        }
    }
}

/// What a successful cast did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastReport {
    pub ability: AbilityId,
    pub target: CastTarget,
    pub cost: u32,
    pub stars_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CastError {
    #[error("ability {} is not in the catalog", .0.as_str())]
    UnknownAbility(AbilityId),
    #[error("need {needed} stars, have {available}")]
    InsufficientStars { needed: u32, available: u32 },
    #[error("target board is already game over")]
    TargetGameOver,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl CastError {
    pub fn code(&self) -> &'static str {
        match self {
            CastError::UnknownAbility(_) => "unknown_ability",
            CastError::InsufficientStars { .. } => "insufficient_stars",
            CastError::TargetGameOver => "target_game_over",
            CastError::Engine(e) => e.code(),
        }
    }
}

/// One player's engine plus the effects currently running on them
#[derive(Debug, Clone)]
pub struct PlayerSide<C: Clock> {
    pub state: GameState,
    pub effects: EffectTracker<C>,
    pub counters: CountedEffects,
}

impl<C: Clock> PlayerSide<C> {
    pub fn new(state: GameState, clock: C) -> Self {
        Self {
            state,
            effects: EffectTracker::new(clock),
            counters: CountedEffects::new(),
        }
    }

    /// Apply every periodic effect that is due. Returns the abilities that
    /// fired, in id order.
    pub fn poll_effects(
        &mut self,
        rng: &mut impl RandomSource,
    ) -> Result<Vec<AbilityId>, EngineError> {
        let mut fired = Vec::new();
        for ability in self.effects.active_ids() {
            if !self.effects.should_trigger_periodic(ability) {
                continue;
            }
            if let AbilityId::RandomSpawner = ability {
                let cells = self
                    .effects
                    .get(ability)
                    .and_then(|e| e.payload.get("cells"))
                    .and_then(serde_json::Value::as_u64)
                    .unwrap_or(SPAWNER_CELLS_PER_TRIGGER) as usize;
                let (board, _) =
                    effects::random_spawner(self.state.board(), cells, SpawnRule::Isolated, rng);
                self.state.replace_board(board)?;
            }
            fired.push(ability);
        }
        Ok(fired)
    }

    /// Reshape a freshly spawned piece when a per-piece effect is pending.
    /// A shape that does not fit leaves the piece alone and keeps the charge.
    pub fn on_spawn(&mut self) -> Result<Option<AbilityId>, EngineError> {
        for (ability, matrix) in [
            (AbilityId::DominoPieces, ShapeMatrix::domino()),
            (AbilityId::HollowPieces, ShapeMatrix::hollow()),
        ] {
            if !self.counters.is_active(ability) {
                continue;
            }
            match self.state.install_custom_shape(matrix) {
                Ok(()) => {
                    self.counters.consume(ability);
                    return Ok(Some(ability));
                }
                Err(EngineError::ShapeBlocked) => return Ok(None),
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Advance the engine, reshaping any piece the tick spawned and firing
    /// due periodic effects. Returns true when the engine changed.
    pub fn tick(
        &mut self,
        elapsed_ms: u32,
        rng: &mut impl RandomSource,
    ) -> Result<bool, EngineError> {
        let spawned_before = self.state.pieces_spawned();
        let changed = self.state.tick(elapsed_ms);
        if self.state.pieces_spawned() != spawned_before {
            self.on_spawn()?;
        }
        let fired = self.poll_effects(rng)?;
        Ok(changed || !fired.is_empty())
    }
}

/// Cast `ability` from `caster`. Stars are deducted only when the effect
/// resolves.
pub fn cast<C: Clock>(
    catalog: &AbilityCatalog,
    ability: AbilityId,
    caster: &mut PlayerSide<C>,
    opponent: &mut PlayerSide<C>,
    rng: &mut impl RandomSource,
) -> Result<CastReport, CastError> {
    let spec = catalog
        .get(ability)
        .ok_or(CastError::UnknownAbility(ability))?;

    let available = caster.state.stars();
    if available < spec.cost {
        return Err(CastError::InsufficientStars {
            needed: spec.cost,
            available,
        });
    }

    let target = CastTarget::from(spec.category);
    let side = match target {
        CastTarget::Caster => &mut *caster,
        CastTarget::Opponent => &mut *opponent,
    };
    if side.state.game_over() {
        return Err(CastError::TargetGameOver);
    }

    resolve(spec, side, rng)?;
    let stars_left = caster.state.spend_stars(spec.cost)?;

    Ok(CastReport {
        ability,
        target,
        cost: spec.cost,
        stars_left,
    })
}

fn resolve<C: Clock>(
    spec: &AbilitySpec,
    side: &mut PlayerSide<C>,
    rng: &mut impl RandomSource,
) -> Result<(), EngineError> {
    let board = side.state.board();
    let next = match spec.id {
        AbilityId::ClearRows => Some(effects::clear_bottom_rows(board, CLEAR_ROWS_COUNT).0),
        AbilityId::GoldDigger => {
            let safe_zone_row = board.height() / 2;
            Some(effects::gold_digger(board, GOLD_DIGGER_CELLS, safe_zone_row, rng).0)
        }
        AbilityId::FillHoles => Some(effects::fill_holes(board, rng)),
        AbilityId::JunkRows => Some(effects::add_junk_rows(board, JUNK_ROWS_COUNT, rng)),
        AbilityId::Earthquake => Some(effects::earthquake(board, rng)),
        AbilityId::Scramble => Some(effects::scramble(board, rng)),
        AbilityId::GravityFlip => Some(effects::gravity_flip(board)),
        AbilityId::DeathCross => Some(effects::death_cross(board, rng)),
        AbilityId::ColumnDrop => Some(effects::column_drop(board, COLUMN_DROP_CELLS, rng)),
        AbilityId::CrossBomb => {
            side.state.arm_bomb(BombKind::Cross)?;
            None
        }
        AbilityId::CircleBomb => {
            side.state.arm_bomb(BombKind::Circle)?;
            None
        }
        AbilityId::RandomSpawner | AbilityId::DominoPieces | AbilityId::HollowPieces => None,
    };

    if let Some(board) = next {
        side.state.replace_board(board)?;
    }

    match (spec.duration_ms, spec.interval_ms, spec.pieces) {
        (Some(duration), Some(interval), _) => {
            side.effects.activate_periodic(
                spec.id,
                duration,
                interval,
                json!({ "cells": SPAWNER_CELLS_PER_TRIGGER }),
            );
        }
        (Some(duration), None, _) => {
            side.effects.activate(spec.id, duration, json!({}));
        }
        (None, _, Some(pieces)) => side.counters.activate(spec.id, pieces),
        (None, _, None) => {}
    }
    Ok(())
}
