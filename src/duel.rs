//! Headless bot-vs-bot match.
//!
//! Seat 0 is a [`BattleAi`] standing in for a human; seat 1 is an
//! [`AdaptiveAi`] fed the metrics seat 0 produces. Both boards draw from the
//! same seed and share a [`ManualClock`] that advances one tick at a time, so
//! a run is fully reproducible from its config.

use serde::Serialize;

use versus_tetris_abilities::{cast, AbilityCatalog, AbilityId, CastTarget, PlayerSide};
use versus_tetris_ai::{
    evaluate, is_mistake, AdaptiveAi, AiDecision, BattleAi, BoardEvaluation, PlayerMetrics,
};
use versus_tetris_core::{
    apply_place, Board, Clock, GameState, ManualClock, Piece, RandomSource, SeededRng,
};
use versus_tetris_types::{GameAction, LockEvent};

use crate::config::DuelConfig;

/// Seat whose play feeds the adaptive bot's metrics
pub const HUMAN_SEAT: usize = 0;

/// Upper bound on match time per piece, so a stalled run still ends
const MAX_MS_PER_PIECE: u64 = 30_000;

/// Everything the runner reports while a match is in progress
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DuelEvent {
    Start {
        seed: u32,
        width: usize,
        height: usize,
    },
    Lock {
        at_ms: u64,
        player: usize,
        event: LockEvent,
    },
    Cast {
        at_ms: u64,
        player: usize,
        ability: AbilityId,
        on_opponent: bool,
        cost: u32,
        stars_left: u32,
    },
    CastRejected {
        at_ms: u64,
        player: usize,
        ability: AbilityId,
        code: &'static str,
    },
    EngineFault {
        at_ms: u64,
        player: usize,
        code: &'static str,
    },
    GameOver {
        at_ms: u64,
        player: usize,
    },
    Finish {
        summary: DuelSummary,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub score: u32,
    pub lines: u32,
    pub stars: u32,
    pub pieces_locked: u32,
    pub game_over: bool,
}

impl PlayerSummary {
    fn of(state: &GameState) -> Self {
        Self {
            score: state.score(),
            lines: state.lines(),
            stars: state.stars(),
            pieces_locked: state.pieces_locked(),
            game_over: state.game_over(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuelSummary {
    /// `None` on a draw
    pub winner: Option<usize>,
    pub elapsed_ms: u64,
    pub casts: u32,
    pub players: [PlayerSummary; 2],
}

enum Bot {
    Battle(BattleAi),
    Adaptive(AdaptiveAi<SeededRng>),
}

impl Bot {
    fn plan(&mut self, board: &Board, piece: &Piece) -> (AiDecision, u64) {
        match self {
            Bot::Battle(ai) => (
                ai.find_move(board, piece),
                ai.decide_move_delay().as_millis() as u64,
            ),
            Bot::Adaptive(ai) => {
                let delay = ai.decide_move_delay().as_millis() as u64;
                (ai.find_move(board, piece), delay)
            }
        }
    }
}

/// A decision waiting for its reaction delay, tied to one spawned piece
struct Plan {
    serial: u32,
    planned_at_ms: u64,
    ready_at_ms: u64,
    executed: bool,
    decision: AiDecision,
    before: BoardEvaluation,
}

struct Seat {
    side: PlayerSide<ManualClock>,
    bot: Bot,
    plan: Option<Plan>,
    topped_out: bool,
}

pub struct Duel {
    clock: ManualClock,
    catalog: AbilityCatalog,
    rng: SeededRng,
    seats: [Seat; 2],
    tick_ms: u32,
    max_pieces: u32,
    abilities_enabled: bool,
    human_metrics: PlayerMetrics,
    casts: u32,
}

impl Duel {
    pub fn new(config: &DuelConfig, catalog: AbilityCatalog) -> Self {
        let clock = ManualClock::new(0);
        let seat = |bot| Seat {
            side: PlayerSide::new(GameState::new(config.seed), clock.clone()),
            bot,
            plan: None,
            topped_out: false,
        };
        let seats = [
            seat(Bot::Battle(BattleAi::new(config.bot_reaction_ms))),
            seat(Bot::Adaptive(AdaptiveAi::new(SeededRng::new(
                config.seed.wrapping_add(1),
            )))),
        ];

        Self {
            clock: clock.clone(),
            catalog,
            rng: SeededRng::new(config.seed),
            seats,
            tick_ms: config.tick_ms.max(1),
            max_pieces: config.max_pieces,
            abilities_enabled: config.abilities_enabled,
            human_metrics: PlayerMetrics::default(),
            casts: 0,
        }
    }

    pub fn state(&self, player: usize) -> &GameState {
        &self.seats[player].side.state
    }

    pub fn human_metrics(&self) -> &PlayerMetrics {
        &self.human_metrics
    }

    /// Play until a board tops out, the piece limit is reached or time runs
    /// out. Every event is handed to `on_event` as it happens.
    pub fn run(&mut self, mut on_event: impl FnMut(&DuelEvent)) -> DuelSummary {
        let board = self.seats[0].side.state.board();
        on_event(&DuelEvent::Start {
            seed: self.seats[0].side.state.seed(),
            width: board.width(),
            height: board.height(),
        });
        for seat in &mut self.seats {
            seat.side.state.start();
        }

        let deadline = u64::from(self.max_pieces.max(1)) * MAX_MS_PER_PIECE;
        while !self.finished() && self.clock.now_ms() < deadline {
            self.clock.advance(u64::from(self.tick_ms));
            for player in 0..self.seats.len() {
                self.step(player, &mut on_event);
            }
        }

        let summary = self.summary();
        on_event(&DuelEvent::Finish {
            summary: summary.clone(),
        });
        summary
    }

    fn finished(&self) -> bool {
        let locked: u32 = self
            .seats
            .iter()
            .map(|s| s.side.state.pieces_locked())
            .sum();
        locked >= self.max_pieces || self.seats.iter().any(|s| s.side.state.game_over())
    }

    fn step(&mut self, player: usize, on_event: &mut impl FnMut(&DuelEvent)) {
        let now = self.clock.now_ms();
        let seat = &mut self.seats[player];
        if seat.side.state.game_over() {
            return;
        }

        if let Err(e) = seat.side.tick(self.tick_ms, &mut self.rng) {
            on_event(&DuelEvent::EngineFault {
                at_ms: now,
                player,
                code: e.code(),
            });
        }
        self.after_change(player, on_event);

        let seat = &mut self.seats[player];
        let Some(piece) = seat.side.state.current() else {
            return;
        };
        let serial = seat.side.state.pieces_spawned();

        let pending = matches!(&seat.plan, Some(plan) if plan.serial == serial);
        if !pending {
            let board = seat.side.state.board();
            let before = evaluate(board);
            let (decision, delay_ms) = seat.bot.plan(board, &piece);
            seat.plan = Some(Plan {
                serial,
                planned_at_ms: now,
                ready_at_ms: now + delay_ms,
                executed: false,
                decision,
                before,
            });
            return;
        }

        let Some(plan) = seat.plan.as_mut() else {
            return;
        };
        if plan.executed || now < plan.ready_at_ms {
            return;
        }
        plan.executed = true;
        let (target_x, target_rotation) = (plan.decision.target_x, plan.decision.target_rotation);
        let state = &mut seat.side.state;
        if apply_place(state, target_x, target_rotation).is_err() && state.current().is_some() {
            // The board moved under the plan; drop where it stands
            state.apply_action(GameAction::HardDrop);
        }
        self.after_change(player, on_event);
    }

    /// Report a lock or top-out on `player`, update metrics and maybe cast
    fn after_change(&mut self, player: usize, on_event: &mut impl FnMut(&DuelEvent)) {
        let now = self.clock.now_ms();
        let seat = &mut self.seats[player];

        if let Some(event) = seat.side.state.take_last_event() {
            let plan = seat.plan.take();
            on_event(&DuelEvent::Lock {
                at_ms: now,
                player,
                event,
            });

            if player == HUMAN_SEAT {
                let board = seat.side.state.board();
                let after = evaluate(board);
                let (lock_time_ms, mistake) = match plan {
                    Some(p) => (now.saturating_sub(p.planned_at_ms), is_mistake(&p.before, &after)),
                    None => (0, false),
                };
                self.human_metrics
                    .record_lock(lock_time_ms, board.max_height() as u32, mistake);
                for seat in &mut self.seats {
                    if let Bot::Adaptive(ai) = &mut seat.bot {
                        ai.update_metrics(self.human_metrics);
                    }
                }
            }

            if self.abilities_enabled {
                self.try_cast(player, on_event);
            }
        }

        for (i, seat) in self.seats.iter_mut().enumerate() {
            if seat.side.state.game_over() && !seat.topped_out {
                seat.topped_out = true;
                seat.plan = None;
                on_event(&DuelEvent::GameOver {
                    at_ms: now,
                    player: i,
                });
            }
        }
    }

    /// Spend stars on a random affordable ability
    fn try_cast(&mut self, player: usize, on_event: &mut impl FnMut(&DuelEvent)) {
        let now = self.clock.now_ms();
        let stars = self.seats[player].side.state.stars();
        let affordable: Vec<AbilityId> = self
            .catalog
            .iter()
            .filter(|spec| spec.cost <= stars)
            .map(|spec| spec.id)
            .collect();
        if affordable.is_empty() {
            return;
        }
        let ability = affordable[self.rng.next_int(affordable.len() as u32) as usize];

        let [first, second] = &mut self.seats;
        let (caster, opponent) = if player == 0 {
            (first, second)
        } else {
            (second, first)
        };

        match cast(
            &self.catalog,
            ability,
            &mut caster.side,
            &mut opponent.side,
            &mut self.rng,
        ) {
            Ok(report) => {
                self.casts += 1;
                on_event(&DuelEvent::Cast {
                    at_ms: now,
                    player,
                    ability,
                    on_opponent: report.target == CastTarget::Opponent,
                    cost: report.cost,
                    stars_left: report.stars_left,
                });
            }
            Err(e) => on_event(&DuelEvent::CastRejected {
                at_ms: now,
                player,
                ability,
                code: e.code(),
            }),
        }
    }

    pub fn summary(&self) -> DuelSummary {
        let players = [
            PlayerSummary::of(&self.seats[0].side.state),
            PlayerSummary::of(&self.seats[1].side.state),
        ];
        let winner = match (players[0].game_over, players[1].game_over) {
            (true, false) => Some(1),
            (false, true) => Some(0),
            _ => match players[0].score.cmp(&players[1].score) {
                std::cmp::Ordering::Greater => Some(0),
                std::cmp::Ordering::Less => Some(1),
                std::cmp::Ordering::Equal => None,
            },
        };
        DuelSummary {
            winner,
            elapsed_ms: self.clock.now_ms(),
            casts: self.casts,
            players,
        }
    }
}
