//! Versus Tetris (workspace facade crate).
//!
//! Re-exports the member crates under short names and adds the pieces a
//! host binary needs around them: environment configuration, a JSONL event
//! log and a headless bot-vs-bot runner.

pub use versus_tetris_abilities as abilities;
pub use versus_tetris_ai as ai;
pub use versus_tetris_core as core;
pub use versus_tetris_types as types;

pub mod config;
pub mod duel;
pub mod event_log;
