//! Headless duel runner (default binary).
//!
//! Plays one bot-vs-bot match configured from `VERSUS_*` environment
//! variables and prints a summary.

use std::fs;

use anyhow::{Context, Result};

use versus_tetris::abilities::AbilityCatalog;
use versus_tetris::config::DuelConfig;
use versus_tetris::duel::{Duel, DuelEvent};
use versus_tetris::event_log::EventLog;

fn main() -> Result<()> {
    let config = DuelConfig::from_env();

    let catalog = match &config.catalog_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading ability catalog {path}"))?;
            AbilityCatalog::from_json(&json)
                .with_context(|| format!("parsing ability catalog {path}"))?
        }
        None => AbilityCatalog::builtin(),
    };

    let mut log = match &config.log_path {
        Some(path) => Some(
            EventLog::append_to(path).with_context(|| format!("opening event log {path}"))?,
        ),
        None => None,
    };

    println!(
        "[Duel] seed {} | up to {} pieces | tick {} ms | {} abilities",
        config.seed,
        config.max_pieces,
        config.tick_ms,
        catalog.len()
    );
    if !config.abilities_enabled {
        println!("[Duel] Abilities disabled (VERSUS_ABILITIES_DISABLED)");
    }

    let mut duel = Duel::new(&config, catalog);
    let summary = duel.run(|event| {
        match event {
            DuelEvent::Cast {
                at_ms,
                player,
                ability,
                stars_left,
                ..
            } => println!(
                "[Duel] {at_ms:>7} ms  P{player} casts {} ({stars_left} stars left)",
                ability.as_str()
            ),
            DuelEvent::GameOver { at_ms, player } => {
                println!("[Duel] {at_ms:>7} ms  P{player} topped out")
            }
            DuelEvent::EngineFault {
                at_ms,
                player,
                code,
            } => eprintln!("[Duel] {at_ms:>7} ms  P{player} engine error: {code}"),
            _ => {}
        }
        if let Some(log) = log.as_mut() {
            if let Err(e) = log.record(event) {
                eprintln!("[Duel] event log write failed: {e}");
            }
        }
    });

    if let Some(log) = log.as_mut() {
        log.flush().context("flushing event log")?;
    }

    for (player, p) in summary.players.iter().enumerate() {
        println!(
            "[Duel] P{player}: score {} | lines {} | stars {} | pieces {}{}",
            p.score,
            p.lines,
            p.stars,
            p.pieces_locked,
            if p.game_over { " | topped out" } else { "" }
        );
    }
    match summary.winner {
        Some(player) => println!("[Duel] P{player} wins after {} ms", summary.elapsed_ms),
        None => println!("[Duel] Draw after {} ms", summary.elapsed_ms),
    }
    Ok(())
}
