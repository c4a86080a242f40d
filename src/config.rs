//! Duel runner configuration from environment variables.

use std::env;
use std::str::FromStr;

use versus_tetris_types::TICK_MS;

/// Settings for a headless bot-vs-bot match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelConfig {
    /// Shared seed for both piece queues and all effect randomness
    pub seed: u32,
    /// Match ends once this many pieces have locked across both boards
    pub max_pieces: u32,
    pub tick_ms: u32,
    pub bot_reaction_ms: u64,
    /// JSONL event log, appended to
    pub log_path: Option<String>,
    /// JSON ability catalog; the built-in tuning when unset
    pub catalog_path: Option<String>,
    pub abilities_enabled: bool,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            max_pieces: 200,
            tick_ms: TICK_MS,
            bot_reaction_ms: 250,
            log_path: None,
            catalog_path: None,
            abilities_enabled: true,
        }
    }
}

impl DuelConfig {
    /// Read `VERSUS_*` variables, falling back to defaults for anything
    /// missing or unparsable
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let abilities_disabled = lookup("VERSUS_ABILITIES_DISABLED")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);

        Self {
            seed: parse_var(&lookup, "VERSUS_SEED").unwrap_or(defaults.seed),
            max_pieces: parse_var(&lookup, "VERSUS_MAX_PIECES").unwrap_or(defaults.max_pieces),
            tick_ms: parse_var::<u32>(&lookup, "VERSUS_TICK_MS")
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.tick_ms),
            bot_reaction_ms: parse_var(&lookup, "VERSUS_BOT_REACTION_MS")
                .unwrap_or(defaults.bot_reaction_ms),
            log_path: path("VERSUS_LOG_PATH"),
            catalog_path: path("VERSUS_CATALOG_PATH"),
            abilities_enabled: !abilities_disabled,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(DuelConfig::from_lookup(lookup(&[])), DuelConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = DuelConfig::from_lookup(lookup(&[
            ("VERSUS_SEED", "42"),
            ("VERSUS_MAX_PIECES", " 10 "),
            ("VERSUS_TICK_MS", "0"),
            ("VERSUS_BOT_REACTION_MS", "abc"),
            ("VERSUS_LOG_PATH", "  "),
            ("VERSUS_CATALOG_PATH", "catalog.json"),
            ("VERSUS_ABILITIES_DISABLED", "TRUE"),
        ]));
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_pieces, 10);
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.bot_reaction_ms, 250);
        assert_eq!(config.log_path, None);
        assert_eq!(config.catalog_path.as_deref(), Some("catalog.json"));
        assert!(!config.abilities_enabled);
    }

    #[test]
    fn from_env_does_not_panic() {
        let _config = DuelConfig::from_env();
    }
}
