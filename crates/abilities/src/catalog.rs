//! Ability catalog records.
//!
//! The catalog only carries what the match needs to dispatch an ability:
//! its cost, timing, target side and unlock gate. Names, descriptions and
//! artwork live with the host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every ability the effect engine can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityId {
    ClearRows,
    CrossBomb,
    CircleBomb,
    GoldDigger,
    FillHoles,
    DominoPieces,
    JunkRows,
    Earthquake,
    Scramble,
    GravityFlip,
    DeathCross,
    ColumnDrop,
    RandomSpawner,
    HollowPieces,
}

impl AbilityId {
    pub const ALL: [AbilityId; 14] = [
        AbilityId::ClearRows,
        AbilityId::CrossBomb,
        AbilityId::CircleBomb,
        AbilityId::GoldDigger,
        AbilityId::FillHoles,
        AbilityId::DominoPieces,
        AbilityId::JunkRows,
        AbilityId::Earthquake,
        AbilityId::Scramble,
        AbilityId::GravityFlip,
        AbilityId::DeathCross,
        AbilityId::ColumnDrop,
        AbilityId::RandomSpawner,
        AbilityId::HollowPieces,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityId::ClearRows => "clear_rows",
            AbilityId::CrossBomb => "cross_bomb",
            AbilityId::CircleBomb => "circle_bomb",
            AbilityId::GoldDigger => "gold_digger",
            AbilityId::FillHoles => "fill_holes",
            AbilityId::DominoPieces => "domino_pieces",
            AbilityId::JunkRows => "junk_rows",
            AbilityId::Earthquake => "earthquake",
            AbilityId::Scramble => "scramble",
            AbilityId::GravityFlip => "gravity_flip",
            AbilityId::DeathCross => "death_cross",
            AbilityId::ColumnDrop => "column_drop",
            AbilityId::RandomSpawner => "random_spawner",
            AbilityId::HollowPieces => "hollow_pieces",
        }
    }
}

/// Which board an ability lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityCategory {
    /// The caster's own board
    Buff,
    /// The opponent's board
    Debuff,
}

/// Numeric parameters of one ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub id: AbilityId,
    pub cost: u32,
    /// Absent for instantaneous abilities
    #[serde(default)]
    pub duration_ms: Option<u64>,
    pub category: AbilityCategory,
    pub unlock_tier: u32,
    pub unlock_cost: u32,
    /// Periodic trigger interval for timed abilities
    #[serde(default)]
    pub interval_ms: Option<u64>,
    /// Number of spawned pieces a counted ability lasts
    #[serde(default)]
    pub pieces: Option<u32>,
}

impl AbilitySpec {
    pub fn is_instant(&self) -> bool {
        self.duration_ms.is_none() && self.pieces.is_none()
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ability {} listed twice", .0.as_str())]
    Duplicate(AbilityId),
    #[error("ability {} has an interval but no duration", .0.as_str())]
    IntervalWithoutDuration(AbilityId),
    #[error("ability {} has a zero interval", .0.as_str())]
    ZeroInterval(AbilityId),
}

impl CatalogError {
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Json(_) => "catalog_json",
            CatalogError::Duplicate(_) => "duplicate_ability",
            CatalogError::IntervalWithoutDuration(_) => "interval_without_duration",
            CatalogError::ZeroInterval(_) => "zero_interval",
        }
    }
}

/// Ability specs keyed by id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AbilityCatalog {
    specs: BTreeMap<AbilityId, AbilitySpec>,
}

impl AbilityCatalog {
    /// Default tuning for every ability
    pub fn builtin() -> Self {
        use AbilityCategory::{Buff, Debuff};

        let rows: [(AbilityId, u32, AbilityCategory, u32, u32); 14] = [
            (AbilityId::ClearRows, 20, Buff, 0, 0),
            (AbilityId::CrossBomb, 25, Buff, 1, 100),
            (AbilityId::CircleBomb, 25, Buff, 1, 100),
            (AbilityId::GoldDigger, 30, Buff, 2, 250),
            (AbilityId::FillHoles, 35, Buff, 3, 400),
            (AbilityId::DominoPieces, 30, Buff, 2, 250),
            (AbilityId::JunkRows, 25, Debuff, 0, 0),
            (AbilityId::Earthquake, 40, Debuff, 2, 250),
            (AbilityId::Scramble, 35, Debuff, 3, 400),
            (AbilityId::GravityFlip, 45, Debuff, 4, 600),
            (AbilityId::DeathCross, 40, Debuff, 4, 600),
            (AbilityId::ColumnDrop, 20, Debuff, 1, 100),
            (AbilityId::RandomSpawner, 30, Debuff, 2, 250),
            (AbilityId::HollowPieces, 35, Debuff, 3, 400),
        ];

        let specs = rows
            .into_iter()
            .map(|(id, cost, category, unlock_tier, unlock_cost)| {
                let (duration_ms, interval_ms, pieces) = match id {
                    AbilityId::RandomSpawner => (Some(10_000), Some(2_000), None),
                    AbilityId::DominoPieces => (None, None, Some(3)),
                    AbilityId::HollowPieces => (None, None, Some(2)),
                    _ => (None, None, None),
                };
                let spec = AbilitySpec {
                    id,
                    cost,
                    duration_ms,
                    category,
                    unlock_tier,
                    unlock_cost,
                    interval_ms,
                    pieces,
                };
                (id, spec)
            })
            .collect();
        Self { specs }
    }

    /// Parse a JSON array of specs
    ///
    /// ```
    /// use versus_tetris_abilities::{AbilityCatalog, AbilityId};
    ///
    /// let json = r#"[{"id":"junk_rows","cost":10,"category":"debuff",
    ///                 "unlock_tier":0,"unlock_cost":0}]"#;
    /// let catalog = AbilityCatalog::from_json(json).unwrap();
    /// assert_eq!(catalog.get(AbilityId::JunkRows).unwrap().cost, 10);
    /// assert!(catalog.get(AbilityId::Scramble).is_none());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let list: Vec<AbilitySpec> = serde_json::from_str(json)?;
        Self::from_specs(list)
    }

    pub fn from_specs(list: Vec<AbilitySpec>) -> Result<Self, CatalogError> {
        let mut specs = BTreeMap::new();
        for spec in list {
            match spec.interval_ms {
                Some(0) => return Err(CatalogError::ZeroInterval(spec.id)),
                Some(_) if spec.duration_ms.is_none() => {
                    return Err(CatalogError::IntervalWithoutDuration(spec.id))
                }
                _ => {}
            }
            let id = spec.id;
            if specs.insert(id, spec).is_some() {
                return Err(CatalogError::Duplicate(id));
            }
        }
        Ok(Self { specs })
    }

    pub fn get(&self, id: AbilityId) -> Option<&AbilitySpec> {
        self.specs.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilitySpec> {
        self.specs.values()
    }

    /// Abilities a player at `tier` may take into a match
    pub fn unlocked_at(&self, tier: u32) -> impl Iterator<Item = &AbilitySpec> {
        self.specs.values().filter(move |s| s.unlock_tier <= tier)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_ability() {
        let catalog = AbilityCatalog::builtin();
        assert_eq!(catalog.len(), AbilityId::ALL.len());
        for id in AbilityId::ALL {
            assert!(catalog.get(id).is_some(), "{}", id.as_str());
        }
        assert!(catalog.get(AbilityId::ClearRows).unwrap().is_instant());
        assert!(!catalog.get(AbilityId::RandomSpawner).unwrap().is_instant());
    }

    #[test]
    fn unlock_filter() {
        let catalog = AbilityCatalog::builtin();
        let starters: Vec<_> = catalog.unlocked_at(0).map(|s| s.id).collect();
        assert_eq!(starters, vec![AbilityId::ClearRows, AbilityId::JunkRows]);
    }

    #[test]
    fn ids_serialize_snake_case() {
        for id in AbilityId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn json_errors() {
        let dup = r#"[
            {"id":"scramble","cost":1,"category":"debuff","unlock_tier":0,"unlock_cost":0},
            {"id":"scramble","cost":2,"category":"debuff","unlock_tier":0,"unlock_cost":0}
        ]"#;
        let err = AbilityCatalog::from_json(dup).unwrap_err();
        assert_eq!(err.code(), "duplicate_ability");

        let bad_timing = r#"[{"id":"random_spawner","cost":1,"category":"debuff",
            "unlock_tier":0,"unlock_cost":0,"interval_ms":500}]"#;
        assert_eq!(
            AbilityCatalog::from_json(bad_timing).unwrap_err().code(),
            "interval_without_duration"
        );

        assert_eq!(
            AbilityCatalog::from_json("{").unwrap_err().code(),
            "catalog_json"
        );
        assert_eq!(
            AbilityCatalog::from_json(r#"[{"id":"nope"}]"#).unwrap_err().code(),
            "catalog_json"
        );
    }
}
