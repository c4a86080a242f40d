//! Abilities - star-bought board effects for versus matches
//!
//! - [`catalog`]: ability ids and their numeric tuning
//! - [`effects`]: pure board transforms, one per effect
//! - [`tracker`]: timed, periodic and per-piece effects on a player
//! - [`cast`]: spending stars and dispatching an ability to a board

pub mod cast;
pub mod catalog;
pub mod effects;
pub mod tracker;

pub use cast::{cast, CastError, CastReport, CastTarget, PlayerSide};
pub use catalog::{AbilityCatalog, AbilityCategory, AbilityId, AbilitySpec, CatalogError};
pub use effects::SpawnRule;
pub use tracker::{ActiveAbilityEffect, CountedEffects, EffectTracker, PeriodicTrigger};
