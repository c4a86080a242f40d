//! Per-player bookkeeping of ability effects that outlive the cast.
//!
//! [`EffectTracker`] holds effects measured in milliseconds and reads its
//! clock whenever it is queried; expired entries are dropped on the first
//! read that notices them. [`CountedEffects`] holds effects measured in
//! spawned pieces.

use std::collections::HashMap;

use versus_tetris_core::Clock;

use crate::catalog::AbilityId;

/// Fires an effect every `interval_ms` while it is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTrigger {
    pub interval_ms: u64,
    pub last_trigger_ms: u64,
}

/// A timed effect in progress
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAbilityEffect {
    pub ability: AbilityId,
    pub started_at_ms: u64,
    pub ends_at_ms: u64,
    /// Effect parameters, opaque to the tracker
    pub payload: serde_json::Value,
    pub periodic: Option<PeriodicTrigger>,
}

impl ActiveAbilityEffect {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.ends_at_ms
    }
}

/// Timed effects on one player, keyed by ability
#[derive(Debug, Clone)]
pub struct EffectTracker<C: Clock> {
    clock: C,
    active: HashMap<AbilityId, ActiveAbilityEffect>,
}

impl<C: Clock> EffectTracker<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            active: HashMap::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Start (or restart) an effect lasting `duration_ms`
    pub fn activate(
        &mut self,
        ability: AbilityId,
        duration_ms: u64,
        payload: serde_json::Value,
    ) -> &ActiveAbilityEffect {
        self.insert(ability, duration_ms, payload, None)
    }

    /// Start (or restart) an effect that also fires every `interval_ms`.
    /// The first firing is one interval after activation.
    pub fn activate_periodic(
        &mut self,
        ability: AbilityId,
        duration_ms: u64,
        interval_ms: u64,
        payload: serde_json::Value,
    ) -> &ActiveAbilityEffect {
        let now = self.clock.now_ms();
        self.insert(
            ability,
            duration_ms,
            payload,
            Some(PeriodicTrigger {
                interval_ms,
                last_trigger_ms: now,
            }),
        )
    }

    fn insert(
        &mut self,
        ability: AbilityId,
        duration_ms: u64,
        payload: serde_json::Value,
        periodic: Option<PeriodicTrigger>,
    ) -> &ActiveAbilityEffect {
        let now = self.clock.now_ms();
        let effect = ActiveAbilityEffect {
            ability,
            started_at_ms: now,
            ends_at_ms: now.saturating_add(duration_ms),
            payload,
            periodic,
        };
        self.active.insert(ability, effect);
        &self.active[&ability]
    }

    /// True while the effect has time left; evicts it once expired
    pub fn is_active(&mut self, ability: AbilityId) -> bool {
        self.get(ability).is_some()
    }

    /// The live effect, evicting it if it has expired
    pub fn get(&mut self, ability: AbilityId) -> Option<&ActiveAbilityEffect> {
        let now = self.clock.now_ms();
        if self.active.get(&ability)?.is_expired(now) {
            self.active.remove(&ability);
            return None;
        }
        self.active.get(&ability)
    }

    /// Milliseconds left on a live effect
    pub fn remaining_ms(&mut self, ability: AbilityId) -> Option<u64> {
        let now = self.clock.now_ms();
        self.get(ability).map(|e| e.ends_at_ms.saturating_sub(now))
    }

    /// True at most once per interval window while the effect is live.
    /// Stamps the trigger time when it fires.
    pub fn should_trigger_periodic(&mut self, ability: AbilityId) -> bool {
        let now = self.clock.now_ms();
        if !self.is_active(ability) {
            return false;
        }
        let Some(trigger) = self
            .active
            .get_mut(&ability)
            .and_then(|e| e.periodic.as_mut())
        else {
            return false;
        };
        if now.saturating_sub(trigger.last_trigger_ms) < trigger.interval_ms {
            return false;
        }
        trigger.last_trigger_ms = now;
        true
    }

    /// Live abilities in id order, evicting expired ones
    pub fn active_ids(&mut self) -> Vec<AbilityId> {
        let now = self.clock.now_ms();
        self.active.retain(|_, e| !e.is_expired(now));
        let mut ids: Vec<_> = self.active.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn deactivate(&mut self, ability: AbilityId) -> Option<ActiveAbilityEffect> {
        self.active.remove(&ability)
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Effects that last a number of spawned pieces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountedEffects {
    remaining: HashMap<AbilityId, u32>,
}

impl CountedEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or reset) the count. A zero count removes the effect.
    pub fn activate(&mut self, ability: AbilityId, count: u32) {
        if count == 0 {
            self.remaining.remove(&ability);
        } else {
            self.remaining.insert(ability, count);
        }
    }

    /// Use one charge. Returns false when the effect was not active.
    pub fn consume(&mut self, ability: AbilityId) -> bool {
        let Some(left) = self.remaining.get_mut(&ability) else {
            return false;
        };
        *left -= 1;
        if *left == 0 {
            self.remaining.remove(&ability);
        }
        true
    }

    pub fn remaining(&self, ability: AbilityId) -> u32 {
        self.remaining.get(&ability).copied().unwrap_or(0)
    }

    pub fn is_active(&self, ability: AbilityId) -> bool {
        self.remaining.contains_key(&ability)
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use versus_tetris_core::ManualClock;

    #[test]
    fn expires_lazily() {
        let clock = ManualClock::new(1_000);
        let mut tracker = EffectTracker::new(clock.clone());
        tracker.activate(AbilityId::Earthquake, 500, json!({}));

        clock.advance(499);
        assert!(tracker.is_active(AbilityId::Earthquake));
        assert_eq!(tracker.remaining_ms(AbilityId::Earthquake), Some(1));

        clock.advance(1);
        assert!(!tracker.is_active(AbilityId::Earthquake));
        assert!(tracker.deactivate(AbilityId::Earthquake).is_none());
    }

    #[test]
    fn reactivation_resets_timer() {
        let clock = ManualClock::new(0);
        let mut tracker = EffectTracker::new(clock.clone());
        tracker.activate(AbilityId::Scramble, 100, json!(null));
        clock.advance(80);
        tracker.activate(AbilityId::Scramble, 100, json!(null));
        clock.advance(80);
        assert!(tracker.is_active(AbilityId::Scramble));
    }

    #[test]
    fn periodic_fires_once_per_window() {
        let clock = ManualClock::new(0);
        let mut tracker = EffectTracker::new(clock.clone());
        tracker.activate_periodic(AbilityId::RandomSpawner, 1_000, 300, json!({"cells": 1}));

        assert!(!tracker.should_trigger_periodic(AbilityId::RandomSpawner));
        clock.advance(300);
        assert!(tracker.should_trigger_periodic(AbilityId::RandomSpawner));
        assert!(!tracker.should_trigger_periodic(AbilityId::RandomSpawner));
        clock.advance(299);
        assert!(!tracker.should_trigger_periodic(AbilityId::RandomSpawner));
        clock.advance(1);
        assert!(tracker.should_trigger_periodic(AbilityId::RandomSpawner));

        clock.set(1_000);
        assert!(!tracker.should_trigger_periodic(AbilityId::RandomSpawner));
        assert!(tracker.active_ids().is_empty());
    }

    #[test]
    fn plain_effects_never_trigger() {
        let clock = ManualClock::new(0);
        let mut tracker = EffectTracker::new(clock.clone());
        tracker.activate(AbilityId::GravityFlip, 1_000, json!({}));
        clock.advance(500);
        assert!(!tracker.should_trigger_periodic(AbilityId::GravityFlip));
        assert_eq!(
            tracker.get(AbilityId::GravityFlip).map(|e| e.started_at_ms),
            Some(0)
        );
    }

    #[test]
    fn counted_effects_decrement_to_zero() {
        let mut counted = CountedEffects::new();
        counted.activate(AbilityId::DominoPieces, 2);
        assert!(counted.consume(AbilityId::DominoPieces));
        assert_eq!(counted.remaining(AbilityId::DominoPieces), 1);
        assert!(counted.consume(AbilityId::DominoPieces));
        assert!(!counted.is_active(AbilityId::DominoPieces));
        assert!(!counted.consume(AbilityId::DominoPieces));

        counted.activate(AbilityId::HollowPieces, 0);
        assert!(!counted.is_active(AbilityId::HollowPieces));
    }
}
