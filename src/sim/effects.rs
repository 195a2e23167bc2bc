//! Timed status effects
//!
//! Two independent state machines, each Idle -> Pending -> Active -> Idle.
//! Timing is wall-clock (milliseconds supplied by the caller) so an effect
//! lasts the same time at every speed setting.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::food::FoodEffect;
use super::grid::Direction;
use crate::consts::{
    FOOD_EFFECT_DELAY_MS, FOOD_EFFECT_DURATION_MS, INTOXICATION_DELAY_MS,
    INTOXICATION_DURATION_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectPhase {
    Idle,
    /// Armed, waiting out the onset delay
    Pending,
    Active,
}

/// State changes reported by [`StatusEffects::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectEvent {
    IntoxicationStarted,
    IntoxicationEnded,
    VisualEffectStarted(FoodEffect),
    VisualEffectEnded,
}

impl EffectEvent {
    /// Status line shown to the player
    pub fn message(&self) -> String {
        match self {
            EffectEvent::IntoxicationStarted => "🍺 DRUNK! Snake moves randomly!".to_string(),
            EffectEvent::IntoxicationEnded => "Sober again!".to_string(),
            EffectEvent::VisualEffectStarted(effect) => {
                format!("✨ {} mode!", effect.pattern.as_str().to_uppercase())
            }
            EffectEvent::VisualEffectEnded => "Effect ended".to_string(),
        }
    }
}

/// Random steering after a beer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intoxication {
    pub onset_ms: f64,
    pub duration_ms: f64,
    armed_at: Option<f64>,
    active: bool,
    move_counter: u32,
}

impl Default for Intoxication {
    fn default() -> Self {
        Self {
            onset_ms: INTOXICATION_DELAY_MS,
            duration_ms: INTOXICATION_DURATION_MS,
            armed_at: None,
            active: false,
            move_counter: 0,
        }
    }
}

impl Intoxication {
    pub fn phase(&self) -> EffectPhase {
        match (self.armed_at, self.active) {
            (None, _) => EffectPhase::Idle,
            (Some(_), false) => EffectPhase::Pending,
            (Some(_), true) => EffectPhase::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Arm (or re-arm) at `now`; a running effect restarts its clock
    pub fn arm(&mut self, now: f64) {
        self.armed_at = Some(now);
        self.active = false;
        self.move_counter = 0;
    }

    fn update(&mut self, now: f64) -> Option<EffectEvent> {
        let armed_at = self.armed_at?;
        if !self.active && now >= armed_at + self.onset_ms && now <= armed_at + self.onset_ms + self.duration_ms {
            self.active = true;
            return Some(EffectEvent::IntoxicationStarted);
        }
        if now > armed_at + self.onset_ms + self.duration_ms {
            let was_active = self.active;
            self.armed_at = None;
            self.active = false;
            if was_active {
                return Some(EffectEvent::IntoxicationEnded);
            }
        }
        None
    }

    /// Effective direction for this tick
    ///
    /// While active every other move is replaced by a random turn at right
    /// angles to `base`, which can never reverse into the body.
    pub fn steer<R: Rng>(&mut self, rng: &mut R, base: Direction) -> Direction {
        if !self.active {
            return base;
        }
        self.move_counter += 1;
        if self.move_counter % 2 == 0 {
            let options = base.perpendicular();
            options[rng.random_range(0..options.len())]
        } else {
            base
        }
    }
}

/// Temporary colour/pattern override after eating an effect food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualEffect {
    pub onset_ms: f64,
    pub duration_ms: f64,
    pending: Option<FoodEffect>,
    armed_at: f64,
    expires_at: f64,
    active: Option<FoodEffect>,
}

impl Default for VisualEffect {
    fn default() -> Self {
        Self {
            onset_ms: FOOD_EFFECT_DELAY_MS,
            duration_ms: FOOD_EFFECT_DURATION_MS,
            pending: None,
            armed_at: 0.0,
            expires_at: 0.0,
            active: None,
        }
    }
}

impl VisualEffect {
    pub fn phase(&self) -> EffectPhase {
        if self.pending.is_some() {
            EffectPhase::Pending
        } else if self.active.is_some() {
            EffectPhase::Active
        } else {
            EffectPhase::Idle
        }
    }

    /// Queue `effect`. Re-arming replaces any pending target and pushes the
    /// expiry out; effects never stack.
    pub fn arm(&mut self, effect: FoodEffect, now: f64) {
        self.pending = Some(effect);
        self.armed_at = now;
        self.expires_at = now + self.onset_ms + self.duration_ms;
    }

    fn update(&mut self, now: f64) -> Option<EffectEvent> {
        if let Some(effect) = self.pending {
            if now >= self.armed_at + self.onset_ms {
                self.pending = None;
                self.active = Some(effect);
                return Some(EffectEvent::VisualEffectStarted(effect));
            }
            // The previous target keeps showing until the new one commits
            return None;
        }
        if self.active.is_some() && now >= self.expires_at {
            self.active = None;
            return Some(EffectEvent::VisualEffectEnded);
        }
        None
    }

    /// Override for the snake's colour and pattern, if any
    pub fn display(&self) -> Option<FoodEffect> {
        self.active
    }
}

/// Both effect machines, advanced together once per tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    pub intoxication: Intoxication,
    pub visual: VisualEffect,
}

impl StatusEffects {
    /// Advance both machines to `now`; returns any transitions in order
    pub fn update(&mut self, now: f64) -> Vec<EffectEvent> {
        [self.visual.update(now), self.intoxication.update(now)]
            .into_iter()
            .flatten()
            .collect()
    }
}
