//! Cosmetic particles: tail trail and obstacle bursts
//!
//! Nothing here affects gameplay. Positions are in grid units measured from
//! the grid origin (cell centres sit at `x + 0.5`).

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::{Rgb, SnakePattern};
use super::grid::Cell;
use crate::consts::{GRID_SIZE, MAX_BURST_PARTICLES, MAX_TRAIL_PARTICLES};

/// Particles emitted per obstacle burst
pub const BURST_SIZE: usize = 12;
const TRAIL_LIFE: u32 = 30;
const BURST_LIFE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Grid units per frame
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
    pub color: Rgb,
}

impl Particle {
    /// Remaining life in `[0, 1]`, used for fading
    pub fn life_fraction(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSystem {
    trail: VecDeque<Particle>,
    bursts: VecDeque<Particle>,
    pub max_trail: usize,
    pub max_bursts: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self {
            trail: VecDeque::new(),
            bursts: VecDeque::new(),
            max_trail: MAX_TRAIL_PARTICLES,
            max_bursts: MAX_BURST_PARTICLES,
        }
    }
}

/// Unit step from the segment before the tail to the tail
///
/// A delta longer than one cell means the tail just wrapped across an edge,
/// so the real step points the other way.
fn trail_step(delta: i32) -> i32 {
    match delta {
        -1..=1 => delta,
        _ => -delta.signum(),
    }
}

impl ParticleSystem {
    /// Emit trail particles just behind the tail
    ///
    /// Gated to even frames, a speed above the slowest step, a snake longer
    /// than one segment, and either the fire pattern or speed index 4+.
    pub fn spawn_trail<R: Rng>(
        &mut self,
        rng: &mut R,
        segments: &[Cell],
        pattern: SnakePattern,
        speed_index: usize,
        frame: u32,
    ) {
        let fire = pattern == SnakePattern::Fire;
        if frame % 2 != 0 || speed_index == 0 || segments.len() < 2 || !(fire || speed_index >= 4) {
            return;
        }

        let tail = segments[segments.len() - 1];
        let before = segments[segments.len() - 2];
        let (dx, dy) = (trail_step(tail.x - before.x), trail_step(tail.y - before.y));
        let origin = Vec2::new((tail.x + dx) as f32 + 0.5, (tail.y + dy) as f32 + 0.5);

        let base = if fire { 2 } else { 1 };
        let count = (base + speed_index / 3).min(3);
        let palette = pattern.trail_palette();

        for _ in 0..count {
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0,
                -rng.random::<f32>() * 2.0 - 1.0,
            ) / GRID_SIZE;
            self.trail.push_back(Particle {
                pos: origin,
                vel,
                life: TRAIL_LIFE,
                max_life: TRAIL_LIFE,
                color: palette[rng.random_range(0..palette.len())],
            });
        }
    }

    /// Ring of particles bursting out from `pos`
    pub fn spawn_burst<R: Rng>(&mut self, rng: &mut R, pos: Vec2, color: Rgb) {
        for i in 0..BURST_SIZE {
            let angle = (i as f32 / BURST_SIZE as f32) * std::f32::consts::TAU;
            let speed = (2.0 + rng.random::<f32>() * 2.0) / GRID_SIZE;
            self.bursts.push_back(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: BURST_LIFE,
                max_life: BURST_LIFE,
                color,
            });
        }
    }

    /// Advance one animation frame and drop dead particles
    pub fn tick(&mut self) {
        for list in [&mut self.trail, &mut self.bursts] {
            for p in list.iter_mut() {
                p.pos += p.vel;
                p.life = p.life.saturating_sub(1);
            }
            list.retain(|p| p.life > 0);
        }
    }

    /// Evict the oldest particles beyond the caps
    pub fn enforce_caps(&mut self) {
        while self.trail.len() > self.max_trail {
            self.trail.pop_front();
        }
        while self.bursts.len() > self.max_bursts {
            self.bursts.pop_front();
        }
    }

    pub fn trail(&self) -> impl Iterator<Item = &Particle> {
        self.trail.iter()
    }

    pub fn bursts(&self) -> impl Iterator<Item = &Particle> {
        self.bursts.iter()
    }
}
