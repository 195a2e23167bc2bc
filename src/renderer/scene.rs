//! Scene builder: snapshot to triangles
//!
//! Stateless. Everything is emitted in pixel space (origin top-left, y down),
//! back to front: walls, obstacles, projectiles, explosions, food, snake,
//! trail.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::shapes::{arc, circle, cross, line, rect, ring};
use super::vertex::{Vertex, colors};
use crate::sim::food::FoodKind;
use crate::sim::grid::Direction;
use crate::snapshot::{FoodView, ParticleView, RenderSnapshot};

const CIRCLE_SEGMENTS: u32 = 16;
const SMALL_SEGMENTS: u32 = 8;

/// Build the triangle list for one frame
pub fn build_scene(snap: &RenderSnapshot) -> Vec<Vertex> {
    let g = snap.grid_size;
    let mut v = Vec::with_capacity(4096);

    if let Some(color) = snap.walls {
        let last = snap.tile_count - 1;
        for y in 0..snap.tile_count {
            for x in 0..snap.tile_count {
                if x == 0 || y == 0 || x == last || y == last {
                    let min = Vec2::new(x as f32, y as f32) * g;
                    v.extend(rect(min, min + Vec2::splat(g), color));
                }
            }
        }
    }

    for obstacle in &snap.obstacles {
        let min = Vec2::new(obstacle.cell.x as f32, obstacle.cell.y as f32) * g;
        v.extend(rect(min + Vec2::ONE, min + Vec2::splat(g - 1.0), obstacle.color));
        if obstacle.health > 1 {
            // One pip per remaining hit
            for i in 0..obstacle.health {
                let c = min + Vec2::new(4.0 + i as f32 * 5.0, g * 0.5);
                v.extend(circle(c, 1.5, colors::HEALTH_PIP, SMALL_SEGMENTS));
            }
        }
    }

    for pos in &snap.projectiles {
        let c = (*pos + 0.5) * g;
        v.extend(circle(c, snap.projectile_size, snap.projectile_color, SMALL_SEGMENTS));
    }

    for p in &snap.explosions {
        v.extend(particle(p, g, 3.0));
    }

    if let Some(food) = &snap.food {
        food_sprite(&mut v, food, g);
    }

    snake(&mut v, snap, g);
    v.extend(intoxication_halo(snap));

    for p in &snap.trail {
        v.extend(particle(p, g, 2.0));
    }

    v
}

fn particle(p: &ParticleView, g: f32, size: f32) -> Vec<Vertex> {
    circle(p.pos * g, size * p.life.max(0.2), p.color, SMALL_SEGMENTS)
}

/// Countdown ring colour: green while fresh, then orange, then red
pub fn expiry_ring_color(remaining: f32) -> [f32; 4] {
    if remaining > 0.6 {
        colors::RING_FRESH
    } else if remaining > 0.3 {
        colors::RING_AGING
    } else {
        colors::RING_EXPIRING
    }
}

fn food_color(kind: FoodKind) -> [f32; 4] {
    match kind {
        FoodKind::Apple => colors::APPLE,
        FoodKind::Grapes => colors::GRAPES,
        FoodKind::Orange => colors::ORANGE,
        FoodKind::Watermelon => colors::WATERMELON,
        FoodKind::Strawberry => colors::STRAWBERRY,
        FoodKind::Banana => colors::BANANA,
        FoodKind::Cherry => colors::CHERRY,
        FoodKind::Beer => colors::BEER,
        FoodKind::Toxic => colors::TOXIC,
    }
}

fn food_sprite(v: &mut Vec<Vertex>, food: &FoodView, g: f32) {
    let c = (Vec2::new(food.cell.x as f32, food.cell.y as f32) + 0.5) * g;
    let r = g * 0.5 - 3.0;
    v.extend(circle(c, r, food_color(food.kind), CIRCLE_SEGMENTS));

    match food.kind {
        FoodKind::Beer => v.extend(rect(
            c + Vec2::new(-r, -r),
            c + Vec2::new(r, -r * 0.4),
            colors::BEER_FOAM,
        )),
        FoodKind::Toxic => v.extend(cross(c, r * 0.5, 2.0, colors::TOXIC_MARK)),
        _ => {}
    }

    // Countdown ring, starting at twelve o'clock
    v.extend(arc(
        c,
        g * 0.5 - 1.5,
        g * 0.5,
        -FRAC_PI_2,
        TAU * food.remaining,
        expiry_ring_color(food.remaining),
        CIRCLE_SEGMENTS,
    ));
}

fn snake(v: &mut Vec<Vertex>, snap: &RenderSnapshot, g: f32) {
    let size = g - 2.0;
    for seg in snap.segments.iter().skip(1).rev() {
        let c = (seg.pos + 0.5) * g;
        v.extend(circle(c, size * 0.5, seg.color, CIRCLE_SEGMENTS));
        let mut highlight = colors::HIGHLIGHT;
        highlight[3] *= seg.color[3];
        v.extend(circle(c - Vec2::splat(size / 6.0), size / 4.0, highlight, SMALL_SEGMENTS));
    }

    let Some(head) = snap.segments.first() else {
        return;
    };
    let c = (head.pos + 0.5) * g;
    v.extend(circle(c, g * 0.5 - 1.0, snap.head_color, CIRCLE_SEGMENTS));

    // At rest the head looks up
    let facing = snap.head_direction.unwrap_or(Direction::Up);
    let forward = facing.as_vec2();
    let side = Vec2::new(-forward.y, forward.x);
    let eyes = [c + forward * 4.0 - side * 5.0, c + forward * 4.0 + side * 5.0];

    if snap.dying_progress.is_some() {
        for eye in eyes {
            v.extend(cross(eye, 3.0, 2.0, colors::EYE_WHITE));
        }
        return;
    }

    for eye in eyes {
        v.extend(circle(eye, 4.0, colors::EYE_WHITE, SMALL_SEGMENTS));
        v.extend(circle(eye + forward, 2.0, colors::PUPIL, SMALL_SEGMENTS));
    }

    if snap.frame % 20 < 10 {
        let base = c + forward * (g * 0.5);
        let fork = c + forward * (g * 0.5 + 5.0);
        let tip = c + forward * (g * 0.5 + 8.0);
        v.extend(line(base, fork, 2.0, colors::TONGUE));
        v.extend(line(fork, tip + side * 2.0, 2.0, colors::TONGUE));
        v.extend(line(fork, tip - side * 2.0, 2.0, colors::TONGUE));
    }
}

/// Ring drawn around the head while intoxicated
fn intoxication_halo(snap: &RenderSnapshot) -> Vec<Vertex> {
    match (snap.intoxicated, snap.segments.first()) {
        (true, Some(head)) => {
            let g = snap.grid_size;
            let wobble = (snap.frame as f32 * 0.3).sin() * 1.5;
            ring(
                (head.pos + 0.5) * g,
                g * 0.5 + 1.0,
                g * 0.5 + 2.5 + wobble,
                colors::BEER,
                CIRCLE_SEGMENTS,
            )
        }
        _ => Vec::new(),
    }
}
