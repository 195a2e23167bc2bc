//! The player's snake
//!
//! Head is index 0. Previous-tick positions are kept so the renderer can
//! interpolate between ticks.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction, GridModel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    segments: VecDeque<Cell>,
    /// Segment positions before the last committed move
    prev_segments: Vec<Cell>,
    /// None while stationary
    velocity: Option<Direction>,
    /// Render animation counter (advanced once per frame)
    pub animation_frame: u32,
}

impl Snake {
    /// Single-segment snake at rest
    pub fn new(start: Cell) -> Self {
        Self {
            segments: VecDeque::from([start]),
            prev_segments: vec![start],
            velocity: None,
            animation_frame: 0,
        }
    }

    /// Snake from explicit cells (head first)
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>, velocity: Option<Direction>) -> Self {
        let segments: VecDeque<Cell> = cells.into_iter().collect();
        let prev_segments = segments.iter().copied().collect();
        Self {
            segments,
            prev_segments,
            velocity,
            animation_frame: 0,
        }
    }

    pub fn head(&self) -> Cell {
        // segments is never empty: constructors seed one cell and moves prepend
        // before they pop
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.segments.iter().copied()
    }

    pub fn velocity(&self) -> Option<Direction> {
        self.velocity
    }

    pub fn is_moving(&self) -> bool {
        self.velocity.is_some()
    }

    /// Change travel direction. A direct reversal is ignored.
    /// Returns whether the velocity changed.
    pub fn set_velocity(&mut self, dir: Direction) -> bool {
        match self.velocity {
            Some(current) if current == dir.opposite() => false,
            Some(current) if current == dir => false,
            _ => {
                self.velocity = Some(dir);
                true
            }
        }
    }

    /// Candidate head after one step in `dir`
    ///
    /// With `wrap` each axis is wrapped into the grid; otherwise the raw,
    /// possibly out-of-bounds cell is returned for the caller to judge.
    pub fn compute_next_head(&self, dir: Direction, grid: &GridModel, wrap: bool) -> Cell {
        let next = self.head().step(dir);
        if wrap { grid.wrap(next) } else { next }
    }

    pub fn check_self_collision(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    /// Commit a move: prepend the head and drop the tail unless the snake ate
    pub fn grow_or_advance(&mut self, new_head: Cell, ate: bool) {
        self.prev_segments.clear();
        self.prev_segments.extend(self.segments.iter().copied());
        self.segments.push_front(new_head);
        if !ate {
            self.segments.pop_back();
        }
    }

    /// Segment positions blended toward the current tick by `alpha`
    ///
    /// A segment whose previous cell is more than one tile away on either
    /// axis just wrapped around the grid and is drawn at its new cell.
    /// Segments added by growth have no previous cell and snap as well.
    pub fn interpolated(&self, alpha: f32) -> Vec<Vec2> {
        let alpha = alpha.clamp(0.0, 1.0);
        self.segments
            .iter()
            .enumerate()
            .map(|(i, curr)| {
                let now = curr.as_vec2();
                match self.prev_segments.get(i) {
                    Some(prev) if (curr.x - prev.x).abs() <= 1 && (curr.y - prev.y).abs() <= 1 => {
                        let prev = prev.as_vec2();
                        prev + (now - prev) * alpha
                    }
                    _ => now,
                }
            })
            .collect()
    }
}
