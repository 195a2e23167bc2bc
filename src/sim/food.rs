//! Food types, weighted selection and expiry

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::{Rgb, SnakePattern};
use super::grid::{Cell, GridModel};
use super::placement::find_free_cell;
use crate::consts::FOOD_LIFETIME_MS;

/// Food kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Apple,
    Grapes,
    Orange,
    Watermelon,
    Strawberry,
    Banana,
    Cherry,
    /// Arms intoxication
    Beer,
    /// Eating it ends the run
    Toxic,
}

/// Colour and pattern a food temporarily paints the snake with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodEffect {
    pub color: Rgb,
    pub pattern: SnakePattern,
}

/// Static description of a food kind
#[derive(Debug, Clone, Copy)]
pub struct FoodSpec {
    pub kind: FoodKind,
    pub name: &'static str,
    pub emoji: &'static str,
    pub points: u32,
    /// Relative spawn weight (normalised against the table total)
    pub weight: u32,
    pub effect: Option<FoodEffect>,
}

pub static FOOD_TABLE: [FoodSpec; 9] = [
    FoodSpec {
        kind: FoodKind::Apple,
        name: "Apple",
        emoji: "🍎",
        points: 1,
        weight: 18,
        effect: None,
    },
    FoodSpec {
        kind: FoodKind::Grapes,
        name: "Grapes",
        emoji: "🍇",
        points: 2,
        weight: 15,
        effect: Some(FoodEffect {
            color: Rgb::new(0x8e, 0x44, 0xad),
            pattern: SnakePattern::Neon,
        }),
    },
    FoodSpec {
        kind: FoodKind::Orange,
        name: "Orange",
        emoji: "🍊",
        points: 2,
        weight: 15,
        effect: Some(FoodEffect {
            color: Rgb::new(0xff, 0x8c, 0x00),
            pattern: SnakePattern::Fire,
        }),
    },
    FoodSpec {
        kind: FoodKind::Watermelon,
        name: "Watermelon",
        emoji: "🍉",
        points: 3,
        weight: 12,
        effect: Some(FoodEffect {
            color: Rgb::new(0xff, 0x4d, 0x6d),
            pattern: SnakePattern::Rainbow,
        }),
    },
    FoodSpec {
        kind: FoodKind::Strawberry,
        name: "Strawberry",
        emoji: "🍓",
        points: 2,
        weight: 12,
        effect: Some(FoodEffect {
            color: Rgb::new(0xe6, 0x19, 0x2e),
            pattern: SnakePattern::Fire,
        }),
    },
    FoodSpec {
        kind: FoodKind::Banana,
        name: "Banana",
        emoji: "🍌",
        points: 2,
        weight: 10,
        effect: Some(FoodEffect {
            color: Rgb::new(0xff, 0xd7, 0x00),
            pattern: SnakePattern::Metal,
        }),
    },
    FoodSpec {
        kind: FoodKind::Cherry,
        name: "Cherry",
        emoji: "🍒",
        points: 3,
        weight: 8,
        effect: Some(FoodEffect {
            color: Rgb::new(0x1e, 0x90, 0xff),
            pattern: SnakePattern::Ocean,
        }),
    },
    FoodSpec {
        kind: FoodKind::Beer,
        name: "Beer",
        emoji: "🍺",
        points: 5,
        weight: 7,
        effect: None,
    },
    FoodSpec {
        kind: FoodKind::Toxic,
        name: "Toxic",
        emoji: "☠️",
        points: 0,
        weight: 3,
        effect: None,
    },
];

impl FoodKind {
    pub fn spec(self) -> &'static FoodSpec {
        FOOD_TABLE
            .iter()
            .find(|s| s.kind == self)
            .unwrap_or(&FOOD_TABLE[0])
    }

    pub fn is_lethal(self) -> bool {
        self == FoodKind::Toxic
    }
}

/// Weighted pick over `table`; weights need not sum to any constant
pub fn pick_weighted<'a, R: Rng>(rng: &mut R, table: &'a [FoodSpec]) -> &'a FoodSpec {
    let total: u32 = table.iter().map(|s| s.weight).sum();
    if total == 0 {
        return &table[0];
    }
    let mut roll = rng.random_range(0..total);
    for spec in table {
        if roll < spec.weight {
            return spec;
        }
        roll -= spec.weight;
    }
    &table[table.len() - 1]
}

/// The active food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub kind: FoodKind,
    pub points: u32,
    pub cell: Cell,
    /// Wall-clock spawn time (ms)
    pub spawned_at: f64,
    pub effect: Option<FoodEffect>,
}

impl Food {
    pub fn new(kind: FoodKind, cell: Cell, spawned_at: f64) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            points: spec.points,
            cell,
            spawned_at,
            effect: spec.effect,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.spec().name
    }

    pub fn emoji(&self) -> &'static str {
        self.kind.spec().emoji
    }
}

/// Owns the single active food and its lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSpawner {
    current: Option<Food>,
    pub lifetime_ms: f64,
}

impl Default for FoodSpawner {
    fn default() -> Self {
        Self {
            current: None,
            lifetime_ms: FOOD_LIFETIME_MS,
        }
    }
}

impl FoodSpawner {
    pub fn current(&self) -> Option<&Food> {
        self.current.as_ref()
    }

    /// Place a fixed food (tests and scripted setups)
    pub fn place(&mut self, food: Food) {
        self.current = Some(food);
    }

    /// Take the food if it sits on `cell`
    pub fn take_at(&mut self, cell: Cell) -> Option<Food> {
        if self.current.as_ref().is_some_and(|f| f.cell == cell) {
            self.current.take()
        } else {
            None
        }
    }

    /// Replace the current food with a freshly rolled one
    ///
    /// `occupied` must report snake, obstacle and projectile cells. On a
    /// saturated grid the spawner is left empty and None is returned so the
    /// caller can retry next tick.
    pub fn spawn<R, F>(&mut self, rng: &mut R, grid: &GridModel, occupied: F, now: f64) -> Option<&Food>
    where
        R: Rng,
        F: Fn(Cell) -> bool,
    {
        let spec = pick_weighted(rng, &FOOD_TABLE);
        self.current = find_free_cell(rng, grid, occupied).map(|cell| Food::new(spec.kind, cell, now));
        match &self.current {
            Some(food) => log::debug!("spawned {} at ({}, {})", food.name(), food.cell.x, food.cell.y),
            None => log::warn!("no free cell for food, deferring spawn"),
        }
        self.current.as_ref()
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.current
            .as_ref()
            .is_some_and(|f| now - f.spawned_at > self.lifetime_ms)
    }

    /// Fraction of lifetime left, for the countdown ring
    pub fn remaining_fraction(&self, now: f64) -> f32 {
        match &self.current {
            Some(food) => (1.0 - (now - food.spawned_at) / self.lifetime_ms).clamp(0.0, 1.0) as f32,
            None => 0.0,
        }
    }
}
