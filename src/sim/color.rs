//! Colours and the snake segment palette
//!
//! `segment_color` is a pure function of its inputs so the same frame always
//! paints the same snake.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Safe fallback for malformed colour strings
pub const FALLBACK_COLOR: Rgb = Rgb::new(0x00, 0x00, 0xff);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("colour `{0}` must be #rrggbb")]
    BadLength(String),
    #[error("colour `{0}` has non-hex digits")]
    BadDigit(String),
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, falling back to [`FALLBACK_COLOR`] with a warning
    pub fn parse_or_fallback(s: &str) -> Self {
        s.parse().unwrap_or_else(|e: ColorParseError| {
            log::warn!("{e}; using {FALLBACK_COLOR}");
            FALLBACK_COLOR
        })
    }

    /// Scale each channel toward black by `factor` (0 = unchanged, 1 = black)
    pub fn darken(self, factor: f32) -> Self {
        let f = |c: u8| (c as f32 * (1.0 - factor)).floor().clamp(0.0, 255.0) as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Move each channel toward white by `factor`
    pub fn lighten(self, factor: f32) -> Self {
        let f = |c: u8| {
            let c = c as f32;
            (c + (255.0 - c) * factor).floor().clamp(0.0, 255.0) as u8
        };
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Hue in degrees `[0, 360)`; greys report 0
    pub fn hue(self) -> f32 {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max == min {
            return 0.0;
        }
        let delta = max - min;
        let mut hue = if max == r {
            (g - b) / delta * 60.0
        } else if max == g {
            (2.0 + (b - r) / delta) * 60.0
        } else {
            (4.0 + (r - g) / delta) * 60.0
        };
        if hue < 0.0 {
            hue += 360.0;
        }
        hue
    }

    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError::BadLength(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ColorParseError::BadDigit(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// HSL colour (hue degrees, saturation and lightness in percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let s = self.s / 100.0;
        let l = self.l / 100.0;
        let h = self.h.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        [r + m, g + m, b + m, alpha]
    }
}

/// A display colour in whichever space the palette produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Color {
    Rgb(Rgb),
    Hsl(Hsl),
}

impl Color {
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        match self {
            Color::Rgb(c) => c.to_rgba(alpha),
            Color::Hsl(c) => c.to_rgba(alpha),
        }
    }
}

/// Visual pattern applied along the snake body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnakePattern {
    #[default]
    Classic,
    Rainbow,
    Fire,
    Ocean,
    Neon,
    Metal,
}

impl SnakePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnakePattern::Classic => "classic",
            SnakePattern::Rainbow => "rainbow",
            SnakePattern::Fire => "fire",
            SnakePattern::Ocean => "ocean",
            SnakePattern::Neon => "neon",
            SnakePattern::Metal => "metal",
        }
    }

    /// Colours used for tail trail particles
    pub fn trail_palette(&self) -> &'static [Rgb] {
        const FIRE: [Rgb; 4] = [
            Rgb::new(0xff, 0xff, 0x00),
            Rgb::new(0xff, 0xa5, 0x00),
            Rgb::new(0xff, 0x45, 0x00),
            Rgb::new(0xff, 0x00, 0x00),
        ];
        const OCEAN: [Rgb; 4] = [
            Rgb::new(0x00, 0xff, 0xff),
            Rgb::new(0x00, 0xaa, 0xff),
            Rgb::new(0x00, 0x66, 0xff),
            Rgb::new(0x00, 0x33, 0xcc),
        ];
        const RAINBOW: [Rgb; 7] = [
            Rgb::new(0xff, 0x00, 0x00),
            Rgb::new(0xff, 0x88, 0x00),
            Rgb::new(0xff, 0xff, 0x00),
            Rgb::new(0x00, 0xff, 0x00),
            Rgb::new(0x00, 0x00, 0xff),
            Rgb::new(0x88, 0x00, 0xff),
            Rgb::new(0xff, 0x00, 0xff),
        ];
        const WARM: [Rgb; 3] = [
            Rgb::new(0xff, 0xff, 0x00),
            Rgb::new(0xff, 0xa5, 0x00),
            Rgb::new(0xff, 0x45, 0x00),
        ];
        match self {
            SnakePattern::Fire => &FIRE,
            SnakePattern::Ocean => &OCEAN,
            SnakePattern::Rainbow => &RAINBOW,
            _ => &WARM,
        }
    }
}

/// Colour of body segment `index` out of `total`
///
/// `frame` is the render animation counter; Rainbow, Neon and Metal animate
/// with it, the other patterns are static along the body.
pub fn segment_color(index: usize, total: usize, frame: u32, pattern: SnakePattern, base: Rgb) -> Color {
    let t = index as f32 / total.max(1) as f32;
    match pattern {
        SnakePattern::Classic => Color::Rgb(base.darken(t * 0.5)),
        SnakePattern::Rainbow => {
            let hue = ((index as u64 * 30 + frame as u64) % 360) as f32;
            Color::Hsl(Hsl { h: hue, s: 80.0, l: 60.0 })
        }
        SnakePattern::Fire => Color::Hsl(Hsl {
            h: 20.0 - t * 20.0,
            s: 100.0,
            l: 70.0 - t * 30.0,
        }),
        SnakePattern::Ocean => Color::Hsl(Hsl {
            h: 200.0 + t * 40.0,
            s: 80.0,
            l: 40.0 + t * 30.0,
        }),
        SnakePattern::Neon => {
            let pulse = (frame as f32 / 10.0 + index as f32).sin() * 0.5 + 0.5;
            Color::Hsl(Hsl {
                h: base.hue(),
                s: 100.0,
                l: 60.0 + pulse * 30.0,
            })
        }
        SnakePattern::Metal => {
            let metal = 0.3 + t * 0.7;
            let shade = base.darken(1.0 - metal);
            // Glint sweeps down the body every 15 frames
            if index % 3 == (frame as usize / 15) % 3 {
                Color::Rgb(shade.lighten(0.4))
            } else {
                Color::Rgb(shade)
            }
        }
    }
}
