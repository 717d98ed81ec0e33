//! Colouring algorithms.
//!
//! Mirrors `julia.wgsl#palette_colour` and the colour selection in
//! `julia.wgsl#fragment_main`, so frames can be checked on the host.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColourMode {
    #[default]
    Grayscale,
    /// Escape-time palette.
    Palette,
}

impl ColourMode {
    pub fn toggled(self) -> Self {
        match self {
            ColourMode::Grayscale => ColourMode::Palette,
            ColourMode::Palette => ColourMode::Grayscale,
        }
    }

    /// Value of the `colour_mode` uniform.
    pub fn as_uniform(self) -> u32 {
        match self {
            ColourMode::Grayscale => 0,
            ColourMode::Palette => 1,
        }
    }
}

impl fmt::Display for ColourMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColourMode::Grayscale => f.write_str("Grayscale"),
            ColourMode::Palette => f.write_str("Escape-Time Palette"),
        }
    }
}

/// Colour of a single pixel, channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Rgba {
    pub const BLACK: Self = Rgba::opaque([0.0, 0.0, 0.0]);
    pub const WHITE: Self = Rgba::opaque([1.0, 1.0, 1.0]);

    pub const fn opaque([red, green, blue]: [f32; 3]) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }
}

/// Anchors of the escape-time palette, evenly spaced over `[0, 1]`.
pub const PALETTE: [[f32; 3]; 5] = [
    [0.0, 0.0, 0.0],
    [0.1, 0.1, 0.5],
    [0.3, 0.7, 0.9],
    [0.8, 0.9, 0.3],
    [1.0, 1.0, 1.0],
];

/// Linear interpolation across [`PALETTE`]. `t` is expected in `[0, 1]`.
pub fn palette(t: f32) -> Rgba {
    let last = PALETTE.len() - 1;
    let scaled = t * last as f32;
    let lower = (scaled as usize).min(last);
    let upper = (lower + 1).min(last);
    let fraction = scaled.fract();

    let [r0, g0, b0] = PALETTE[lower];
    let [r1, g1, b1] = PALETTE[upper];
    Rgba::opaque([
        mix(r0, r1, fraction),
        mix(g0, g1, fraction),
        mix(b0, b1, fraction),
    ])
}

pub fn colour(t: f32, mode: ColourMode) -> Rgba {
    match mode {
        ColourMode::Grayscale => Rgba::opaque([t, t, t]),
        ColourMode::Palette => palette(t),
    }
}

fn mix(from: f32, to: f32, fraction: f32) -> f32 {
    from * (1.0 - fraction) + to * fraction
}
