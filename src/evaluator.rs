//! Host-side escape-time evaluation.
//!
//! `julia.wgsl` runs the same steps per fragment on the GPU. Keep the two in sync.

use crate::{
    colour::{self, Rgba},
    complex::Complex,
    screen::{Point, Size},
    state::{InteractionState, RenderConfig, ViewState},
};

/// `|z|^2` above which a point has escaped.
pub const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// Map a surface position to the complex plane.
///
/// The plane's imaginary axis grows upward while `pixel.y` grows downward.
pub fn plane_point(pixel: Point, resolution: Size, view: &ViewState) -> Complex {
    let scale = resolution.pixels_per_unit(view.zoom);
    Complex {
        real: (pixel.x - 0.5 * resolution.width as f64) / scale + view.offset.real,
        imaginary: (0.5 * resolution.height as f64 - pixel.y) / scale + view.offset.imaginary,
    }
}

/// Number of `z <- z^2 + c` steps taken from `z0` before escaping, capped at `max_iterations`.
pub fn escape_time(z0: Complex, c: Complex, max_iterations: u32) -> u32 {
    let mut z = z0;
    let mut iteration = 0;
    while iteration < max_iterations {
        if z.norm_squared() > ESCAPE_RADIUS_SQUARED {
            break;
        }
        z = z.square() + c;
        iteration += 1;
    }
    iteration
}

/// `iterations / max_iterations`, flipped when inverted.
pub fn escape_fraction(iterations: u32, config: &RenderConfig) -> f32 {
    let t = iterations as f32 / config.max_iterations as f32;
    if config.invert {
        1.0 - t
    } else {
        t
    }
}

/// Colour of the pixel centred at `pixel`.
pub fn shade(pixel: Point, state: &InteractionState) -> Rgba {
    let z0 = plane_point(pixel, state.resolution, &state.view);
    let iterations = escape_time(z0, state.julia, state.config.max_iterations);
    let t = escape_fraction(iterations, &state.config);
    colour::colour(t, state.config.colour_mode)
}
