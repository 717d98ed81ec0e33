//! Viewer state and how input mutates it.

use std::fmt;

use log::{debug, warn};

use crate::{
    colour::ColourMode,
    complex::Complex,
    evaluator,
    input::{Command, Input, ScrollDirection},
    screen::{Point, Size},
};

/// Multiplier applied to `zoom` per scroll step.
pub const ZOOM_FACTOR: f64 = 1.1;

pub const JULIA_STEP: f64 = 0.01;

pub const ITERATION_STEP: u32 = 100;

/// Default and lowest iteration cap.
pub const MIN_ITERATIONS: u32 = 100;

/// Above this, double precision stops paying for the extra iterations.
pub const PRECISION_ITERATION_LIMIT: u32 = 5000;

pub const INITIAL_JULIA: Complex = Complex::new(-0.7, 0.27015);

/// Affine mapping from the surface to the complex plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// Always positive.
    pub zoom: f64,
    pub offset: Complex,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Complex::ZERO,
        }
    }
}

impl ViewState {
    /// Zoom by one step, keeping the plane point under `cursor` where it is.
    pub fn zoom_at(&mut self, cursor: Point, resolution: Size, direction: ScrollDirection) {
        let anchor = evaluator::plane_point(cursor, resolution, self);

        let zoom = match direction {
            ScrollDirection::In => self.zoom * ZOOM_FACTOR,
            ScrollDirection::Out => self.zoom / ZOOM_FACTOR,
        };
        // Underflow to zero or overflow to infinity would break the mapping.
        if !zoom.is_normal() {
            warn!("zoom limit reached at {:e}", self.zoom);
            return;
        }
        self.zoom = zoom;

        let drifted = evaluator::plane_point(cursor, resolution, self);
        self.offset = self.offset + (anchor - drifted);
    }

    /// Move the view so the plane follows a drag of `(dx, dy)` pixels.
    pub fn pan(&mut self, dx: f64, dy: f64, resolution: Size) {
        let scale = resolution.pixels_per_unit(self.zoom);
        self.offset.real -= dx / scale;
        self.offset.imaginary += dy / scale;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Never below [`MIN_ITERATIONS`].
    pub max_iterations: u32,
    pub invert: bool,
    pub colour_mode: ColourMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_iterations: MIN_ITERATIONS,
            invert: false,
            colour_mode: ColourMode::Grayscale,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub active: bool,
    pub last: Point,
}

/// A discrete change worth reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Change {
    ColourMode(ColourMode),
    Invert(bool),
    MaxIterations(u32),
    JuliaReal { value: f64, increased: bool },
    JuliaImaginary { value: f64, increased: bool },
    Quit,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn direction(increased: bool) -> &'static str {
            if increased {
                "increased"
            } else {
                "decreased"
            }
        }

        match self {
            Change::ColourMode(mode) => write!(f, "Colour mode: {}", mode),
            Change::Invert(invert) => write!(
                f,
                "Inversion mode: {}",
                if *invert { "Enabled" } else { "Disabled" }
            ),
            Change::MaxIterations(max_iterations) => {
                write!(f, "Max iterations: {}", max_iterations)
            }
            Change::JuliaReal { value, increased } => write!(
                f,
                "Julia constant (real part) {} to {:.5}",
                direction(*increased),
                value
            ),
            Change::JuliaImaginary { value, increased } => write!(
                f,
                "Julia constant (imaginary part) {} to {:.5}",
                direction(*increased),
                value
            ),
            Change::Quit => f.write_str("Quitting"),
        }
    }
}

/// Everything the fragment shader needs, plus the transient pointer state that
/// feeds it. Written by [`InteractionState::apply`], read once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionState {
    pub view: ViewState,
    /// The constant `c` in `z <- z^2 + c`.
    pub julia: Complex,
    pub config: RenderConfig,
    pub drag: DragState,
    /// Unknown until the first cursor motion.
    pub cursor: Option<Point>,
    pub resolution: Size,
}

impl InteractionState {
    pub fn new(resolution: Size) -> Self {
        Self {
            view: ViewState::default(),
            julia: INITIAL_JULIA,
            config: RenderConfig::default(),
            drag: DragState::default(),
            cursor: None,
            resolution,
        }
    }

    pub fn resize(&mut self, resolution: Size) {
        debug!("resolution now {:?}", resolution);
        self.resolution = resolution;
    }

    pub fn apply(&mut self, input: Input) -> Option<Change> {
        match input {
            Input::Scroll(direction) => {
                let Some(cursor) = self.cursor else {
                    debug!("ignoring scroll before the cursor position is known");
                    return None;
                };
                self.view.zoom_at(cursor, self.resolution, direction);
                debug!("zoom {} offset {:?}", self.view.zoom, self.view.offset);
                None
            }
            Input::CursorMoved(position) => {
                self.cursor = Some(position);
                if self.drag.active {
                    let dx = position.x - self.drag.last.x;
                    let dy = position.y - self.drag.last.y;
                    self.view.pan(dx, dy, self.resolution);
                    self.drag.last = position;
                }
                None
            }
            Input::PrimaryPressed => {
                match self.cursor {
                    Some(cursor) => {
                        self.drag = DragState {
                            active: true,
                            last: cursor,
                        }
                    }
                    None => debug!("ignoring press before the cursor position is known"),
                }
                None
            }
            Input::PrimaryReleased => {
                self.drag.active = false;
                None
            }
            Input::Command(command) => Some(self.run(command)),
            Input::CloseRequested => Some(Change::Quit),
        }
    }

    fn run(&mut self, command: Command) -> Change {
        match command {
            Command::ToggleColourMode => {
                self.config.colour_mode = self.config.colour_mode.toggled();
                Change::ColourMode(self.config.colour_mode)
            }
            Command::ToggleInvert => {
                self.config.invert = !self.config.invert;
                Change::Invert(self.config.invert)
            }
            Command::Quit => Change::Quit,
            Command::FewerIterations => {
                self.config.max_iterations = self
                    .config
                    .max_iterations
                    .saturating_sub(ITERATION_STEP)
                    .max(MIN_ITERATIONS);
                Change::MaxIterations(self.config.max_iterations)
            }
            Command::MoreIterations => {
                self.config.max_iterations =
                    self.config.max_iterations.saturating_add(ITERATION_STEP);
                if self.config.max_iterations > PRECISION_ITERATION_LIMIT {
                    warn!(
                        "{} iterations exceeds what double precision can resolve ({})",
                        self.config.max_iterations, PRECISION_ITERATION_LIMIT
                    );
                }
                Change::MaxIterations(self.config.max_iterations)
            }
            Command::IncreaseReal => {
                self.julia.real += JULIA_STEP;
                Change::JuliaReal {
                    value: self.julia.real,
                    increased: true,
                }
            }
            Command::DecreaseReal => {
                self.julia.real -= JULIA_STEP;
                Change::JuliaReal {
                    value: self.julia.real,
                    increased: false,
                }
            }
            Command::IncreaseImaginary => {
                self.julia.imaginary += JULIA_STEP;
                Change::JuliaImaginary {
                    value: self.julia.imaginary,
                    increased: true,
                }
            }
            Command::DecreaseImaginary => {
                self.julia.imaginary -= JULIA_STEP;
                Change::JuliaImaginary {
                    value: self.julia.imaginary,
                    increased: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::plane_point;
    use test_log::test;

    const RESOLUTION: Size = Size::new(1920, 1080);

    fn assert_close(a: Complex, b: Complex, tolerance: f64) {
        assert!(
            (a.real - b.real).abs() <= tolerance && (a.imaginary - b.imaginary).abs() <= tolerance,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let cursors = [
            Point::new(0.0, 0.0),
            Point::new(960.0, 540.0),
            Point::new(1919.0, 3.5),
            Point::new(123.25, 1000.75),
        ];
        for zoom in [1e-3, 1.0, 42.0, 1e9] {
            for cursor in cursors {
                for direction in [ScrollDirection::In, ScrollDirection::Out] {
                    let mut view = ViewState {
                        zoom,
                        offset: Complex::new(-0.3, 0.6),
                    };
                    let before = plane_point(cursor, RESOLUTION, &view);
                    view.zoom_at(cursor, RESOLUTION, direction);
                    let after = plane_point(cursor, RESOLUTION, &view);
                    assert_close(before, after, 1e-9 / zoom.min(1.0));
                }
            }
        }
    }

    #[test]
    fn zoom_steps_by_factor_and_stays_positive() {
        let mut view = ViewState::default();
        view.zoom_at(Point::default(), RESOLUTION, ScrollDirection::In);
        assert!((view.zoom - ZOOM_FACTOR).abs() < 1e-12);
        for _ in 0..10_000 {
            view.zoom_at(Point::default(), RESOLUTION, ScrollDirection::Out);
        }
        assert!(view.zoom > 0.0);
    }

    #[test]
    fn pan_is_reversible() {
        let mut state = InteractionState::new(RESOLUTION);
        state.view.zoom = 7.5;
        let original = state.view.offset;

        state.apply(Input::CursorMoved(Point::new(500.0, 500.0)));
        state.apply(Input::PrimaryPressed);
        state.apply(Input::CursorMoved(Point::new(620.0, 410.0)));
        assert_ne!(state.view.offset, original);
        state.apply(Input::CursorMoved(Point::new(500.0, 500.0)));
        state.apply(Input::PrimaryReleased);

        assert_close(state.view.offset, original, 1e-12);
    }

    #[test]
    fn drag_moves_plane_with_pointer() {
        let mut state = InteractionState::new(RESOLUTION);
        state.apply(Input::CursorMoved(Point::new(100.0, 100.0)));
        state.apply(Input::PrimaryPressed);
        state.apply(Input::CursorMoved(Point::new(208.0, 208.0)));

        // Dragging right and down reveals plane to the left and above.
        assert_close(state.view.offset, Complex::new(-0.1, 0.1), 1e-12);
    }

    #[test]
    fn motion_without_drag_only_tracks_cursor() {
        let mut state = InteractionState::new(RESOLUTION);
        state.apply(Input::CursorMoved(Point::new(10.0, 20.0)));
        state.apply(Input::PrimaryPressed);
        state.apply(Input::PrimaryReleased);
        state.apply(Input::CursorMoved(Point::new(300.0, 400.0)));

        assert_eq!(state.view, ViewState::default());
        assert_eq!(state.cursor, Some(Point::new(300.0, 400.0)));
        assert!(!state.drag.active);
    }

    #[test]
    fn scroll_and_press_wait_for_a_cursor_position() {
        let mut state = InteractionState::new(RESOLUTION);
        state.apply(Input::Scroll(ScrollDirection::In));
        state.apply(Input::PrimaryPressed);
        assert_eq!(state.view, ViewState::default());
        assert!(!state.drag.active);

        state.apply(Input::CursorMoved(Point::new(1500.0, 200.0)));
        let anchor = plane_point(Point::new(1500.0, 200.0), RESOLUTION, &state.view);
        state.apply(Input::Scroll(ScrollDirection::In));
        assert!((state.view.zoom - ZOOM_FACTOR).abs() < 1e-12);
        assert_close(
            plane_point(Point::new(1500.0, 200.0), RESOLUTION, &state.view),
            anchor,
            1e-12,
        );

        state.apply(Input::PrimaryPressed);
        assert_eq!(
            state.drag,
            DragState {
                active: true,
                last: Point::new(1500.0, 200.0)
            }
        );
    }

    #[test]
    fn iterations_never_drop_below_floor() {
        let mut state = InteractionState::new(RESOLUTION);
        for _ in 0..5 {
            assert_eq!(
                state.apply(Input::Command(Command::FewerIterations)),
                Some(Change::MaxIterations(MIN_ITERATIONS))
            );
        }
        state.apply(Input::Command(Command::MoreIterations));
        state.apply(Input::Command(Command::MoreIterations));
        assert_eq!(state.config.max_iterations, 300);
        for _ in 0..10 {
            state.apply(Input::Command(Command::FewerIterations));
        }
        assert_eq!(state.config.max_iterations, MIN_ITERATIONS);
    }

    #[test]
    fn julia_keys_step_by_a_hundredth() {
        let mut state = InteractionState::new(RESOLUTION);
        let change = state.apply(Input::Command(Command::IncreaseReal));
        assert_eq!(
            change.map(|change| change.to_string()),
            Some("Julia constant (real part) increased to -0.69000".to_string())
        );
        state.apply(Input::Command(Command::DecreaseImaginary));
        state.apply(Input::Command(Command::DecreaseImaginary));
        state.apply(Input::Command(Command::IncreaseImaginary));
        assert_close(state.julia, Complex::new(-0.69, 0.26015), 1e-12);
        state.apply(Input::Command(Command::DecreaseReal));
        assert_close(state.julia, Complex::new(-0.7, 0.26015), 1e-12);
        let change = state.apply(Input::Command(Command::IncreaseImaginary));
        assert_eq!(
            change.map(|change| change.to_string()),
            Some("Julia constant (imaginary part) increased to 0.27015".to_string())
        );
        assert_close(state.julia, INITIAL_JULIA, 1e-12);
    }

    #[test]
    fn quit_and_close_both_stop() {
        let mut state = InteractionState::new(RESOLUTION);
        assert_eq!(state.apply(Input::Command(Command::Quit)), Some(Change::Quit));
        assert_eq!(state.apply(Input::CloseRequested), Some(Change::Quit));
    }

    #[test]
    fn pressing_invert_complements_the_next_frame() {
        let mut state = InteractionState::new(RESOLUTION);
        assert_eq!(state.view, ViewState::default());
        assert_eq!(state.julia, Complex::new(-0.7, 0.27015));
        assert_eq!(state.config, RenderConfig::default());

        let pixels = [
            Point::new(960.5, 540.5),
            Point::new(0.5, 0.5),
            Point::new(700.5, 600.5),
            Point::new(1200.5, 300.5),
        ];
        let before: Vec<_> = pixels
            .iter()
            .map(|&pixel| evaluator::shade(pixel, &state))
            .collect();

        let change = state.apply(Input::Command(Command::ToggleInvert));
        assert_eq!(change, Some(Change::Invert(true)));
        assert_eq!(
            change.map(|change| change.to_string()),
            Some("Inversion mode: Enabled".to_string())
        );

        for (pixel, before) in pixels.iter().zip(before) {
            let after = evaluator::shade(*pixel, &state);
            assert!((before.red + after.red - 1.0).abs() < 1e-6);
            assert_eq!(after.red, after.green);
            assert_eq!(after.green, after.blue);
        }
    }

    #[test]
    fn toggles_twice_restore_config() {
        let mut state = InteractionState::new(RESOLUTION);
        let original = state.config;
        for command in [Command::ToggleColourMode, Command::ToggleInvert] {
            state.apply(Input::Command(command));
            assert_ne!(state.config, original);
            state.apply(Input::Command(command));
            assert_eq!(state.config, original);
        }
    }

    #[test]
    fn change_messages() {
        assert_eq!(
            Change::ColourMode(ColourMode::Palette).to_string(),
            "Colour mode: Escape-Time Palette"
        );
        assert_eq!(Change::Invert(false).to_string(), "Inversion mode: Disabled");
        assert_eq!(Change::MaxIterations(200).to_string(), "Max iterations: 200");
        assert_eq!(
            Change::JuliaImaginary {
                value: 0.26015,
                increased: false
            }
            .to_string(),
            "Julia constant (imaginary part) decreased to 0.26015"
        );
    }
}
