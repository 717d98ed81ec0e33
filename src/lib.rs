//! Interactive Julia set explorer.
//!
//! The fragment shader in `julia.wgsl` does the per-pixel work; [`evaluator`] and
//! [`colour`] compute the same thing on the host. [`state`] holds everything input
//! can change, and [`app`] wires it to a winit window and the [`renderer`].

pub mod app;
pub mod colour;
pub mod command_encoder;
pub mod complex;
pub mod evaluator;
pub mod frame_rate;
pub mod input;
pub mod renderer;
pub mod screen;
pub mod settings;
pub mod state;
pub mod uniform;
