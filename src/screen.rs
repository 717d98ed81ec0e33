use bytemuck::{Pod, Zeroable};

/// Surface size in physical pixels.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Screen pixels per unit of the complex plane at `zoom`.
    ///
    /// Both axes scale by the height so the aspect ratio is preserved.
    pub fn pixels_per_unit(self, zoom: f64) -> f64 {
        self.height as f64 * zoom
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Size {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// A position on the surface in physical pixels, origin top-left, `y` growing downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<winit::dpi::PhysicalPosition<f64>> for Point {
    fn from(position: winit::dpi::PhysicalPosition<f64>) -> Self {
        Self::new(position.x, position.y)
    }
}
