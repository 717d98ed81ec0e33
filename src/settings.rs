use std::env;

use log::warn;

use crate::screen::Size;

/// Enables presentation synchronisation when set to `1`, `true` or `on`.
pub const VSYNC_VARIABLE: &str = "JULIA_VSYNC";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub title: String,
    pub size: Size,
    /// MSAA samples; wgpu only guarantees 1 and 4.
    pub sample_count: u32,
    pub vsync: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Interactive Julia Set".to_string(),
            size: Size::new(1920, 1080),
            sample_count: 4,
            vsync: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(value) = env::var(VSYNC_VARIABLE) {
            match parse_flag(&value) {
                Some(vsync) => settings.vsync = vsync,
                None => warn!("ignoring {}={:?}", VSYNC_VARIABLE, value),
            }
        }
        settings
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
