//! Translation of winit window events into viewer input.

use fnv::FnvHashSet;
use log::trace;
use winit::event::{
    ElementState, KeyboardInput, ModifiersState, MouseButton, MouseScrollDelta, VirtualKeyCode,
    WindowEvent,
};

use crate::screen::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Towards the user's screen: zoom in.
    In,
    Out,
}

impl ScrollDirection {
    fn from_delta(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(ScrollDirection::In)
        } else if delta < 0.0 {
            Some(ScrollDirection::Out)
        } else {
            None
        }
    }
}

/// Discrete key bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ToggleColourMode,
    ToggleInvert,
    Quit,
    FewerIterations,
    MoreIterations,
    IncreaseReal,
    DecreaseReal,
    IncreaseImaginary,
    DecreaseImaginary,
}

impl Command {
    /// `key` bound to a command, given whether shift is held.
    pub fn from_key(key: VirtualKeyCode, shift: bool) -> Option<Self> {
        let command = match key {
            VirtualKeyCode::C => Command::ToggleColourMode,
            VirtualKeyCode::I => Command::ToggleInvert,
            VirtualKeyCode::Q => Command::Quit,
            VirtualKeyCode::Comma if shift => Command::FewerIterations,
            VirtualKeyCode::Period if shift => Command::MoreIterations,
            VirtualKeyCode::R => Command::IncreaseReal,
            VirtualKeyCode::F => Command::DecreaseReal,
            VirtualKeyCode::T => Command::IncreaseImaginary,
            VirtualKeyCode::G => Command::DecreaseImaginary,
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    Scroll(ScrollDirection),
    CursorMoved(Point),
    PrimaryPressed,
    PrimaryReleased,
    Command(Command),
    CloseRequested,
}

/// Stateful translator: tracks modifiers and held keys so that commands fire
/// once per press, not on auto-repeat.
#[derive(Default)]
pub struct Translator {
    modifiers: ModifiersState,
    held: FnvHashSet<VirtualKeyCode>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<Input> {
        match event {
            WindowEvent::CloseRequested => Some(Input::CloseRequested),
            WindowEvent::CursorMoved { position, .. } => {
                Some(Input::CursorMoved(Point::from(*position)))
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let vertical = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y as f64,
                    MouseScrollDelta::PixelDelta(position) => position.y,
                };
                ScrollDirection::from_delta(vertical).map(Input::Scroll)
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => Some(match state {
                ElementState::Pressed => Input::PrimaryPressed,
                ElementState::Released => Input::PrimaryReleased,
            }),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
                None
            }
            WindowEvent::Focused(false) => {
                self.held.clear();
                None
            }
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(key),
                        ..
                    },
                ..
            } => self.key(*key, *state).map(Input::Command),
            _ => None,
        }
    }

    /// Command for a key transition, if it is a fresh press of a bound key.
    pub fn key(&mut self, key: VirtualKeyCode, state: ElementState) -> Option<Command> {
        match state {
            ElementState::Pressed => {
                if !self.held.insert(key) {
                    trace!("ignoring repeat of {:?}", key);
                    return None;
                }
                Command::from_key(key, self.modifiers.shift())
            }
            ElementState::Released => {
                self.held.remove(&key);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_repeat_fires_once() {
        let mut translator = Translator::new();
        assert_eq!(
            translator.key(VirtualKeyCode::I, ElementState::Pressed),
            Some(Command::ToggleInvert)
        );
        assert_eq!(translator.key(VirtualKeyCode::I, ElementState::Pressed), None);
        assert_eq!(translator.key(VirtualKeyCode::I, ElementState::Released), None);
        assert_eq!(
            translator.key(VirtualKeyCode::I, ElementState::Pressed),
            Some(Command::ToggleInvert)
        );
    }

    #[test]
    fn iteration_keys_need_shift() {
        let mut translator = Translator::new();
        assert_eq!(translator.key(VirtualKeyCode::Period, ElementState::Pressed), None);
        translator.key(VirtualKeyCode::Period, ElementState::Released);

        translator.translate(&WindowEvent::ModifiersChanged(ModifiersState::SHIFT));
        assert_eq!(
            translator.key(VirtualKeyCode::Period, ElementState::Pressed),
            Some(Command::MoreIterations)
        );
        assert_eq!(
            translator.key(VirtualKeyCode::Comma, ElementState::Pressed),
            Some(Command::FewerIterations)
        );
    }

    #[test]
    fn focus_loss_forgets_held_keys() {
        let mut translator = Translator::new();
        translator.key(VirtualKeyCode::R, ElementState::Pressed);
        translator.translate(&WindowEvent::Focused(false));
        assert_eq!(
            translator.key(VirtualKeyCode::R, ElementState::Pressed),
            Some(Command::IncreaseReal)
        );
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(Command::from_key(VirtualKeyCode::X, false), None);
        assert_eq!(Command::from_key(VirtualKeyCode::Comma, false), None);
    }

    #[test]
    fn scroll_direction_follows_vertical_delta() {
        assert_eq!(ScrollDirection::from_delta(1.0), Some(ScrollDirection::In));
        assert_eq!(ScrollDirection::from_delta(-0.5), Some(ScrollDirection::Out));
        assert_eq!(ScrollDirection::from_delta(0.0), None);
    }
}
