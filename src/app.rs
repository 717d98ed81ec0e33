//! The per-frame loop: input in, uniforms out.

use std::time::Instant;

use anyhow::anyhow;
use log::info;
use winit::{
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::{
    frame_rate::FrameCounter,
    input::Translator,
    renderer::{Frame, Params, Renderer},
    screen::Size,
    settings::Settings,
    state::{Change, InteractionState},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Terminal.
    Stopped,
}

impl LoopState {
    pub fn after(self, change: &Change) -> Self {
        match (self, change) {
            (LoopState::Running, Change::Quit) => LoopState::Stopped,
            (state, _) => state,
        }
    }
}

pub fn create_window(event_loop: &EventLoop<()>, settings: &Settings) -> anyhow::Result<Window> {
    WindowBuilder::new()
        .with_title(&settings.title)
        .with_inner_size(PhysicalSize::new(
            settings.size.width,
            settings.size.height,
        ))
        .with_resizable(false)
        .build(event_loop)
        .map_err(|error| anyhow!("failed to open window: {}", error))
}

pub struct App {
    // Dropped before `window`, which the surface draws into.
    renderer: Renderer,
    state: InteractionState,
    translator: Translator,
    frame_counter: FrameCounter,
    loop_state: LoopState,
    window: Window,
}

impl App {
    pub fn new(window: Window, settings: &Settings) -> anyhow::Result<Self> {
        let resolution = Size::from(window.inner_size());
        let state = InteractionState::new(resolution);
        let renderer = Renderer::new(
            &window,
            &Settings {
                size: resolution,
                ..settings.clone()
            },
            Params::from(&state),
        )?;

        Ok(Self {
            renderer,
            state,
            translator: Translator::new(),
            frame_counter: FrameCounter::new(Instant::now()),
            loop_state: LoopState::Running,
            window,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => self.resize(Size::from(*size)),
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                self.resize(Size::from(**new_inner_size))
            }
            _ => {}
        }

        if let Some(input) = self.translator.translate(event) {
            if let Some(change) = self.state.apply(input) {
                info!("{}", change);
                self.loop_state = self.loop_state.after(&change);
            }
        }
    }

    /// Draw one frame from the current state. Errors are fatal.
    pub fn redraw(&mut self) -> anyhow::Result<()> {
        if self.loop_state == LoopState::Stopped {
            return Ok(());
        }

        if self.renderer.render(Params::from(&self.state))? == Frame::Presented {
            if let Some(frames) = self.frame_counter.tick(Instant::now()) {
                info!("FPS: {}", frames);
            }
        }
        Ok(())
    }

    fn resize(&mut self, size: Size) {
        if size.width == 0 || size.height == 0 || size == self.state.resolution {
            return;
        }
        self.renderer.resize(size);
        self.state.resize(size);
    }
}
