use std::process;

use log::{error, info};
use winit::{
    event::Event,
    event_loop::{ControlFlow, EventLoop},
};

use julia_explorer::{
    app::{self, App, LoopState},
    settings::Settings,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env();
    let event_loop = EventLoop::new();

    let mut app = match app::create_window(&event_loop, &settings)
        .and_then(|window| App::new(window, &settings))
    {
        Ok(app) => app,
        Err(error) => {
            error!("{:#}", error);
            process::exit(1);
        }
    };

    info!("scroll to zoom, drag to pan; C colour, I invert, Shift+,/Shift+. iterations, R/F and T/G Julia constant, Q quit");

    event_loop.run(move |event, _, control_flow| {
        // To present frames in realtime, *don't* set `control_flow` to `Wait`.
        match event {
            Event::MainEventsCleared => {
                if app.loop_state() == LoopState::Running {
                    app.window().request_redraw();
                }
            }
            Event::WindowEvent { window_id, event } if window_id == app.window().id() => {
                app.handle_window_event(&event);
                if app.loop_state() == LoopState::Stopped {
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::RedrawRequested(window_id) if window_id == app.window().id() => {
                if let Err(error) = app.redraw() {
                    error!("{:#}", error);
                    *control_flow = ControlFlow::ExitWithCode(1);
                }
            }
            Event::LoopDestroyed => info!("shutting down"),
            _ => {}
        }
    });
}
