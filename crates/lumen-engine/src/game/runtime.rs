use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use super::config::GameConfig;
use crate::input::{self, InputEvent, InputState, Key, KeyState};
use crate::renderer::Renderer;
use crate::time::{FrameClock, FrameTime};

/// Entry point for the game loop.
///
/// The renderer is initialized against the window once it exists; every
/// registered renderable, shader and light is expected to be in place by then.
pub struct Game {
    config: GameConfig,
    renderer: Renderer,
}

impl Game {
    pub fn new(config: GameConfig, renderer: Renderer) -> Self {
        Self { config, renderer }
    }

    /// Runs until the window closes. A failed initialization or a fatal
    /// render error ends the loop and is returned.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = GameState::new(self.config, self.renderer);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct GameState {
    config: GameConfig,
    renderer: Renderer,

    window: Option<Arc<Window>>,
    input: InputState,
    clock: FrameClock,

    error: Option<anyhow::Error>,
}

impl GameState {
    fn new(config: GameConfig, renderer: Renderer) -> Self {
        Self {
            config,
            renderer,
            window: None,
            input: InputState::default(),
            clock: FrameClock::default(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        self.renderer
            .initialize(window.clone())
            .context("failed to initialize renderer")?;

        self.window = Some(window);
        self.clock.reset();
        Ok(())
    }

    /// One idle tick: input, update, render.
    fn frame(&mut self) -> Result<()> {
        let ft: FrameTime = self.clock.tick();

        let directions = self.input.directions();
        let mouse = self.input.mouse_relative_movement();
        self.renderer.handle_input(&directions, &mouse, ft.dt);
        self.input.reset_mouse_movement();

        self.renderer.update(ft.dt);
        self.renderer.render()
    }
}

impl ApplicationHandler for GameState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the loop only waits when nothing is pending.
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let Some(ev) = input::translate_device_event(&event) {
            self.input.apply_event(&ev);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(ev) = input::translate_window_event(&event) {
            if self.config.exit_on_escape
                && matches!(
                    ev,
                    InputEvent::Key {
                        key: Key::Escape,
                        state: KeyState::Pressed,
                        ..
                    }
                )
            {
                event_loop.exit();
                return;
            }
            self.input.apply_event(&ev);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                self.renderer.resize(size.width, size.height);
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(w) = &self.window {
                    let size = w.inner_size();
                    self.renderer.resize(size.width, size.height);
                    w.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                if !self.renderer.is_initialized() {
                    return;
                }
                if let Err(e) = self.frame() {
                    self.fail(event_loop, e);
                }
            }

            _ => {}
        }
    }
}
