//! Application state and event loop handler

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
    window::{Window, WindowId},
};

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS};
use crate::platform::{Joysticks, KeyboardInput, merge_intents};
use crate::renderer::{RenderError, RenderState, pick_background, scene};
use crate::settings::Settings;
use crate::sim::{Announcement, GameState, TickInput, tick};

const INTRO_TEXT: &str = "player 1 keys: cursor, home/end, pgup/pgdown";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Average frame rate over the last 60 frames
#[derive(Debug, Clone)]
pub struct FrameRate {
    frame_times: [f32; 60],
    frame_index: usize,
    filled: usize,
}

impl Default for FrameRate {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            filled: 0,
        }
    }
}

impl FrameRate {
    pub fn record(&mut self, frame_time: f32) {
        self.frame_times[self.frame_index] = frame_time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();
        self.filled = (self.filled + 1).min(self.frame_times.len());
    }

    pub fn fps(&self) -> f32 {
        let elapsed: f32 = self.frame_times[..self.filled].iter().sum();
        if elapsed > 0.0 {
            self.filled as f32 / elapsed
        } else {
            0.0
        }
    }
}

/// Keep one-shot commands that arrived during a frame without a tick
fn carry_one_shots(input: &mut TickInput, earlier: &TickInput) {
    input.restart |= earlier.restart;
    for (now, before) in input.intents.iter_mut().zip(&earlier.intents) {
        now.switch_aiming |= before.switch_aiming;
        now.switch_target |= before.switch_target;
    }
}

/// Main application state
pub struct App {
    settings: Settings,
    seed: u64,
    window: Option<Arc<Window>>,
    renderer: Option<RenderState>,
    state: GameState,
    keyboard: KeyboardInput,
    joysticks: Joysticks,
    accumulator: f32,
    /// One-shots waiting for the next tick
    carried: Option<TickInput>,
    last_frame: Option<Instant>,
    next_frame: Instant,
    frame_rate: FrameRate,
    failure: Option<AppError>,
}

impl App {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut state = GameState::new(&settings, seed);
        let center = Vec2::new(state.arena.width / 2.0, state.arena.height / 2.0);
        state.announce(Announcement::new(INTRO_TEXT, center));
        let joysticks = Joysticks::new(settings.dead_zone);

        Self {
            settings,
            seed,
            window: None,
            renderer: None,
            state,
            keyboard: KeyboardInput::new(),
            joysticks,
            accumulator: 0.0,
            carried: None,
            last_frame: None,
            next_frame: Instant::now(),
            frame_rate: FrameRate::default(),
            failure: None,
        }
    }

    /// Outcome of the run once the event loop has returned
    pub fn finish(self) -> Result<(), AppError> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn frame_duration(&self) -> Duration {
        Duration::from_secs_f32(self.settings.window.step())
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let w = &self.settings.window;
        let window_attrs = Window::default_attributes()
            .with_title(w.title.clone())
            .with_inner_size(PhysicalSize::new(w.width, w.height))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let scene_size = (w.width as f32, w.height as f32);
        let mut renderer = pollster::block_on(RenderState::new(
            window.clone(),
            scene_size,
            self.settings.background_color,
        ))?;

        let mut rng = Pcg32::seed_from_u64(self.seed);
        let window_size = (w.width, w.height);
        if let Some(picture) = pick_background(&mut rng, &self.settings.background_dir, window_size) {
            renderer.set_background(picture);
        }

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.last_frame = Some(Instant::now());
        log::info!("Window and renderer initialized");
        Ok(())
    }

    /// Run as many fixed steps as the elapsed time allows
    fn update(&mut self, frame_time: f32) {
        let step = self.settings.window.step();
        self.accumulator += frame_time.min(MAX_FRAME_TIME);

        let intents = merge_intents(
            self.state.seats.len(),
            self.keyboard.take_intent(),
            &self.joysticks.poll(),
        );
        let mut input = TickInput {
            intents,
            restart: self.keyboard.take_restart(),
        };
        if let Some(earlier) = self.carried.take() {
            carry_one_shots(&mut input, &earlier);
        }

        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &input, step);
            self.accumulator -= step;
            substeps += 1;
            // Switches and restart act once per frame
            input = input.held();
        }
        if substeps == 0 {
            self.carried = Some(input);
        } else if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiraling
            self.accumulator = self.accumulator.min(step);
        }

        for event in self.state.drain_events() {
            log::trace!("{event:?}");
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let frame_time = self
            .last_frame
            .map_or(self.settings.window.step(), |last| now.duration_since(last).as_secs_f32());
        self.last_frame = Some(now);
        self.frame_rate.record(frame_time);

        self.update(frame_time);

        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let fps = self.settings.show_fps.then(|| self.frame_rate.fps());
        let vertices = scene::build(&self.state, fps);
        match renderer.render(&vertices) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    renderer.resize(size.width, size.height);
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {e:?}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            log::error!("{e}");
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size.width, new_size.height);
                }
            }

            WindowEvent::Focused(false) => self.keyboard.reset(),

            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_key(event.physical_key, event.state);
                if self.keyboard.quit_requested() {
                    log::info!("Escape pressed, exiting");
                    event_loop.exit();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        let now = Instant::now();
        if now >= self.next_frame {
            window.request_redraw();
            self.next_frame = now + self.frame_duration();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}
