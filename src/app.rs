//! Application entry point and window event loop.
//!
//! [`Starfield`] is a builder for the initial configuration. [`Starfield::run`]
//! opens the window, builds the first pattern and drives the frame loop
//! until the window closes.

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::error::AppError;
use crate::frame;
use crate::gpu::{GpuState, GpuVisual, Overlay};
use crate::panel::{self, Effect, Field, Value};
use crate::params::Params;
use crate::patterns::PatternKind;
use crate::scene::Scene;
use crate::textures::SpriteTexture;
use crate::time::Clock;

#[cfg(feature = "egui")]
use crate::gpu::egui_integration::{EguiFrameOutput, EguiIntegration};

/// Interactive star-field visualization.
///
/// # Example
///
/// ```ignore
/// use starfield::prelude::*;
///
/// Starfield::new()
///     .with_pattern(PatternKind::Galaxy)
///     .with_seed(7)
///     .run()?;
/// ```
pub struct Starfield {
    pattern: PatternKind,
    params: Params,
    sprite: Option<PathBuf>,
    title: String,
    window_size: (u32, u32),
    seed: Option<u64>,
}

impl Starfield {
    pub fn new() -> Self {
        Self {
            pattern: PatternKind::default(),
            params: Params::default(),
            sprite: None,
            title: "Starfield".to_string(),
            window_size: (1280, 720),
            seed: None,
        }
    }

    /// Pattern shown at startup.
    pub fn with_pattern(mut self, pattern: PatternKind) -> Self {
        self.pattern = pattern;
        self
    }

    /// Starting parameters for every pattern.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Image sampled by each star point. Loaded when [`run`](Self::run) starts.
    pub fn with_sprite(mut self, path: impl Into<PathBuf>) -> Self {
        self.sprite = Some(path.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }

    /// Seed the generators for reproducible point sets.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), AppError> {
        let sprite = self
            .sprite
            .as_ref()
            .map(SpriteTexture::from_file)
            .transpose()?;

        let rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            title: self.title,
            window_size: self.window_size,
            initial_pattern: self.pattern,
            sprite,
            params: self.params,
            rng,
            scene: Scene::new(),
            clock: Clock::new(),
            window: None,
            gpu_state: None,
            #[cfg(feature = "egui")]
            egui: None,
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        };
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Starfield {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    title: String,
    window_size: (u32, u32),
    initial_pattern: PatternKind,
    sprite: Option<SpriteTexture>,
    params: Params,
    rng: SmallRng,
    scene: Scene<GpuVisual>,
    clock: Clock,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    #[cfg(feature = "egui")]
    egui: Option<EguiIntegration>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    /// First fatal error; returned from [`Starfield::run`].
    error: Option<AppError>,
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(self.window_size.0, self.window_size.1));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), self.sprite.as_ref()))?;

        let size = window.inner_size();
        self.scene.camera.set_viewport(size.width, size.height);

        #[cfg(feature = "egui")]
        {
            self.egui = Some(EguiIntegration::new(&gpu_state.device, gpu_state.config.format, &window));
        }

        self.scene.set_active_pattern(
            self.initial_pattern,
            &self.params,
            &mut self.rng,
            &mut gpu_state.backend(),
        );

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    /// Carry out what a panel edit or shortcut requires.
    fn apply_effect(&mut self, effect: Effect) {
        let Some(gpu_state) = &self.gpu_state else {
            return;
        };
        let mut backend = gpu_state.backend();
        match effect {
            Effect::None => {}
            Effect::Material => self.scene.sync_material(&self.params),
            Effect::Regenerate => self.scene.regenerate(&self.params, &mut self.rng, &mut backend),
            Effect::SwitchPattern(kind) => {
                self.scene
                    .set_active_pattern(kind, &self.params, &mut self.rng, &mut backend)
            }
            Effect::RandomizeColors => {
                if !self.scene.randomize_colors(&mut self.rng) {
                    log::debug!("{} keeps its gradient colors", self.scene.active_kind().name());
                }
            }
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let field = match code {
            KeyCode::Digit1 => Field::SelectPattern(PatternKind::Cloud),
            KeyCode::Digit2 => Field::SelectPattern(PatternKind::Center),
            KeyCode::Digit3 => Field::SelectPattern(PatternKind::Spiral),
            KeyCode::Digit4 => Field::SelectPattern(PatternKind::Wave),
            KeyCode::Digit5 => Field::SelectPattern(PatternKind::Galaxy),
            KeyCode::KeyR => Field::RandomizeColors,
            KeyCode::Space => Field::Regenerate,
            _ => return,
        };
        let effect = panel::apply(&mut self.params, field, Value::Trigger);
        self.apply_effect(effect);
    }

    /// Build this frame's settings window; returns its output and the edits' effects.
    #[cfg(feature = "egui")]
    fn run_panel(&mut self) -> (Option<EguiFrameOutput>, Vec<Effect>) {
        let (Some(egui), Some(window)) = (&mut self.egui, &self.window) else {
            return (None, Vec::new());
        };
        let active = self.scene.active_kind();
        let fps = self.clock.fps();
        let params = &mut self.params;
        let mut effects = Vec::new();
        let output = egui.run(window, |ctx| {
            effects.extend(crate::ui::settings_window(ctx, active, params, fps));
        });
        (Some(output), effects)
    }

    fn update_title(&self) {
        if self.clock.frame() % 30 != 0 {
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&format!(
                "{} - {} - {:.0} fps",
                self.title,
                self.scene.active_kind().name(),
                self.clock.fps()
            ));
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let elapsed = self.clock.tick();

        #[cfg(feature = "egui")]
        let egui_output = {
            let (output, effects) = self.run_panel();
            for effect in effects {
                self.apply_effect(effect);
            }
            output
        };

        frame::advance(&mut self.scene, &self.params, elapsed);

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };
        self.scene.flush(&mut gpu_state.backend());

        #[cfg(feature = "egui")]
        let mut overlay = match (&mut self.egui, egui_output) {
            (Some(egui), Some(output)) => Some(egui.overlay(output)),
            _ => None,
        };
        #[cfg(feature = "egui")]
        let overlay = overlay.as_mut().map(|o| o as &mut dyn Overlay);
        #[cfg(not(feature = "egui"))]
        let overlay: Option<&mut dyn Overlay> = None;

        match gpu_state.render(&self.scene, overlay) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("render error: {:?}", e),
        }

        self.update_title();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            log::error!("{}", err);
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        let consumed = match (&mut self.egui, &self.window) {
            (Some(egui), Some(window)) => egui.on_window_event(window, &event),
            _ => false,
        };
        #[cfg(not(feature = "egui"))]
        let consumed = false;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                self.scene
                    .camera
                    .set_viewport(physical_size.width, physical_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                self.handle_key(&event);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed && !consumed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        self.scene.camera.orbit(dx, dy);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.scene.camera.zoom(scroll);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
