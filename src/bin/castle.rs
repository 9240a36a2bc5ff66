//! Castle scene demo: three OBJ models under fixed lighting, explored with
//! a free-fly camera.
//!
//! Opens a 1200×800 window with the cursor grabbed. W/A/S/D move the
//! camera, the mouse looks around, scrolling zooms, and Escape (or closing
//! the window) quits. Reads the models from `scene/` relative to the
//! working directory; a missing or unparsable model is fatal.

use std::time::Instant;

use anyhow::Context as _;
use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, WindowId};

use glow_sketches::{Camera, Direction, SceneRenderer, WindowedContext};

const WINDOW_WIDTH: u32 = 1200;
const WINDOW_HEIGHT: u32 = 800;

/// Upper bound on the per-frame delta time, so a stall (debugger, minimized
/// window) does not catapult the camera.
const MAX_DT: f32 = 0.25;

/// Which movement keys are currently held.
#[derive(Default)]
struct HeldKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

/// Everything that exists only while the window is open.
struct WindowState {
    ctx: WindowedContext,
    renderer: SceneRenderer,
    camera: Camera,
    aspect: f32,
    held: HeldKeys,
    /// Previous cursor position; `None` until the first move event so the
    /// initial cursor placement does not register as a jump.
    last_cursor: Option<(f64, f64)>,
    last_frame: Instant,
}

/// Application state driven by the winit event loop.
#[derive(Default)]
struct CastleApp {
    state: Option<WindowState>,
    /// Set when initialization or rendering fails, so `main` can exit
    /// non-zero after the loop unwinds.
    error: Option<String>,
}

impl CastleApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: String) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }
}

/// Create the window, GL context, renderer, and camera.
fn init(event_loop: &ActiveEventLoop) -> Result<WindowState, String> {
    let ctx = WindowedContext::create(
        event_loop,
        "3D scene",
        PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT),
    )?;

    let (renderer_name, version) = ctx.renderer_info();
    log::info!("renderer: {renderer_name}");
    log::info!("OpenGL version: {version}");

    // Grab and hide the cursor for mouse look. Not every platform supports
    // both grab modes; a refusal still leaves the demo usable.
    let window = ctx.window();
    if let Err(e) = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
    {
        log::warn!("could not grab cursor: {e}");
    }
    window.set_cursor_visible(false);

    let renderer = unsafe { SceneRenderer::new(ctx.gl()) }?;

    #[expect(clippy::cast_precision_loss)]
    let aspect = WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32;

    Ok(WindowState {
        ctx,
        renderer,
        camera: Camera::new(Vec3::new(0.0, 1.0, 3.0)),
        aspect,
        held: HeldKeys::default(),
        last_cursor: None,
        last_frame: Instant::now(),
    })
}

impl WindowState {
    /// Advance the camera for every held movement key and draw one frame.
    fn redraw(&mut self) -> Result<(), String> {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_DT);
        self.last_frame = now;

        if self.held.forward {
            self.camera.advance(Direction::Forward, dt);
        }
        if self.held.backward {
            self.camera.advance(Direction::Backward, dt);
        }
        if self.held.left {
            self.camera.advance(Direction::Left, dt);
        }
        if self.held.right {
            self.camera.advance(Direction::Right, dt);
        }

        unsafe { self.renderer.render(&self.camera, self.aspect) };
        self.ctx.swap()
    }

    /// Route a cursor move into the camera, guarding the first event.
    fn cursor_moved(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.last_cursor {
            // Inverted Y: moving the cursor up pitches the camera up.
            #[expect(clippy::cast_possible_truncation)]
            self.camera.look((x - last_x) as f32, (last_y - y) as f32);
        }
        self.last_cursor = Some((x, y));
    }
}

impl ApplicationHandler for CastleApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match init(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                state.ctx.resize(size.width, size.height);
                if size.width > 0 && size.height > 0 {
                    #[expect(clippy::cast_precision_loss)]
                    {
                        state.aspect = size.width as f32 / size.height as f32;
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let held = event.state == ElementState::Pressed;
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) if held => event_loop.exit(),
                    PhysicalKey::Code(KeyCode::KeyW) => state.held.forward = held,
                    PhysicalKey::Code(KeyCode::KeyS) => state.held.backward = held,
                    PhysicalKey::Code(KeyCode::KeyA) => state.held.left = held,
                    PhysicalKey::Code(KeyCode::KeyD) => state.held.right = held,
                    _ => {}
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.cursor_moved(position.x, position.y);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    #[expect(clippy::cast_possible_truncation)]
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                state.camera.zoom_by(scroll_y);
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = state.redraw() {
                    self.fail(event_loop, e);
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.ctx.window().request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            unsafe { state.renderer.destroy() };
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = CastleApp::default();
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with error")?;

    if let Some(error) = app.error {
        anyhow::bail!(error);
    }
    Ok(())
}
