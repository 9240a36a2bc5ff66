//! Procedural heart demo: two textured circle fans and a blended triangle.
//!
//! Opens a 640×640 window and redraws continuously until it is closed.
//! Reads `gost.jpg` and `waffle.jpg` from the working directory; a missing
//! or undecodable image is fatal.

use anyhow::Context as _;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

use glow_sketches::{HeartRenderer, WindowedContext};

/// Everything that exists only while the window is open.
struct WindowState {
    ctx: WindowedContext,
    renderer: HeartRenderer,
}

/// Application state driven by the winit event loop.
#[derive(Default)]
struct HeartApp {
    state: Option<WindowState>,
    /// Set when initialization or rendering fails, so `main` can exit
    /// non-zero after the loop unwinds.
    error: Option<String>,
}

impl HeartApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: String) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }
}

/// Create the window, GL context, and renderer.
fn init(event_loop: &ActiveEventLoop) -> Result<WindowState, String> {
    let ctx = WindowedContext::create(event_loop, "Heart Shape", PhysicalSize::new(640, 640))?;

    let (renderer_name, version) = ctx.renderer_info();
    log::info!("renderer: {renderer_name}");
    log::info!("OpenGL version: {version}");

    let renderer = unsafe { HeartRenderer::new(ctx.gl()) }?;
    Ok(WindowState { ctx, renderer })
}

impl ApplicationHandler for HeartApp {
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
        let Some(state) = &self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.ctx.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                unsafe { state.renderer.render() };
                if let Err(e) = state.ctx.swap() {
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
    let mut app = HeartApp::default();
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with error")?;

    if let Some(error) = app.error {
        anyhow::bail!(error);
    }
    Ok(())
}
