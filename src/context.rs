//! Window and OpenGL context bootstrap shared by both demo programs.
//!
//! Creates a winit window with a glutin OpenGL 3.3 core context, loads GL
//! function pointers into a [`glow::Context`], and exposes the small surface
//! API the render loops need (resize, swap, info strings).
//!
//! Window creation must happen while the event loop is active, so
//! [`WindowedContext::create`] is intended to be called from an
//! `ApplicationHandler::resumed` implementation.

use std::num::NonZeroU32;
use std::sync::Arc;

use glow::HasContext;
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::texture::gl_size;

/// A window with a current OpenGL context and loaded function pointers.
pub struct WindowedContext {
    window: Window,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    gl: Arc<glow::Context>,
}

impl WindowedContext {
    /// Create a window of the given size with a current OpenGL 3.3 core
    /// context, a 24-bit depth buffer, and vsync enabled.
    ///
    /// # Errors
    ///
    /// Returns an error string if the window, GL config, context, or surface
    /// cannot be created, or if the context cannot be made current. Callers
    /// treat this as fatal.
    pub fn create(
        event_loop: &ActiveEventLoop,
        title: &str,
        size: PhysicalSize<u32>,
    ) -> Result<Self, String> {
        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(size);

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, |configs| {
                // Prefer the config with the most MSAA samples.
                configs
                    .reduce(|best, candidate| {
                        if candidate.num_samples() > best.num_samples() {
                            candidate
                        } else {
                            best
                        }
                    })
                    .expect("no suitable GL config found")
            })
            .map_err(|e| format!("could not create window and GL display: {e}"))?;
        let window = window.ok_or_else(|| "display builder returned no window".to_string())?;

        let raw_window_handle = window
            .window_handle()
            .map_err(|e| format!("could not obtain window handle: {e}"))?
            .as_raw();
        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_window_handle));
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| format!("could not create GL context: {e}"))?;

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::new())
            .map_err(|e| format!("could not build surface attributes: {e}"))?;
        let surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
                .map_err(|e| format!("could not create GL surface: {e}"))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| format!("could not make GL context current: {e}"))?;

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        };

        // Vsync; failure here is cosmetic, not fatal.
        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            log::warn!("could not enable vsync: {e}");
        }

        Ok(Self {
            window,
            surface,
            context,
            gl: Arc::new(gl),
        })
    }

    /// The loaded GL function pointers.
    #[must_use]
    pub fn gl(&self) -> Arc<glow::Context> {
        Arc::clone(&self.gl)
    }

    /// The underlying winit window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resize the GL surface and viewport. Zero-sized dimensions (a
    /// minimized window) are ignored.
    pub fn resize(&self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };
        self.surface.resize(&self.context, w, h);
        unsafe { self.gl.viewport(0, 0, gl_size(width), gl_size(height)) };
    }

    /// Swap the front and back buffers.
    ///
    /// # Errors
    ///
    /// Returns an error string if the swap fails (e.g., the surface was
    /// lost).
    pub fn swap(&self) -> Result<(), String> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| format!("could not swap buffers: {e}"))
    }

    /// The GL renderer and version strings, for startup logging.
    #[must_use]
    pub fn renderer_info(&self) -> (String, String) {
        unsafe {
            (
                self.gl.get_parameter_string(glow::RENDERER),
                self.gl.get_parameter_string(glow::VERSION),
            )
        }
    }
}
