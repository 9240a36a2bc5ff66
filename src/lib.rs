//! Small OpenGL demo programs built on [glow].
//!
//! This crate contains the shared pieces of two windowed demos:
//!
//! - **`heart`** renders a procedural 2D heart — two circle fans and a
//!   triangle — with two textures blended across it. The two fans sample the
//!   same image through differently-filtered texture objects, showing the
//!   difference between linear and nearest filtering side by side.
//! - **`castle`** renders a static lit 3D scene loaded from OBJ files,
//!   explored with a free-fly camera (WASD + mouse look + scroll zoom).
//!
//! The library holds everything testable and reusable: procedural geometry,
//! shader sources and compilation, texture upload, the free-fly camera, OBJ
//! mesh loading, the two renderers, and the window/context bootstrap. The
//! binaries under `src/bin/` only wire these into winit event loops.
//!
//! # Safety
//!
//! Rendering requires a valid, current OpenGL context. All methods that
//! issue raw GL calls are `unsafe`; the [`context::WindowedContext`]
//! bootstrap produces the context they expect.
//!
//! [glow]: https://docs.rs/glow

pub mod camera;
pub mod context;
pub mod geometry;
pub mod heart;
pub mod model;
pub mod scene;
pub mod shaders;
pub mod texture;

pub use camera::{Camera, Direction};
pub use context::WindowedContext;
pub use heart::HeartRenderer;
pub use scene::SceneRenderer;
