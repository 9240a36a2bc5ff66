//! The heart renderer: owns the GL resources for the procedural heart shape
//! and issues its three fixed draw calls each frame.

use std::sync::Arc;

use glam::Mat4;
use glow::HasContext;

use crate::geometry::{HeartMesh, Position, TexCoord};
use crate::shaders;
use crate::texture::{decode_rgb, Texture, TextureFilter};

/// Relative path of the image blended over both circle fans.
pub const CIRCLE_TEXTURE_PATH: &str = "gost.jpg";

/// Relative path of the image blended over the triangle.
pub const TRIANGLE_TEXTURE_PATH: &str = "waffle.jpg";

/// Cached uniform locations for the heart shader program.
struct HeartUniforms {
    /// `u_model` — the (identity) model transform.
    model: glow::UniformLocation,
    /// `u_circle_texture` — texture unit of the circle image (always 0).
    circle_texture: glow::UniformLocation,
    /// `u_triangle_texture` — texture unit of the triangle image (always 1).
    triangle_texture: glow::UniformLocation,
    /// `u_use_triangle_texture` — selects the pure triangle texture.
    use_triangle_texture: glow::UniformLocation,
    /// `u_use_mixed_texture` — selects the two-texture blend.
    use_mixed_texture: glow::UniformLocation,
}

/// Renders the procedural heart: a blended triangle between two circle fans
/// that differ only in texture filtering.
///
/// All geometry is built once on the CPU and uploaded as two static,
/// non-interleaved buffers (attribute 0 = vec3 position, attribute 1 = vec2
/// UV). The circle image is uploaded twice, once with linear and once with
/// nearest filtering, so the per-draw filter choice is a texture binding
/// rather than a mutation of shared sampler state.
pub struct HeartRenderer {
    /// The OpenGL context, shared via [`Arc`] so it can be stored alongside
    /// the window that owns it.
    gl: Arc<glow::Context>,

    /// Compiled shader program for all three draw calls.
    program: glow::Program,
    /// Cached uniform locations for [`program`](Self::program).
    uniforms: HeartUniforms,

    /// Vertex array object describing both attribute streams.
    vao: glow::VertexArray,
    /// Static buffer of vertex positions.
    position_vbo: glow::Buffer,
    /// Static buffer of texture coordinates.
    tex_coord_vbo: glow::Buffer,

    /// Circle image with trilinear filtering, drawn on the left fan.
    circle_linear: Texture,
    /// The same circle image with nearest filtering, drawn on the right fan.
    circle_nearest: Texture,
    /// Triangle image, blended into the triangle draw.
    triangle: Texture,
}

impl HeartRenderer {
    /// Create the renderer: compile the shader program, cache its uniform
    /// locations, upload the heart geometry, and load both images.
    ///
    /// # Safety
    ///
    /// The `gl` context must be current and valid. The caller must ensure
    /// that [`destroy`](Self::destroy) is called before the context is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error string if shader compilation/linking, GL resource
    /// creation, or image loading fails. All of these are fatal to the
    /// caller; none leave a partially-usable renderer behind.
    ///
    /// # Panics
    ///
    /// Panics if any shader uniform location cannot be found, which
    /// indicates a bug in the shader source code.
    #[expect(clippy::too_many_lines)] // GL initialization is inherently verbose
    pub unsafe fn new(gl: Arc<glow::Context>) -> Result<Self, String> {
        let program = unsafe {
            shaders::compile_program(&gl, shaders::HEART_VERTEX_SRC, shaders::HEART_FRAGMENT_SRC)?
        };

        let uniforms = unsafe {
            HeartUniforms {
                model: gl
                    .get_uniform_location(program, "u_model")
                    .expect("u_model missing from heart shader"),
                circle_texture: gl
                    .get_uniform_location(program, "u_circle_texture")
                    .expect("u_circle_texture missing from heart shader"),
                triangle_texture: gl
                    .get_uniform_location(program, "u_triangle_texture")
                    .expect("u_triangle_texture missing from heart shader"),
                use_triangle_texture: gl
                    .get_uniform_location(program, "u_use_triangle_texture")
                    .expect("u_use_triangle_texture missing from heart shader"),
                use_mixed_texture: gl
                    .get_uniform_location(program, "u_use_mixed_texture")
                    .expect("u_use_mixed_texture missing from heart shader"),
            }
        };

        let mesh = HeartMesh::build();

        let (vao, position_vbo, tex_coord_vbo) = unsafe {
            let vao = gl.create_vertex_array()?;
            let position_vbo = gl.create_buffer()?;
            let tex_coord_vbo = gl.create_buffer()?;

            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(position_vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.positions),
                glow::STATIC_DRAW,
            );
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(
                0,
                3,
                glow::FLOAT,
                false,
                // Position is 12 bytes — well within i32 range.
                #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                {
                    std::mem::size_of::<Position>() as i32
                },
                0,
            );

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(tex_coord_vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.tex_coords),
                glow::STATIC_DRAW,
            );
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                {
                    std::mem::size_of::<TexCoord>() as i32
                },
                0,
            );

            gl.bind_vertex_array(None);

            (vao, position_vbo, tex_coord_vbo)
        };

        // Decode the circle image once, upload it with both filter modes.
        let (width, height, pixels) = decode_rgb(std::path::Path::new(CIRCLE_TEXTURE_PATH))?;
        let circle_linear = unsafe {
            Texture::from_rgb_pixels(&gl, width, height, &pixels, TextureFilter::Linear)?
        };
        let circle_nearest = unsafe {
            Texture::from_rgb_pixels(&gl, width, height, &pixels, TextureFilter::Nearest)?
        };
        drop(pixels);

        let triangle =
            unsafe { Texture::from_file(&gl, TRIANGLE_TEXTURE_PATH, TextureFilter::Nearest)? };

        // The sampler-to-unit assignments never change; set them once.
        unsafe {
            gl.use_program(Some(program));
            gl.uniform_1_i32(Some(&uniforms.circle_texture), 0);
            gl.uniform_1_i32(Some(&uniforms.triangle_texture), 1);
        }

        Ok(Self {
            gl,
            program,
            uniforms,
            vao,
            position_vbo,
            tex_coord_vbo,
            circle_linear,
            circle_nearest,
            triangle,
        })
    }

    /// Render one frame into the currently-bound framebuffer.
    ///
    /// Clears, uploads the identity model transform, then issues the three
    /// fixed draw calls: the blended triangle, the linearly-filtered left
    /// fan, and the nearest-filtered right fan.
    ///
    /// # Safety
    ///
    /// Requires a current GL context matching the one passed to
    /// [`new`](Self::new).
    pub unsafe fn render(&self) {
        let gl = &self.gl;

        unsafe {
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.use_program(Some(self.program));
            gl.uniform_matrix_4_f32_slice(
                Some(&self.uniforms.model),
                false,
                &Mat4::IDENTITY.to_cols_array(),
            );
            gl.bind_vertex_array(Some(self.vao));

            // Triangle, blending both textures.
            self.circle_linear.bind(gl, 0);
            self.triangle.bind(gl, 1);
            gl.uniform_1_i32(Some(&self.uniforms.use_triangle_texture), 0);
            gl.uniform_1_i32(Some(&self.uniforms.use_mixed_texture), 1);
            let range = HeartMesh::triangle();
            gl.draw_arrays(glow::TRIANGLES, range.first, range.count);

            // Left fan with the linearly-filtered circle texture.
            self.circle_linear.bind(gl, 0);
            gl.uniform_1_i32(Some(&self.uniforms.use_triangle_texture), 0);
            gl.uniform_1_i32(Some(&self.uniforms.use_mixed_texture), 0);
            let range = HeartMesh::left_fan();
            gl.draw_arrays(glow::TRIANGLE_FAN, range.first, range.count);

            // Right fan with the nearest-filtered copy of the same image.
            self.circle_nearest.bind(gl, 0);
            let range = HeartMesh::right_fan();
            gl.draw_arrays(glow::TRIANGLE_FAN, range.first, range.count);

            gl.bind_vertex_array(None);
        }
    }

    /// Clean up all GL resources owned by this renderer.
    ///
    /// # Safety
    ///
    /// Must be called with the same GL context that was used to create the
    /// renderer, and must be called exactly once.
    pub unsafe fn destroy(&self) {
        let gl = &self.gl;
        unsafe {
            gl.delete_program(self.program);
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.position_vbo);
            gl.delete_buffer(self.tex_coord_vbo);
            self.circle_linear.destroy(gl);
            self.circle_nearest.destroy(gl);
            self.triangle.destroy(gl);
        }
    }
}
