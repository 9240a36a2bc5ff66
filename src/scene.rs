//! The 3D scene renderer: three static OBJ models under fixed lighting,
//! viewed through a free-fly camera.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use glow::HasContext;

use crate::camera::Camera;
use crate::model::Model;
use crate::shaders;

/// Relative paths of the three scene models, loaded once at startup.
pub const MODEL_PATHS: [&str; 3] = ["scene/castle.obj", "scene/sea.obj", "scene/sky.obj"];

/// Near clipping plane distance.
const Z_NEAR: f32 = 0.1;
/// Far clipping plane distance.
const Z_FAR: f32 = 100.0;

/// Directional light direction (pointing down and slightly forward).
const DIR_LIGHT_DIRECTION: [f32; 3] = [-0.2, -1.0, -0.3];
/// Directional light ambient intensity.
const DIR_LIGHT_AMBIENT: f32 = 0.05;
/// Directional light diffuse intensity.
const DIR_LIGHT_DIFFUSE: f32 = 0.004;

/// World positions of the three point lights.
const POINT_LIGHT_POSITIONS: [[f32; 3]; 3] = [
    [-2.0, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [1.0, 0.5, 0.5],
];
/// Point light ambient intensity.
const POINT_LIGHT_AMBIENT: f32 = 0.05;
/// Point light diffuse intensity.
const POINT_LIGHT_DIFFUSE: f32 = 0.3;
/// Constant term of the point-light attenuation polynomial.
const ATTENUATION_CONSTANT: f32 = 1.0;
/// Linear term of the point-light attenuation polynomial.
const ATTENUATION_LINEAR: f32 = 0.09;
/// Quadratic term of the point-light attenuation polynomial.
const ATTENUATION_QUADRATIC: f32 = 0.005;

/// Cached uniform locations for one point light.
struct PointLightUniforms {
    position: glow::UniformLocation,
    ambient: glow::UniformLocation,
    diffuse: glow::UniformLocation,
    constant: glow::UniformLocation,
    linear: glow::UniformLocation,
    quadratic: glow::UniformLocation,
}

/// Cached uniform locations for the model shader program.
struct SceneUniforms {
    /// `u_model` — per-mesh model transform.
    model: glow::UniformLocation,
    /// `u_view` — camera view matrix.
    view: glow::UniformLocation,
    /// `u_projection` — perspective projection matrix.
    projection: glow::UniformLocation,
    /// `u_dir_light.*` — directional light parameters.
    dir_light_direction: glow::UniformLocation,
    dir_light_ambient: glow::UniformLocation,
    dir_light_diffuse: glow::UniformLocation,
    /// `u_point_lights[i].*` — the three point lights.
    point_lights: [PointLightUniforms; 3],
    /// `u_diffuse_texture` — texture unit of the diffuse map (always 0).
    diffuse_texture: glow::UniformLocation,
}

/// Renders the static castle scene.
///
/// The three models and all lighting values are fixed; the only per-frame
/// inputs are the camera pose and the viewport aspect ratio.
pub struct SceneRenderer {
    /// The OpenGL context, shared via [`Arc`] so it can be stored alongside
    /// the window that owns it.
    gl: Arc<glow::Context>,

    /// Compiled shader program for all meshes.
    program: glow::Program,
    /// Cached uniform locations for [`program`](Self::program).
    uniforms: SceneUniforms,

    /// The castle, sea, and sky models, in [`MODEL_PATHS`] order.
    models: [Model; 3],
}

impl SceneRenderer {
    /// Create the renderer: compile the model shader, cache its uniform
    /// locations, load the three scene models, and enable depth testing.
    ///
    /// # Safety
    ///
    /// The `gl` context must be current and valid. The caller must ensure
    /// that [`destroy`](Self::destroy) is called before the context is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error string if shader compilation/linking, model loading,
    /// or GL resource creation fails.
    ///
    /// # Panics
    ///
    /// Panics if any shader uniform location cannot be found, which
    /// indicates a bug in the shader source code.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Result<Self, String> {
        let program = unsafe {
            shaders::compile_program(&gl, shaders::MODEL_VERTEX_SRC, shaders::MODEL_FRAGMENT_SRC)?
        };

        let find = |name: &str| unsafe { uniform(&gl, program, name) };
        let uniforms = SceneUniforms {
            model: find("u_model"),
            view: find("u_view"),
            projection: find("u_projection"),
            dir_light_direction: find("u_dir_light.direction"),
            dir_light_ambient: find("u_dir_light.ambient"),
            dir_light_diffuse: find("u_dir_light.diffuse"),
            point_lights: std::array::from_fn(|i| PointLightUniforms {
                position: find(&format!("u_point_lights[{i}].position")),
                ambient: find(&format!("u_point_lights[{i}].ambient")),
                diffuse: find(&format!("u_point_lights[{i}].diffuse")),
                constant: find(&format!("u_point_lights[{i}].constant")),
                linear: find(&format!("u_point_lights[{i}].linear")),
                quadratic: find(&format!("u_point_lights[{i}].quadratic")),
            }),
            diffuse_texture: find("u_diffuse_texture"),
        };

        let [castle_path, sea_path, sky_path] = MODEL_PATHS;
        let models = unsafe {
            [
                Model::load(&gl, castle_path)?,
                Model::load(&gl, sea_path)?,
                Model::load(&gl, sky_path)?,
            ]
        };

        unsafe {
            gl.enable(glow::DEPTH_TEST);
            // The diffuse sampler always reads unit 0.
            gl.use_program(Some(program));
            gl.uniform_1_i32(Some(&uniforms.diffuse_texture), 0);
        }

        Ok(Self {
            gl,
            program,
            uniforms,
            models,
        })
    }

    /// Render one frame into the currently-bound framebuffer.
    ///
    /// Uploads the camera matrices and the full lighting set, then draws the
    /// three models under their fixed model transforms.
    ///
    /// # Safety
    ///
    /// Requires a current GL context matching the one passed to
    /// [`new`](Self::new).
    pub unsafe fn render(&self, camera: &Camera, aspect: f32) {
        let gl = &self.gl;

        unsafe {
            gl.clear_color(0.05, 0.05, 0.05, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.use_program(Some(self.program));

            let projection =
                Mat4::perspective_rh_gl(camera.zoom().to_radians(), aspect, Z_NEAR, Z_FAR);
            gl.uniform_matrix_4_f32_slice(
                Some(&self.uniforms.view),
                false,
                &camera.view_matrix().to_cols_array(),
            );
            gl.uniform_matrix_4_f32_slice(
                Some(&self.uniforms.projection),
                false,
                &projection.to_cols_array(),
            );

            self.upload_lights();

            for (model, transform) in self.models.iter().zip(model_transforms()) {
                gl.uniform_matrix_4_f32_slice(
                    Some(&self.uniforms.model),
                    false,
                    &transform.to_cols_array(),
                );
                model.draw(gl);
            }
        }
    }

    /// Upload the fixed lighting configuration.
    unsafe fn upload_lights(&self) {
        let gl = &self.gl;
        let u = &self.uniforms;

        unsafe {
            gl.uniform_3_f32(
                Some(&u.dir_light_direction),
                DIR_LIGHT_DIRECTION[0],
                DIR_LIGHT_DIRECTION[1],
                DIR_LIGHT_DIRECTION[2],
            );
            gl.uniform_3_f32(
                Some(&u.dir_light_ambient),
                DIR_LIGHT_AMBIENT,
                DIR_LIGHT_AMBIENT,
                DIR_LIGHT_AMBIENT,
            );
            gl.uniform_3_f32(
                Some(&u.dir_light_diffuse),
                DIR_LIGHT_DIFFUSE,
                DIR_LIGHT_DIFFUSE,
                DIR_LIGHT_DIFFUSE,
            );

            for (light, position) in u.point_lights.iter().zip(POINT_LIGHT_POSITIONS) {
                gl.uniform_3_f32(
                    Some(&light.position),
                    position[0],
                    position[1],
                    position[2],
                );
                gl.uniform_3_f32(
                    Some(&light.ambient),
                    POINT_LIGHT_AMBIENT,
                    POINT_LIGHT_AMBIENT,
                    POINT_LIGHT_AMBIENT,
                );
                gl.uniform_3_f32(
                    Some(&light.diffuse),
                    POINT_LIGHT_DIFFUSE,
                    POINT_LIGHT_DIFFUSE,
                    POINT_LIGHT_DIFFUSE,
                );
                gl.uniform_1_f32(Some(&light.constant), ATTENUATION_CONSTANT);
                gl.uniform_1_f32(Some(&light.linear), ATTENUATION_LINEAR);
                gl.uniform_1_f32(Some(&light.quadratic), ATTENUATION_QUADRATIC);
            }
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
            for model in &self.models {
                model.destroy(gl);
            }
        }
    }
}

/// Per-mesh model matrices, in [`MODEL_PATHS`] order.
///
/// The sea offset is applied before its scale, so the offset is expressed in
/// pre-scale units.
fn model_transforms() -> [Mat4; 3] {
    let castle = Mat4::from_scale(Vec3::splat(8.0));
    let sea = Mat4::from_scale(Vec3::splat(4.0))
        * Mat4::from_translation(Vec3::new(-4.5, 0.8, 3.5));
    let sky = Mat4::from_scale(Vec3::splat(8.0));
    [castle, sea, sky]
}

/// Look up a uniform location by name.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Panics
///
/// Panics if the uniform is missing, which indicates a bug in the shader
/// source code (or a driver that optimized the uniform away).
unsafe fn uniform(gl: &glow::Context, program: glow::Program, name: &str) -> glow::UniformLocation {
    unsafe { gl.get_uniform_location(program, name) }
        .unwrap_or_else(|| panic!("{name} missing from model shader"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const TOLERANCE: f32 = 1e-6;

    #[test]
    fn sea_offset_is_applied_in_pre_scale_units() {
        let [_, sea, _] = model_transforms();

        // The object-space origin lands at scale * offset.
        let origin = sea * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let expected = Vec4::new(-18.0, 3.2, 14.0, 1.0);
        assert!(
            (origin - expected).length() < TOLERANCE,
            "got {origin:?}, expected {expected:?}",
        );
    }

    #[test]
    fn castle_and_sky_share_a_uniform_scale() {
        let [castle, _, sky] = model_transforms();

        for transform in [castle, sky] {
            let unit = transform * Vec4::new(1.0, 1.0, 1.0, 1.0);
            assert!((unit - Vec4::new(8.0, 8.0, 8.0, 1.0)).length() < TOLERANCE);
        }
    }
}
