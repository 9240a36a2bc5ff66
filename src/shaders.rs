//! GLSL shader sources and compilation helpers.
//!
//! All shaders target GLSL 3.30 core (OpenGL 3.3), matching the context the
//! windowing bootstrap requests.

use glow::HasContext;

/// Vertex shader for the heart shape.
///
/// Transforms positions by a single model matrix and flips the V coordinate
/// of the texture coordinates before passing them on.
///
/// # Uniforms
///
/// | Name      | Type   | Description            |
/// |-----------|--------|------------------------|
/// | `u_model` | `mat4` | Model transform matrix |
pub const HEART_VERTEX_SRC: &str = r"#version 330 core

layout (location = 0) in vec3 a_position;
layout (location = 1) in vec2 a_tex_coords;

uniform mat4 u_model;

out vec2 v_tex_coords;

void main() {
    // Decoded images are stored top-to-bottom; flip V to match GL's
    // bottom-left texture origin.
    v_tex_coords = vec2(a_tex_coords.x, 1.0 - a_tex_coords.y);
    gl_Position = u_model * vec4(a_position, 1.0);
}
";

/// Fragment shader for the heart shape.
///
/// Selects between three sampling modes via two integer flags:
///
/// | `u_use_triangle_texture` | `u_use_mixed_texture` | Output                             |
/// |--------------------------|-----------------------|------------------------------------|
/// | `1`                      | any                   | triangle texture                   |
/// | `0`                      | `1`                   | mix of triangle and circle texture |
/// | `0`                      | `0`                   | circle texture                     |
pub const HEART_FRAGMENT_SRC: &str = r"#version 330 core

in vec2 v_tex_coords;

uniform sampler2D u_circle_texture;
uniform sampler2D u_triangle_texture;
uniform int u_use_triangle_texture;
uniform int u_use_mixed_texture;

out vec4 frag_color;

void main() {
    if (u_use_triangle_texture == 1) {
        frag_color = texture(u_triangle_texture, v_tex_coords);
    } else if (u_use_mixed_texture == 1) {
        frag_color = mix(texture(u_triangle_texture, v_tex_coords),
                         texture(u_circle_texture, v_tex_coords), 0.7);
    } else {
        frag_color = texture(u_circle_texture, v_tex_coords);
    }
}
";

/// Vertex shader for lit OBJ models.
///
/// Standard model/view/projection transform. The normal is brought into
/// world space with the inverse-transpose of the model matrix so non-uniform
/// scales stay correct.
///
/// # Uniforms
///
/// | Name           | Type   | Description     |
/// |----------------|--------|-----------------|
/// | `u_model`      | `mat4` | Model transform |
/// | `u_view`       | `mat4` | Camera view     |
/// | `u_projection` | `mat4` | Perspective     |
pub const MODEL_VERTEX_SRC: &str = r"#version 330 core

layout (location = 0) in vec3 a_position;
layout (location = 1) in vec3 a_normal;
layout (location = 2) in vec2 a_tex_coords;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_frag_pos;
out vec3 v_normal;
out vec2 v_tex_coords;

void main() {
    v_frag_pos = vec3(u_model * vec4(a_position, 1.0));
    v_normal = mat3(transpose(inverse(u_model))) * a_normal;
    v_tex_coords = a_tex_coords;
    gl_Position = u_projection * u_view * vec4(v_frag_pos, 1.0);
}
";

/// Fragment shader for lit OBJ models.
///
/// Ambient + diffuse lighting from one directional light and a fixed-size
/// point-light array, with `1 / (c + l·d + q·d²)` distance attenuation,
/// modulating a diffuse texture.
///
/// # Uniforms
///
/// | Name                | Type         | Description                   |
/// |---------------------|--------------|-------------------------------|
/// | `u_dir_light`       | `DirLight`   | Directional light             |
/// | `u_point_lights[i]` | `PointLight` | Point lights, `i` in `[0, 3)` |
/// | `u_diffuse_texture` | `sampler2D`  | Material diffuse map          |
pub const MODEL_FRAGMENT_SRC: &str = r"#version 330 core

struct DirLight {
    vec3 direction;
    vec3 ambient;
    vec3 diffuse;
};

struct PointLight {
    vec3 position;
    vec3 ambient;
    vec3 diffuse;
    float constant;
    float linear;
    float quadratic;
};

const int POINT_LIGHT_COUNT = 3;

in vec3 v_frag_pos;
in vec3 v_normal;
in vec2 v_tex_coords;

uniform DirLight u_dir_light;
uniform PointLight u_point_lights[POINT_LIGHT_COUNT];
uniform sampler2D u_diffuse_texture;

out vec4 frag_color;

vec3 dir_light_contribution(DirLight light, vec3 normal, vec3 albedo) {
    vec3 light_dir = normalize(-light.direction);
    float diff = max(dot(normal, light_dir), 0.0);
    return light.ambient * albedo + light.diffuse * diff * albedo;
}

vec3 point_light_contribution(PointLight light, vec3 normal, vec3 frag_pos, vec3 albedo) {
    vec3 light_dir = normalize(light.position - frag_pos);
    float diff = max(dot(normal, light_dir), 0.0);
    float dist = length(light.position - frag_pos);
    float attenuation = 1.0 / (light.constant + light.linear * dist
                               + light.quadratic * dist * dist);
    return (light.ambient * albedo + light.diffuse * diff * albedo) * attenuation;
}

void main() {
    vec3 albedo = vec3(texture(u_diffuse_texture, v_tex_coords));
    vec3 normal = normalize(v_normal);

    vec3 result = dir_light_contribution(u_dir_light, normal, albedo);
    for (int i = 0; i < POINT_LIGHT_COUNT; ++i) {
        result += point_light_contribution(u_point_lights[i], normal, v_frag_pos, albedo);
    }

    frag_color = vec4(result, 1.0);
}
";

/// Compile a shader program from vertex and fragment source strings.
///
/// The compiled shader objects are detached and deleted after successful
/// linking, so only the program handle needs to be cleaned up by the caller.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// Returns a descriptive error string if shader compilation or program
/// linking fails. Callers treat this as fatal; there is no fallback program.
pub unsafe fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, String> {
    let program = unsafe { gl.create_program() }?;

    let vs = unsafe { compile_shader(gl, glow::VERTEX_SHADER, vertex_src) }?;
    let fs = unsafe { compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) }?;

    unsafe {
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(format!("Program link error: {log}"));
        }

        // Shaders can be detached and deleted after successful linking.
        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
    }

    Ok(program)
}

/// Compile a single shader stage (vertex or fragment) from source.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, String> {
    unsafe {
        let shader = gl.create_shader(shader_type)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(format!("Shader compile error: {log}"));
        }

        Ok(shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heart_fragment_declares_both_samplers_and_both_flags() {
        for name in [
            "u_circle_texture",
            "u_triangle_texture",
            "u_use_triangle_texture",
            "u_use_mixed_texture",
        ] {
            assert!(
                HEART_FRAGMENT_SRC.contains(name),
                "heart fragment shader missing {name}",
            );
        }
    }

    #[test]
    fn heart_vertex_flips_the_v_coordinate() {
        assert!(HEART_VERTEX_SRC.contains("1.0 - a_tex_coords.y"));
    }

    #[test]
    fn model_fragment_uses_three_point_lights() {
        assert!(MODEL_FRAGMENT_SRC.contains("const int POINT_LIGHT_COUNT = 3"));
    }
}
