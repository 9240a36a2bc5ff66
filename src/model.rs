//! OBJ model loading and drawing.
//!
//! Parsing is delegated to [`tobj`]; this module turns the parsed streams
//! into interleaved GPU meshes with per-material diffuse textures and issues
//! one indexed draw call per mesh.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glow::HasContext;

use crate::texture::{Texture, TextureFilter};

/// One interleaved model vertex: position, normal, texture coordinates.
#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub struct ModelVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal; zero when the OBJ carries no normals.
    pub normal: [f32; 3],
    /// Texture coordinates; zero when the OBJ carries no UVs.
    pub tex_coords: [f32; 2],
}

/// Interleave the flat `tobj` streams into [`ModelVertex`] records.
///
/// `positions` drives the vertex count (three floats per vertex); missing or
/// short `normals`/`texcoords` streams are zero-filled so every vertex stays
/// well-defined.
#[must_use]
pub fn interleave(positions: &[f32], normals: &[f32], texcoords: &[f32]) -> Vec<ModelVertex> {
    let count = positions.len() / 3;
    let mut vertices = Vec::with_capacity(count);
    for i in 0..count {
        let mut vertex = ModelVertex::zeroed();
        vertex.position.copy_from_slice(&positions[i * 3..i * 3 + 3]);
        if let Some(normal) = normals.get(i * 3..i * 3 + 3) {
            vertex.normal.copy_from_slice(normal);
        }
        if let Some(uv) = texcoords.get(i * 2..i * 2 + 2) {
            vertex.tex_coords.copy_from_slice(uv);
        }
        vertices.push(vertex);
    }
    vertices
}

/// One GPU-resident mesh of a model.
struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    index_count: i32,
    /// Index into the model's material texture table, if the mesh has a
    /// material.
    texture_index: Option<usize>,
}

/// A static model loaded from an OBJ file: one GPU mesh per OBJ object plus
/// the diffuse textures of its materials.
pub struct Model {
    meshes: Vec<GpuMesh>,
    textures: Vec<Texture>,
    fallback: Texture,
}

impl Model {
    /// Load an OBJ file (triangulated, single-index) and upload its meshes.
    ///
    /// Material diffuse textures are resolved relative to the OBJ's
    /// directory with linear filtering. Meshes without a usable material
    /// fall back to a 1×1 white texture. Materials without a diffuse map get
    /// a 1×1 texture of their diffuse color.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns an error naming the path if the OBJ or any referenced
    /// material/texture cannot be read, or a GL error string if resource
    /// creation fails.
    pub unsafe fn load(gl: &glow::Context, path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let (models, materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)
            .map_err(|e| format!("could not load model {}: {e}", path.display()))?;
        let materials = materials
            .map_err(|e| format!("could not load materials for {}: {e}", path.display()))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut textures = Vec::with_capacity(materials.len());
        for material in &materials {
            let texture = match &material.diffuse_texture {
                Some(name) => unsafe {
                    Texture::from_file(gl, base_dir.join(name), TextureFilter::Linear)?
                },
                None => {
                    let rgb = material.diffuse.map_or([255; 3], rgb_to_bytes);
                    unsafe { Texture::solid_color(gl, rgb)? }
                }
            };
            textures.push(texture);
        }
        let fallback = unsafe { Texture::solid_color(gl, [255; 3])? };

        let mut meshes = Vec::with_capacity(models.len());
        for model in &models {
            let mesh = &model.mesh;
            let vertices = interleave(&mesh.positions, &mesh.normals, &mesh.texcoords);
            let texture_index = mesh.material_id.filter(|&id| id < textures.len());
            meshes.push(unsafe { upload_mesh(gl, &vertices, &mesh.indices, texture_index)? });
        }

        Ok(Self {
            meshes,
            textures,
            fallback,
        })
    }

    /// Draw every mesh with its diffuse texture bound to unit 0.
    ///
    /// The caller is responsible for the program and its non-sampler
    /// uniforms; the diffuse sampler is expected to point at unit 0.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    pub unsafe fn draw(&self, gl: &glow::Context) {
        for mesh in &self.meshes {
            let texture = mesh
                .texture_index
                .and_then(|i| self.textures.get(i))
                .unwrap_or(&self.fallback);
            unsafe {
                texture.bind(gl, 0);
                gl.bind_vertex_array(Some(mesh.vao));
                gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
            }
        }
        unsafe { gl.bind_vertex_array(None) };
    }

    /// Delete all GL resources owned by this model.
    ///
    /// # Safety
    ///
    /// Must be called with the context that created the model, exactly once.
    pub unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            for mesh in &self.meshes {
                gl.delete_vertex_array(mesh.vao);
                gl.delete_buffer(mesh.vbo);
                gl.delete_buffer(mesh.ebo);
            }
            for texture in &self.textures {
                texture.destroy(gl);
            }
            self.fallback.destroy(gl);
        }
    }
}

/// Upload one interleaved vertex/index pair as a VAO with position, normal,
/// and UV attributes.
///
/// # Panics
///
/// Panics if the index count exceeds `i32::MAX`.
unsafe fn upload_mesh(
    gl: &glow::Context,
    vertices: &[ModelVertex],
    indices: &[u32],
    texture_index: Option<usize>,
) -> Result<GpuMesh, String> {
    // ModelVertex is 32 bytes — well within i32 range.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let stride = std::mem::size_of::<ModelVertex>() as i32;

    let (vao, vbo, ebo) = unsafe {
        let vao = gl.create_vertex_array()?;
        let vbo = gl.create_buffer()?;
        let ebo = gl.create_buffer()?;

        gl.bind_vertex_array(Some(vao));

        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(vertices),
            glow::STATIC_DRAW,
        );

        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(indices),
            glow::STATIC_DRAW,
        );

        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 12);
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 2, glow::FLOAT, false, stride, 24);

        gl.bind_vertex_array(None);

        (vao, vbo, ebo)
    };

    let index_count = i32::try_from(indices.len()).expect("index count exceeds i32::MAX");

    Ok(GpuMesh {
        vao,
        vbo,
        ebo,
        index_count,
        texture_index,
    })
}

/// Convert a normalized diffuse color to 8-bit channels.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rgb_to_bytes(diffuse: [f32; 3]) -> [u8; 3] {
    diffuse.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_zips_aligned_streams() {
        let positions = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let normals = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let texcoords = [0.25, 0.5, 0.75, 1.0];

        let vertices = interleave(&positions, &normals, &texcoords);

        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[0].tex_coords, [0.25, 0.5]);
        assert_eq!(vertices[1].position, [4.0, 5.0, 6.0]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].tex_coords, [0.75, 1.0]);
    }

    #[test]
    fn interleave_zero_fills_missing_streams() {
        let positions = [1.0, 2.0, 3.0];

        let vertices = interleave(&positions, &[], &[]);

        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].normal, [0.0; 3]);
        assert_eq!(vertices[0].tex_coords, [0.0; 2]);
    }

    #[test]
    fn interleave_handles_empty_input() {
        assert!(interleave(&[], &[], &[]).is_empty());
    }

    #[test]
    fn vertex_layout_matches_the_attribute_offsets() {
        assert_eq!(std::mem::size_of::<ModelVertex>(), 32);
        assert_eq!(std::mem::offset_of!(ModelVertex, normal), 12);
        assert_eq!(std::mem::offset_of!(ModelVertex, tex_coords), 24);
    }

    #[test]
    fn diffuse_colors_round_to_bytes() {
        assert_eq!(rgb_to_bytes([0.0, 0.5, 1.0]), [0, 127, 255]);
        assert_eq!(rgb_to_bytes([-1.0, 2.0, 0.25]), [0, 255, 63]);
    }
}
