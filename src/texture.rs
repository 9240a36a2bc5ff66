//! Image decoding and GL texture upload.
//!
//! Textures are immutable after creation: pixel data, mipmaps, wrap mode,
//! and the filter pair are all fixed in [`Texture::from_file`] /
//! [`Texture::from_rgb_pixels`]. Where a draw needs a different filtering
//! outcome, it selects a differently-configured texture object instead of
//! mutating shared sampler state between draws.

use std::path::Path;

use glow::HasContext;

/// GL internal format for RGB8 textures, pre-cast to the `i32` that
/// `tex_image_2d` expects.
#[expect(clippy::cast_possible_wrap)]
const RGB8_INTERNAL_FORMAT: i32 = glow::RGB8 as i32;

/// Convert a `u32` to `i32` for GL API calls.
///
/// # Panics
///
/// Panics if `value > i32::MAX`. In practice, this is unreachable for
/// normal viewport dimensions and image sizes.
pub(crate) fn gl_size(value: u32) -> i32 {
    i32::try_from(value).expect("dimension exceeds i32::MAX")
}

/// Minification/magnification filtering mode, fixed per texture at creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextureFilter {
    /// Trilinear: `LINEAR_MIPMAP_LINEAR` minification, `LINEAR`
    /// magnification.
    Linear,
    /// Blocky: `NEAREST_MIPMAP_NEAREST` minification, `NEAREST`
    /// magnification.
    Nearest,
}

impl TextureFilter {
    /// The `TEXTURE_MIN_FILTER` parameter value.
    #[expect(clippy::cast_possible_wrap)]
    fn min_filter(self) -> i32 {
        match self {
            Self::Linear => glow::LINEAR_MIPMAP_LINEAR as i32,
            Self::Nearest => glow::NEAREST_MIPMAP_NEAREST as i32,
        }
    }

    /// The `TEXTURE_MAG_FILTER` parameter value.
    #[expect(clippy::cast_possible_wrap)]
    fn mag_filter(self) -> i32 {
        match self {
            Self::Linear => glow::LINEAR as i32,
            Self::Nearest => glow::NEAREST as i32,
        }
    }
}

/// Decode an image file into tightly-packed RGB8 pixels.
///
/// # Errors
///
/// Returns an error naming the path if the file cannot be read or decoded.
pub(crate) fn decode_rgb(path: &Path) -> Result<(u32, u32, Vec<u8>), String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("could not read texture {}: {e}", path.display()))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| format!("could not decode texture {}: {e}", path.display()))?
        .to_rgb8();
    let (width, height) = img.dimensions();
    Ok((width, height, img.into_raw()))
}

/// A 2D texture uploaded to GPU memory with a full mipmap chain.
pub struct Texture {
    raw: glow::Texture,
}

impl Texture {
    /// Decode an image file and upload it with the given filter mode.
    ///
    /// Wrap mode is REPEAT on both axes; mipmaps are generated. The decoded
    /// host-side pixel buffer is dropped before this returns.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns an error naming the path on read or decode failure, or a GL
    /// error string if texture creation fails.
    pub unsafe fn from_file(
        gl: &glow::Context,
        path: impl AsRef<Path>,
        filter: TextureFilter,
    ) -> Result<Self, String> {
        let (width, height, pixels) = decode_rgb(path.as_ref())?;
        unsafe { Self::from_rgb_pixels(gl, width, height, &pixels, filter) }
    }

    /// Upload tightly-packed RGB8 pixels as a new texture.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns a GL error string if texture creation fails.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height * 3`.
    pub unsafe fn from_rgb_pixels(
        gl: &glow::Context,
        width: u32,
        height: u32,
        pixels: &[u8],
        filter: TextureFilter,
    ) -> Result<Self, String> {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "pixel data size mismatch",
        );

        let raw = unsafe { gl.create_texture() }?;
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(raw));
            // RGB rows are not 4-byte aligned for arbitrary widths.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                RGB8_INTERNAL_FORMAT,
                gl_size(width),
                gl_size(height),
                0,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);

            #[expect(clippy::cast_possible_wrap)]
            {
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_WRAP_S,
                    glow::REPEAT as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_WRAP_T,
                    glow::REPEAT as i32,
                );
            }
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                filter.min_filter(),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                filter.mag_filter(),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        Ok(Self { raw })
    }

    /// Create a 1×1 texture of a single color, for meshes without a diffuse
    /// map.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns a GL error string if texture creation fails.
    pub unsafe fn solid_color(gl: &glow::Context, rgb: [u8; 3]) -> Result<Self, String> {
        unsafe { Self::from_rgb_pixels(gl, 1, 1, &rgb, TextureFilter::Linear) }
    }

    /// Bind this texture to the given texture unit.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    pub unsafe fn bind(&self, gl: &glow::Context, unit: u32) {
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.raw));
        }
    }

    /// Delete the GL texture object.
    ///
    /// # Safety
    ///
    /// Must be called with the context that created the texture, exactly
    /// once.
    pub unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe { gl.delete_texture(self.raw) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_modes_map_to_mipmap_aware_parameter_pairs() {
        #[expect(clippy::cast_possible_wrap)]
        {
            assert_eq!(
                TextureFilter::Linear.min_filter(),
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            assert_eq!(TextureFilter::Linear.mag_filter(), glow::LINEAR as i32);
            assert_eq!(
                TextureFilter::Nearest.min_filter(),
                glow::NEAREST_MIPMAP_NEAREST as i32,
            );
            assert_eq!(TextureFilter::Nearest.mag_filter(), glow::NEAREST as i32);
        }
    }

    #[test]
    fn decode_failure_names_the_missing_file() {
        let err = decode_rgb(Path::new("does-not-exist.jpg")).expect_err("file is missing");
        assert!(err.contains("does-not-exist.jpg"), "error was: {err}");
    }
}
