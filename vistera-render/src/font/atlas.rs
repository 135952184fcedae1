//! GPU-side raster glyph atlas.
//!
//! Wraps the CPU glyph sheet from `vistera-fontdata` in a single
//! 2D texture plus cell lookups. Built at most once per manager; the
//! explicit state enum keeps the one-time-build contract visible.

use glow::HasContext;
use vistera_fontdata::GlyphSheet;
use vistera_image::PixelBuffer;

use crate::{error::Error, gl::TextureHandle};

/// Build guard for the shared atlas.
pub(crate) enum AtlasState {
    NotBuilt,
    Built(RasterAtlas),
}

pub(crate) struct RasterAtlas {
    texture: TextureHandle,
    sheet: GlyphSheet,
}

impl RasterAtlas {
    /// Assembles the glyph sheet and uploads it as a single-channel
    /// texture on unit 0. The shader reads the red channel as coverage,
    /// standing in for a dedicated alpha texture.
    pub(crate) fn build(gl: &glow::Context) -> Result<RasterAtlas, Error> {
        let sheet = GlyphSheet::build();
        // Sheet rows run top-down and the cell v coordinates agree, so
        // the upload must not flip.
        let pixels =
            PixelBuffer::new(sheet.pixels().to_vec(), sheet.width(), sheet.height(), 1);
        let texture = TextureHandle::upload_2d(gl, pixels, 0, false)?;
        unsafe {
            // glyph quads sample exact cells, no tiling
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
        }
        tracing::info!(
            width = sheet.width(),
            height = sheet.height(),
            "raster glyph atlas built"
        );
        Ok(RasterAtlas { texture, sheet })
    }

    pub(crate) fn sheet(&self) -> &GlyphSheet {
        &self.sheet
    }

    pub(crate) fn bind(&self, gl: &glow::Context) {
        self.texture.bind(gl);
    }

    pub(crate) fn delete(&self, gl: &glow::Context) {
        self.texture.delete(gl);
    }
}
