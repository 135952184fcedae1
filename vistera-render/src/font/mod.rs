//! Text label rendering: raster glyph quads and vector strokes.
//!
//! One [`FontManager`] owns the atlas, the GL pipeline, and the active
//! font selection. Raster and vector modes are mutually exclusive per
//! draw; both share the same shader and vertex stream.

mod atlas;
mod pipeline;

use vistera_fontdata::{FontFamily, GlyphSheet, glyph_strokes, string_width};

use crate::{
    GlslVersion,
    error::Error,
    font::{
        atlas::{AtlasState, RasterAtlas},
        pipeline::TextPipeline,
    },
    mat4::{self, Mat4},
};

/// World-units-per-pixel factor applied to all 3D text.
pub const FONT_SCALE_3D: f32 = 0.0015;

/// Horizontal alignment for billboard labels.
pub const ALIGN_LEFT: i32 = -1;
pub const ALIGN_CENTRE: i32 = 0;
pub const ALIGN_RIGHT: i32 = 1;

/// Owns font selection state and the lazily-built rendering resources.
///
/// The atlas and pipeline are created on the first print call and reused
/// for the manager's lifetime; the atlas is never rebuilt or repacked.
pub struct FontManager {
    glsl_version: GlslVersion,
    family: FontFamily,
    fontscale: f32,
    colour: [f32; 4],
    viewport: [i32; 4],
    atlas: AtlasState,
    pipeline: Option<TextPipeline>,
}

impl FontManager {
    pub fn new(glsl_version: GlslVersion) -> FontManager {
        FontManager {
            glsl_version,
            family: FontFamily::default(),
            fontscale: 1.0,
            colour: [1.0, 1.0, 1.0, 1.0],
            viewport: [0, 0, 0, 0],
            atlas: AtlasState::NotBuilt,
            pipeline: None,
        }
    }

    /// Window geometry used for 2D pen placement and billboard
    /// projection. Callers update this on resize.
    pub fn set_viewport(&mut self, viewport: [i32; 4]) {
        self.viewport = viewport;
    }

    /// Applies font properties from the scene layer. `scale2d` is the
    /// output scaling factor applied on top of `fontscale` for raster
    /// families only; vector text is resolution independent. The colour
    /// is taken only when its alpha is positive.
    pub fn set_font(&mut self, family: &str, fontscale: f32, colour: [f32; 4], scale2d: f32) {
        self.family = FontFamily::from_property(family);
        self.fontscale =
            if self.family.is_raster() { fontscale * scale2d } else { fontscale };
        if colour[3] > 0.0 {
            self.colour = colour;
        }
    }

    pub fn family(&self) -> FontFamily {
        self.family
    }

    /// Measured width of `text` under the current font selection, in
    /// screen pixels (raster) or em units (vector).
    pub fn print_width(&self, text: &str) -> f32 {
        string_width(self.family, text, self.fontscale)
    }

    /// Draws `text` with its top-left pen position at pixel `(x, y)` in
    /// the bottom-left-origin screen frame.
    pub fn print(&mut self, gl: &glow::Context, x: i32, y: i32, text: &str) -> Result<(), Error> {
        self.ensure_ready(gl)?;
        let origin = [x as f32, y as f32, 0.0];
        let transform = self.screen_transform();
        self.draw_batch(gl, text, origin, self.screen_scale(), &transform)
    }

    /// Draws `text` anchored at a world-space position, oriented by the
    /// scene transform.
    pub fn print3d(
        &mut self,
        gl: &glow::Context,
        pos: [f32; 3],
        text: &str,
        modelview: &Mat4,
        projection: &Mat4,
    ) -> Result<(), Error> {
        self.ensure_ready(gl)?;
        let transform = mat4::multiply(projection, modelview);
        self.draw_batch(gl, text, pos, FONT_SCALE_3D * self.fontscale, &transform)
    }

    /// Draws a viewer-facing label: the anchor is projected to screen
    /// space, rotation therefore never applies, and the text is drawn as
    /// 2D with a small depth offset pulling it in front of the anchor
    /// geometry. `align` is [`ALIGN_LEFT`], [`ALIGN_CENTRE`] or
    /// [`ALIGN_RIGHT`]. Anchors with no screen position are skipped.
    pub fn print3d_billboard(
        &mut self,
        gl: &glow::Context,
        pos: [f32; 3],
        align: i32,
        text: &str,
        modelview: &Mat4,
        projection: &Mat4,
    ) -> Result<(), Error> {
        let Some(screen) = mat4::project(pos, modelview, projection, self.viewport) else {
            return Ok(());
        };
        self.ensure_ready(gl)?;

        let width = self.print_width(text);
        let x = match align {
            ALIGN_CENTRE => screen[0] - width / 2.0,
            ALIGN_RIGHT => screen[0] - width,
            _ => screen[0],
        };
        let z = -(screen[2] - 0.025 * self.fontscale);
        let transform = self.screen_transform();
        self.draw_batch(gl, text, [x, screen[1], z], self.screen_scale(), &transform)
    }

    /// Releases all GL resources. The manager is not usable afterwards.
    pub fn delete(&mut self, gl: &glow::Context) {
        if let AtlasState::Built(atlas) = &self.atlas {
            atlas.delete(gl);
        }
        self.atlas = AtlasState::NotBuilt;
        if let Some(pipeline) = self.pipeline.take() {
            pipeline.delete(gl);
        }
    }

    /// Raster glyphs only scale up; below 1.0 they render at native size.
    fn screen_scale(&self) -> f32 {
        if self.family.is_raster() && self.fontscale < 1.0 {
            1.0
        } else {
            self.fontscale
        }
    }

    fn screen_transform(&self) -> Mat4 {
        mat4::ortho(
            self.viewport[0] as f32,
            (self.viewport[0] + self.viewport[2]) as f32,
            self.viewport[1] as f32,
            (self.viewport[1] + self.viewport[3]) as f32,
            -1.0,
            1.0,
        )
    }

    fn ensure_ready(&mut self, gl: &glow::Context) -> Result<(), Error> {
        if self.pipeline.is_none() {
            self.pipeline = Some(TextPipeline::new(gl, self.glsl_version)?);
        }
        if self.family.is_raster() && matches!(self.atlas, AtlasState::NotBuilt) {
            self.atlas = AtlasState::Built(RasterAtlas::build(gl)?);
        }
        Ok(())
    }

    fn draw_batch(
        &self,
        gl: &glow::Context,
        text: &str,
        origin: [f32; 3],
        scale: f32,
        transform: &Mat4,
    ) -> Result<(), Error> {
        let Some(pipeline) = &self.pipeline else {
            return Ok(());
        };
        if self.family.is_raster() {
            let AtlasState::Built(atlas) = &self.atlas else {
                return Ok(());
            };
            let vertices = raster_vertices(atlas.sheet(), self.family, text, origin, scale);
            atlas.bind(gl);
            pipeline.draw(gl, &vertices, glow::TRIANGLES, transform, self.colour, true);
        } else {
            let vertices = vector_vertices(text, origin, scale);
            pipeline.draw(gl, &vertices, glow::LINES, transform, self.colour, false);
        }
        Ok(())
    }
}

/// Emits two textured triangles per glyph, the quad hanging downward
/// from the pen and the pen advancing by `advance * scale`.
fn raster_vertices(
    sheet: &GlyphSheet,
    family: FontFamily,
    text: &str,
    origin: [f32; 3],
    scale: f32,
) -> Vec<f32> {
    let mut vertices = Vec::with_capacity(text.len() * 6 * pipeline::VERTEX_FLOATS);
    let mut pen = origin[0];
    for ch in text.chars() {
        let Some(cell) = sheet.cell(family, ch) else {
            continue;
        };
        let (x0, x1) = (pen, pen + cell.width as f32 * scale);
        let (y0, y1) = (origin[1], origin[1] - cell.height as f32 * scale);
        let z = origin[2];
        let quad = [
            [x0, y0, z, cell.u0, cell.v0],
            [x1, y0, z, cell.u1, cell.v0],
            [x1, y1, z, cell.u1, cell.v1],
            [x0, y0, z, cell.u0, cell.v0],
            [x1, y1, z, cell.u1, cell.v1],
            [x0, y1, z, cell.u0, cell.v1],
        ];
        for vertex in quad {
            vertices.extend_from_slice(&vertex);
        }
        pen += cell.advance as f32 * scale;
    }
    vertices
}

/// Emits line-pair vertices for stroke glyphs, pen advance matching the
/// vector width table.
fn vector_vertices(text: &str, origin: [f32; 3], scale: f32) -> Vec<f32> {
    let widths = FontFamily::Vector.widths();
    let mut vertices = Vec::new();
    let mut pen = origin[0];
    for ch in text.chars() {
        for stroke in glyph_strokes(ch) {
            vertices.extend_from_slice(&[
                pen + stroke.x0 * scale,
                origin[1] + stroke.y0 * scale,
                origin[2],
                0.0,
                0.0,
            ]);
            vertices.extend_from_slice(&[
                pen + stroke.x1 * scale,
                origin[1] + stroke.y1 * scale,
                origin[2],
                0.0,
                0.0,
            ]);
        }
        let advance = widths[vistera_fontdata::glyph_index(ch)] as f32 + 1.0;
        pen += advance * scale;
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_batch_emits_one_quad_per_glyph() {
        let sheet = GlyphSheet::build();
        let vertices =
            raster_vertices(&sheet, FontFamily::Sans, "abc", [0.0, 0.0, 0.0], 1.0);
        assert_eq!(vertices.len(), 3 * 6 * pipeline::VERTEX_FLOATS);
    }

    #[test]
    fn raster_pen_advance_tracks_measured_width() {
        let sheet = GlyphSheet::build();
        let text = "xy";
        let vertices = raster_vertices(&sheet, FontFamily::Sans, text, [0.0, 0.0, 0.0], 1.0);
        // rightmost x of the last quad stays within the measured width
        let last_x = vertices[(vertices.len() - 2 * pipeline::VERTEX_FLOATS)..]
            .chunks(pipeline::VERTEX_FLOATS)
            .map(|v| v[0])
            .fold(f32::MIN, f32::max);
        assert!(last_x <= string_width(FontFamily::Sans, text, 1.0));
    }

    #[test]
    fn raster_quads_scale_with_fontscale() {
        let sheet = GlyphSheet::build();
        let base = raster_vertices(&sheet, FontFamily::Fixed, "A", [0.0, 0.0, 0.0], 1.0);
        let doubled = raster_vertices(&sheet, FontFamily::Fixed, "A", [0.0, 0.0, 0.0], 2.0);
        assert_eq!(doubled[pipeline::VERTEX_FLOATS], 2.0 * base[pipeline::VERTEX_FLOATS]);
    }

    #[test]
    fn vector_batch_is_line_pairs() {
        let vertices = vector_vertices("-|", [0.0, 0.0, 0.0], 1.0);
        assert!(!vertices.is_empty());
        assert_eq!(vertices.len() % (2 * pipeline::VERTEX_FLOATS), 0);
    }

    #[test]
    fn vector_space_emits_no_geometry_but_advances() {
        let lone = vector_vertices("|", [0.0, 0.0, 0.0], 1.0);
        let spaced = vector_vertices(" |", [0.0, 0.0, 0.0], 1.0);
        assert_eq!(lone.len(), spaced.len());
        assert!(spaced[0] > lone[0]);
    }

    #[test]
    fn set_font_ignores_transparent_colour() {
        let mut manager = FontManager::new(GlslVersion::Gl330);
        manager.set_font("sans", 1.0, [1.0, 0.0, 0.0, 1.0], 1.0);
        manager.set_font("sans", 1.0, [0.0, 1.0, 0.0, 0.0], 1.0);
        assert_eq!(manager.colour, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_family_falls_back_to_small() {
        let mut manager = FontManager::new(GlslVersion::Gl330);
        manager.set_font("comic-sans", 1.0, [1.0; 4], 1.0);
        assert_eq!(manager.family(), FontFamily::Small);
    }

    #[test]
    fn scale2d_applies_to_raster_only() {
        let mut manager = FontManager::new(GlslVersion::Gl330);
        manager.set_font("sans", 1.0, [1.0; 4], 2.0);
        assert_eq!(manager.fontscale, 2.0);
        manager.set_font("vector", 1.0, [1.0; 4], 2.0);
        assert_eq!(manager.fontscale, 1.0);
    }

    #[test]
    fn raster_never_draws_below_native_size() {
        let mut manager = FontManager::new(GlslVersion::Gl330);
        manager.set_font("fixed", 0.5, [1.0; 4], 1.0);
        assert_eq!(manager.screen_scale(), 1.0);
        manager.set_font("vector", 0.5, [1.0; 4], 1.0);
        assert_eq!(manager.screen_scale(), 0.5);
    }
}
