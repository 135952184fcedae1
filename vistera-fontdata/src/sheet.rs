//! Glyph sheet assembly.
//!
//! All raster families share one single-channel sheet: a 16-column grid of
//! 16 px cells, one family's six rows stacked below the previous family's
//! at a running y offset. The sheet is built once on the CPU; uploading it
//! as an alpha texture is the renderer's job.

use crate::{
    FontFamily, RASTER_FAMILIES,
    bitmaps::{GLYPH_BITMAPS, GLYPH_COUNT, glyph_index},
};

/// Cells per sheet row.
pub const SHEET_COLUMNS: u32 = 16;
/// Cell edge length in pixels.
pub const CELL_SIZE: u32 = 16;

const ROWS_PER_FAMILY: u32 = GLYPH_COUNT as u32 / SHEET_COLUMNS;

/// Texture placement and pen advance for one glyph of one family.
///
/// `v0` is the top edge and `v1` the bottom edge in sheet texture
/// coordinates (v grows downward, matching the pixel rows).
#[derive(Debug, Clone, Copy)]
pub struct GlyphCell {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
    /// Glyph image width in sheet pixels.
    pub width: u32,
    /// Glyph image height in sheet pixels.
    pub height: u32,
    /// Pen advance: glyph width plus one pixel of spacing.
    pub advance: u32,
}

/// The assembled single-channel glyph sheet for every raster family.
pub struct GlyphSheet {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    cells: Vec<[GlyphCell; GLYPH_COUNT]>,
}

impl GlyphSheet {
    /// Stamps every raster family's glyphs into one sheet. Families are
    /// appended top to bottom in [`RASTER_FAMILIES`] order and never
    /// repacked, so cell coordinates stay valid for the sheet's lifetime.
    pub fn build() -> GlyphSheet {
        let width = SHEET_COLUMNS * CELL_SIZE;
        let height = RASTER_FAMILIES.len() as u32 * ROWS_PER_FAMILY * CELL_SIZE;
        let mut pixels = vec![0u8; (width * height) as usize];
        let mut cells = Vec::with_capacity(RASTER_FAMILIES.len());

        let mut y_offset = 0u32;
        for family in RASTER_FAMILIES {
            cells.push(stamp_family(family, &mut pixels, width, height, y_offset));
            y_offset += ROWS_PER_FAMILY * CELL_SIZE;
        }

        tracing::debug!(width, height, families = cells.len(), "glyph sheet assembled");
        GlyphSheet { pixels, width, height, cells }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Single-channel coverage pixels, row-major from the top.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Looks up a glyph cell; `None` for the vector family, which has no
    /// sheet presence.
    pub fn cell(&self, family: FontFamily, ch: char) -> Option<&GlyphCell> {
        let index = family.raster_index()?;
        Some(&self.cells[index][glyph_index(ch)])
    }
}

fn stamp_family(
    family: FontFamily,
    pixels: &mut [u8],
    sheet_width: u32,
    sheet_height: u32,
    y_offset: u32,
) -> [GlyphCell; GLYPH_COUNT] {
    let widths = family.widths();
    let (scale_x, scale_y) = family.ink_scale();
    let char_height = family.char_height();
    // Serif gets a pixel of left side bearing; its advance table leaves
    // room for it.
    let bearing = u32::from(family == FontFamily::Serif);

    let mut cells = [GlyphCell { u0: 0.0, v0: 0.0, u1: 0.0, v1: 0.0, width: 0, height: 0, advance: 0 };
        GLYPH_COUNT];

    for (glyph, bitmap) in GLYPH_BITMAPS.iter().enumerate() {
        let cell_x = (glyph as u32 % SHEET_COLUMNS) * CELL_SIZE;
        let cell_y = y_offset + (glyph as u32 / SHEET_COLUMNS) * CELL_SIZE;

        for (row, &bits) in bitmap.iter().enumerate() {
            for x in 0..8u32 {
                if bits & (1 << x) == 0 {
                    continue;
                }
                for dy in 0..scale_y {
                    for dx in 0..scale_x {
                        let local_x = bearing + x * scale_x + dx;
                        if local_x >= CELL_SIZE {
                            continue;
                        }
                        let px = cell_x + local_x;
                        let py = cell_y + row as u32 * scale_y + dy;
                        pixels[(py * sheet_width + px) as usize] = 255;
                    }
                }
            }
        }

        let width = u32::from(widths[glyph]);
        cells[glyph] = GlyphCell {
            u0: cell_x as f32 / sheet_width as f32,
            v0: cell_y as f32 / sheet_height as f32,
            u1: (cell_x + width) as f32 / sheet_width as f32,
            v1: (cell_y + char_height) as f32 / sheet_height as f32,
            width,
            height: char_height,
            advance: width + 1,
        };
    }

    cells
}
