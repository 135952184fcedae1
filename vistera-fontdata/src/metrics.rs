//! Per-family glyph advance tables and string measurement.
//!
//! Each raster family gets one immutable 96-entry width table derived at
//! compile time from the embedded bitmaps; vector mode has its own table
//! in unscaled em units.

use crate::{
    FontFamily,
    bitmaps::{GLYPH_BITMAPS, GLYPH_COUNT, glyph_index, ink_extent},
};

/// Builds a width table as `scale * extent + pad`, with `blank` standing in
/// for glyphs with no ink (space).
const fn derive_widths(scale: u32, pad: u32, blank: u32) -> [u8; GLYPH_COUNT] {
    let mut widths = [0u8; GLYPH_COUNT];
    let mut i = 0;
    while i < GLYPH_COUNT {
        let extent = ink_extent(&GLYPH_BITMAPS[i]);
        widths[i] = if extent == 0 { blank as u8 } else { (scale * extent + pad) as u8 };
        i += 1;
    }
    widths
}

// Fixed is monospaced; the proportional families differ in ink scale and
// side bearing. Vector widths are in 8-unit em space.
const FIXED_WIDTHS: [u8; GLYPH_COUNT] = [9; GLYPH_COUNT];
const SMALL_WIDTHS: [u8; GLYPH_COUNT] = derive_widths(1, 1, 3);
const SANS_WIDTHS: [u8; GLYPH_COUNT] = derive_widths(2, 1, 4);
const SERIF_WIDTHS: [u8; GLYPH_COUNT] = derive_widths(2, 2, 5);
const VECTOR_WIDTHS: [u8; GLYPH_COUNT] = derive_widths(1, 1, 3);

impl FontFamily {
    /// The family's advance-width table (pixels for raster families,
    /// em units for vector).
    pub fn widths(self) -> &'static [u8; GLYPH_COUNT] {
        match self {
            FontFamily::Fixed => &FIXED_WIDTHS,
            FontFamily::Small => &SMALL_WIDTHS,
            FontFamily::Sans => &SANS_WIDTHS,
            FontFamily::Serif => &SERIF_WIDTHS,
            FontFamily::Vector => &VECTOR_WIDTHS,
        }
    }

    /// Glyph ink height in sheet pixels; doubles as the 2D raster print
    /// baseline offset.
    pub fn char_height(self) -> u32 {
        match self {
            FontFamily::Small => 8,
            _ => 16,
        }
    }

    /// Ink magnification (x, y) used when the family's glyphs are stamped
    /// into the 16 px sheet cells. Fixed keeps 1x ink horizontally so the
    /// glyph image stays inside its 9 px advance.
    pub(crate) fn ink_scale(self) -> (u32, u32) {
        match self {
            FontFamily::Small => (1, 1),
            FontFamily::Fixed => (1, 2),
            _ => (2, 2),
        }
    }
}

/// Measures a string: per-glyph advances plus one unit of inter-glyph
/// spacing per character, scaled by `fontscale`.
///
/// Raster families never scale below 1.0 (bitmap glyphs are not
/// downscaled), so sub-unit `fontscale` values return the unscaled width.
pub fn string_width(family: FontFamily, s: &str, fontscale: f32) -> f32 {
    let widths = family.widths();
    let mut len = 0u32;
    let mut count = 0u32;
    for ch in s.chars() {
        len += u32::from(widths[glyph_index(ch)]);
        count += 1;
    }
    let w = (len + count) as f32;
    if family == FontFamily::Vector || fontscale >= 1.0 {
        fontscale * w
    } else {
        w
    }
}
