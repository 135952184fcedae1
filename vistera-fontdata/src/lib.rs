//! Embedded font data for the vistera text engine.
//!
//! Everything here is CPU-only and renderer-agnostic: glyph bitmaps,
//! per-family advance tables, the assembled raster glyph sheet, and the
//! vector stroke set. `vistera-render` turns these into textures and
//! geometry.

mod bitmaps;
mod metrics;
mod sheet;
mod strokes;

pub use bitmaps::{FIRST_GLYPH, GLYPH_COUNT, glyph_index};
pub use metrics::string_width;
pub use sheet::{CELL_SIZE, GlyphCell, GlyphSheet, SHEET_COLUMNS};
pub use strokes::{Stroke, glyph_strokes};

/// The five typeface choices exposed to scene properties. Four are
/// bitmap families rendered from the shared glyph sheet; `Vector` draws
/// line strokes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFamily {
    Fixed,
    #[default]
    Small,
    Sans,
    Serif,
    Vector,
}

/// Sheet stacking order for the bitmap families.
pub const RASTER_FAMILIES: [FontFamily; 4] =
    [FontFamily::Fixed, FontFamily::Small, FontFamily::Sans, FontFamily::Serif];

impl FontFamily {
    /// Resolves a `font` property string. Unrecognized values fall back
    /// to the small bitmap face.
    pub fn from_property(name: &str) -> FontFamily {
        match name {
            "fixed" => FontFamily::Fixed,
            "sans" => FontFamily::Sans,
            "serif" => FontFamily::Serif,
            "vector" => FontFamily::Vector,
            _ => FontFamily::Small,
        }
    }

    pub fn is_raster(self) -> bool {
        self != FontFamily::Vector
    }

    /// Position of this family in [`RASTER_FAMILIES`]; `None` for vector.
    pub(crate) fn raster_index(self) -> Option<usize> {
        RASTER_FAMILIES.iter().position(|&f| f == self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_names_resolve() {
        assert_eq!(FontFamily::from_property("fixed"), FontFamily::Fixed);
        assert_eq!(FontFamily::from_property("sans"), FontFamily::Sans);
        assert_eq!(FontFamily::from_property("serif"), FontFamily::Serif);
        assert_eq!(FontFamily::from_property("vector"), FontFamily::Vector);
    }

    #[test]
    fn unknown_property_defaults_to_small() {
        assert_eq!(FontFamily::from_property("helvetica"), FontFamily::Small);
        assert_eq!(FontFamily::from_property(""), FontFamily::Small);
    }

    #[test]
    fn only_vector_is_not_raster() {
        for family in RASTER_FAMILIES {
            assert!(family.is_raster());
        }
        assert!(!FontFamily::Vector.is_raster());
    }
}
