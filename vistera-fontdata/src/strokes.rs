//! Vector stroke extraction for line-drawn text.
//!
//! Strokes are synthesized from the embedded bitmaps: contiguous inked
//! pixel runs collapse into line segments in an 8-unit em space with the
//! baseline at y = 0 and y increasing upward.

use crate::bitmaps::{GLYPH_BITMAPS, glyph_index};

/// One line segment of a vector glyph, in 8-unit em coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

const MIN_VERTICAL_RUN: u32 = 3;

fn inked(bitmap: &[u8; 8], x: u32, row: u32) -> bool {
    bitmap[row as usize] & (1 << x) != 0
}

/// Extracts the stroke set for one character. Long vertical runs are
/// claimed first so stems become single segments; the remaining ink
/// collapses into horizontal runs, with isolated pixels kept as
/// unit-length dashes. A space yields no strokes.
pub fn glyph_strokes(ch: char) -> Vec<Stroke> {
    let bitmap = &GLYPH_BITMAPS[glyph_index(ch)];
    let mut consumed = [[false; 8]; 8];
    let mut strokes = Vec::new();

    // Vertical stems: column-wise runs of at least MIN_VERTICAL_RUN rows.
    for x in 0..8u32 {
        let mut row = 0u32;
        while row < 8 {
            if !inked(bitmap, x, row) {
                row += 1;
                continue;
            }
            let start = row;
            while row < 8 && inked(bitmap, x, row) {
                row += 1;
            }
            if row - start >= MIN_VERTICAL_RUN {
                for r in start..row {
                    consumed[r as usize][x as usize] = true;
                }
                // bitmap rows run top-down, em space runs bottom-up
                strokes.push(Stroke {
                    x0: x as f32,
                    y0: (8 - row) as f32,
                    x1: x as f32,
                    y1: (7 - start) as f32,
                });
            }
        }
    }

    // Whatever ink remains becomes horizontal segments.
    for row in 0..8u32 {
        let y = (7 - row) as f32;
        let mut x = 0u32;
        while x < 8 {
            if !inked(bitmap, x, row) || consumed[row as usize][x as usize] {
                x += 1;
                continue;
            }
            let start = x;
            while x < 8 && inked(bitmap, x, row) && !consumed[row as usize][x as usize] {
                x += 1;
            }
            strokes.push(Stroke { x0: start as f32, y0: y, x1: x as f32, y1: y });
        }
    }

    strokes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphen_is_horizontal_only() {
        let strokes = glyph_strokes('-');
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].y0, strokes[0].y1);
        assert!(strokes[0].x1 - strokes[0].x0 >= 4.0);
    }

    #[test]
    fn pipe_is_vertical_only() {
        let strokes = glyph_strokes('|');
        assert!(!strokes.is_empty());
        for s in &strokes {
            assert_eq!(s.x0, s.x1);
            assert!(s.y1 > s.y0);
        }
    }

    #[test]
    fn space_has_no_strokes() {
        assert!(glyph_strokes(' ').is_empty());
    }

    #[test]
    fn strokes_stay_inside_em_square() {
        for code in 32u8..127 {
            for s in glyph_strokes(code as char) {
                assert!((0.0..=8.0).contains(&s.x0), "{code} x0");
                assert!((0.0..=8.0).contains(&s.x1), "{code} x1");
                assert!((0.0..=8.0).contains(&s.y0), "{code} y0");
                assert!((0.0..=8.0).contains(&s.y1), "{code} y1");
            }
        }
    }

    #[test]
    fn out_of_range_character_renders_blank() {
        assert!(glyph_strokes('\u{263a}').is_empty());
    }
}
