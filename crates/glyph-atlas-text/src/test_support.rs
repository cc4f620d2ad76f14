use glyph_atlas::GlyphBitmap;

use crate::rasterizer::GlyphRasterizer;

/// Deterministic 10px "font":
/// - ' ' is empty with advance 4
/// - 'i' is 2x8, advance 3
/// - other ASCII letters are 6x8, bearing (1, 8), advance 7
/// - everything else is unmapped
/// - the missing glyph is a 5x7 box, advance 6
pub(crate) struct MockRasterizer {
    pub calls: usize,
}

impl MockRasterizer {
    pub fn new() -> Self {
        Self { calls: 0 }
    }
}

impl GlyphRasterizer for MockRasterizer {
    fn nominal_px(&self) -> u32 {
        10
    }

    fn rasterize(&mut self, ch: char) -> Option<GlyphBitmap> {
        self.calls += 1;
        match ch {
            ' ' => Some(GlyphBitmap::empty(4)),
            'i' => Some(GlyphBitmap::new([2, 8], [1, 8], 3, vec![0x80; 16])),
            c if c.is_ascii_alphabetic() => {
                Some(GlyphBitmap::new([6, 8], [1, 8], 7, vec![c as u8; 48]))
            }
            _ => None,
        }
    }

    fn rasterize_missing(&mut self) -> GlyphBitmap {
        let (w, h) = (5usize, 7usize);
        let pixels = (0..w * h)
            .map(|i| {
                let (x, y) = (i % w, i / w);
                if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                    0xff
                } else {
                    0
                }
            })
            .collect();
        GlyphBitmap::new([w as u32, h as u32], [0, 7], 6, pixels)
    }

    fn mapped_chars(&mut self) -> Vec<char> {
        std::iter::once(' ').chain('A'..='Z').chain('a'..='z').collect()
    }
}
