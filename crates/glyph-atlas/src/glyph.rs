//! Glyph inputs handed to the packer and the placement types it produces.

/// Identifies an entry in the atlas.
///
/// Regular glyphs are keyed by character code. The two reserved entries are
/// separate variants so they can never collide with a real character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlyphKey {
    Char(u32),
    /// Rendered for any character without its own entry.
    Fallback,
    /// Fully covered block for flat-coloured quads sharing the atlas texture.
    SolidFill,
}

impl From<char> for GlyphKey {
    fn from(ch: char) -> Self {
        Self::Char(ch as u32)
    }
}

/// CPU-side glyph coverage bitmap.
///
/// Coordinate convention for `bearing_px`:
/// - x grows right (offset from the pen to the bitmap's left edge)
/// - y grows up (distance from the baseline to the bitmap's top edge)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphBitmap {
    /// Bitmap dimensions in pixels: (width, height).
    pub size_px: [u32; 2],
    pub bearing_px: [i32; 2],
    /// Horizontal pen advance in pixels.
    pub advance_px: i32,
    /// Row-major coverage bytes (0..=255), top row first, length = `width * height`.
    pub pixels: Vec<u8>,
}

impl GlyphBitmap {
    pub fn new(size_px: [u32; 2], bearing_px: [i32; 2], advance_px: i32, pixels: Vec<u8>) -> Self {
        Self {
            size_px,
            bearing_px,
            advance_px,
            pixels,
        }
    }

    /// A bitmap with no pixels, e.g. whitespace. Only the advance matters.
    pub fn empty(advance_px: i32) -> Self {
        Self {
            advance_px,
            ..Default::default()
        }
    }

    /// A fully covered square block.
    pub fn solid(side_px: u32) -> Self {
        let len = side_px as usize * side_px as usize;
        Self {
            size_px: [side_px, side_px],
            bearing_px: [0, 0],
            advance_px: side_px as i32,
            pixels: vec![0xff; len],
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.size_px[0]
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.size_px[1]
    }

    /// Used only to order glyphs before packing.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.size_px[0] as u64 * self.size_px[1] as u64
    }

    pub(crate) fn has_consistent_size(&self) -> bool {
        self.pixels.len() as u64 == self.area()
    }
}

/// One rasterized glyph to pack, keyed by its character code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRecord {
    pub char_code: u32,
    pub bitmap: GlyphBitmap,
}

impl GlyphRecord {
    pub fn new(char_code: u32, bitmap: GlyphBitmap) -> Self {
        Self { char_code, bitmap }
    }
}

/// Where the packer put a glyph's bitmap: atlas top-left origin, y down, inside
/// the margin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AtlasPx {
    pub x: u32,
    pub y: u32,
}

impl AtlasPx {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A glyph's bitmap footprint in the packer's y-down frame.
///
/// Half-open and margin-exclusive: [`inflate`](Self::inflate) by the atlas margin
/// gives the slot the shelf pass reserved for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasRectPx {
    pub min: AtlasPx,
    pub size: [u32; 2],
}

impl AtlasRectPx {
    pub const fn new(min: AtlasPx, size: [u32; 2]) -> Self {
        Self { min, size }
    }

    /// First column past the bitmap.
    #[inline]
    pub const fn max_x(self) -> u32 {
        self.min.x + self.size[0]
    }

    /// First row below the bitmap.
    #[inline]
    pub const fn max_y(self) -> u32 {
        self.min.y + self.size[1]
    }

    pub const fn inflate(self, margin: u32) -> Self {
        Self {
            min: AtlasPx::new(
                self.min.x.saturating_sub(margin),
                self.min.y.saturating_sub(margin),
            ),
            size: [self.size[0] + margin * 2, self.size[1] + margin * 2],
        }
    }

    /// Two slots share a pixel. Touching edges do not count.
    pub const fn intersects(self, other: Self) -> bool {
        self.min.x < other.max_x()
            && other.min.x < self.max_x()
            && self.min.y < other.max_y()
            && other.min.y < self.max_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_bitmap_is_fully_covered() {
        let solid = GlyphBitmap::solid(4);
        assert_eq!(solid.size_px, [4, 4]);
        assert_eq!(solid.advance_px, 4);
        assert_eq!(solid.pixels.len(), 16);
        assert!(solid.pixels.iter().all(|&p| p == 0xff));
        assert!(solid.has_consistent_size());
    }

    #[test]
    fn test_empty_bitmap_keeps_advance() {
        let space = GlyphBitmap::empty(9);
        assert_eq!(space.area(), 0);
        assert_eq!(space.advance_px, 9);
        assert!(space.has_consistent_size());
    }

    #[test]
    fn test_rect_intersection_is_half_open() {
        let a = AtlasRectPx::new(AtlasPx::new(0, 0), [4, 4]);
        let touching = AtlasRectPx::new(AtlasPx::new(4, 0), [4, 4]);
        let overlapping = AtlasRectPx::new(AtlasPx::new(3, 3), [4, 4]);

        assert!(!a.intersects(touching));
        assert!(a.intersects(overlapping));
        assert!(overlapping.intersects(a));
    }

    #[test]
    fn test_inflate_adds_margin_on_all_sides() {
        let rect = AtlasRectPx::new(AtlasPx::new(5, 6), [3, 2]).inflate(2);
        assert_eq!(rect.min, AtlasPx::new(3, 4));
        assert_eq!(rect.size, [7, 6]);
    }

    #[test]
    fn test_char_key_from_char() {
        assert_eq!(GlyphKey::from('A'), GlyphKey::Char(65));
        assert_ne!(GlyphKey::from('A'), GlyphKey::Fallback);
    }
}
