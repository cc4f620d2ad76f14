//! The rasterizer seam: anything that can turn a character into a coverage bitmap.

use glyph_atlas::GlyphBitmap;

/// Produces glyph bitmaps for one font face at one nominal pixel size.
pub trait GlyphRasterizer {
    /// Pixel size the face is rasterized at. Atlas metrics are normalised by this.
    fn nominal_px(&self) -> u32;

    /// Rasterize `ch`, or `None` if the face has no glyph for it.
    ///
    /// Whitespace should come back as an empty bitmap with a non-zero advance.
    fn rasterize(&mut self, ch: char) -> Option<GlyphBitmap>;

    /// The face's representation of a missing glyph (usually `.notdef`).
    fn rasterize_missing(&mut self) -> GlyphBitmap;

    /// Every character the face maps to a real glyph, in code point order.
    fn mapped_chars(&mut self) -> Vec<char>;
}

/// Characters to put in an atlas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Charset {
    /// Printable ASCII, U+0020 through U+007E.
    #[default]
    Ascii,
    /// Every scalar value in `first..=last`.
    Range(char, char),
    Chars(Vec<char>),
    /// Everything the face maps, as listed by [`GlyphRasterizer::mapped_chars`].
    All,
}

impl Charset {
    /// The characters in order, without duplicates.
    pub fn resolve<R: GlyphRasterizer + ?Sized>(&self, rasterizer: &mut R) -> Vec<char> {
        let all: Vec<char> = match self {
            Charset::Ascii => (' '..='~').collect(),
            Charset::Range(first, last) => (*first..=*last).collect(),
            Charset::Chars(chars) => chars.clone(),
            Charset::All => rasterizer.mapped_chars(),
        };

        let mut seen = std::collections::HashSet::with_capacity(all.len());
        all.into_iter().filter(|ch| seen.insert(*ch)).collect()
    }
}

impl From<&str> for Charset {
    fn from(text: &str) -> Self {
        Charset::Chars(text.chars().collect())
    }
}
