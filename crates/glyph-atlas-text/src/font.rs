//! A packed font: the atlas plus character-level lookups.

use glyph_atlas::{GlyphAtlas, GlyphInfo, GlyphRecord, PackerConfig};

use crate::error::TextResult;
use crate::rasterizer::{Charset, GlyphRasterizer};

/// One face at one size, packed into a single atlas.
#[derive(Clone, Debug)]
pub struct FontAtlas {
    atlas: GlyphAtlas,
}

impl FontAtlas {
    /// Rasterize `charset` plus the missing-glyph representation and pack them.
    ///
    /// `config.font_px` is overridden by the rasterizer's nominal size. Characters the
    /// rasterizer cannot map are left out and resolve to the fallback glyph.
    pub fn build<R: GlyphRasterizer + ?Sized>(
        rasterizer: &mut R,
        charset: &Charset,
        config: &PackerConfig,
    ) -> TextResult<Self> {
        let config = config.with_font_px(rasterizer.nominal_px());

        let chars = charset.resolve(rasterizer);
        let mut records = Vec::with_capacity(chars.len());
        let mut unmapped = 0usize;

        for ch in chars {
            match rasterizer.rasterize(ch) {
                Some(bitmap) => records.push(GlyphRecord::new(ch as u32, bitmap)),
                None => {
                    log::debug!("No glyph for {:?}, it will use the fallback glyph", ch);
                    unmapped += 1;
                }
            }
        }

        let fallback = rasterizer.rasterize_missing();
        let requested = records.len();
        let atlas = glyph_atlas::pack(records, fallback, &config)?;

        log::info!(
            "Font atlas built: {} glyphs at {}px into {}x{} ({} unmapped)",
            requested,
            config.font_px,
            atlas.side_length(),
            atlas.side_length(),
            unmapped
        );

        Ok(Self { atlas })
    }

    pub fn from_atlas(atlas: GlyphAtlas) -> Self {
        Self { atlas }
    }

    #[inline]
    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    pub fn into_atlas(self) -> GlyphAtlas {
        self.atlas
    }

    #[inline]
    pub fn side_length(&self) -> u32 {
        self.atlas.side_length()
    }

    /// Entry for `ch`, or the fallback glyph when the font has none.
    #[inline]
    pub fn glyph(&self, ch: char) -> &GlyphInfo {
        self.atlas.glyph(ch)
    }

    pub fn solid_fill(&self) -> Option<&GlyphInfo> {
        self.atlas.solid_fill()
    }

    /// Sum of the advances of every character, in font units.
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.glyph(ch).advance).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockRasterizer;
    use glyph_atlas::GlyphKey;

    fn build(charset: &Charset) -> FontAtlas {
        let mut rasterizer = MockRasterizer::new();
        FontAtlas::build(&mut rasterizer, charset, &PackerConfig::default()).unwrap()
    }

    #[test]
    fn test_build_uses_rasterizer_size() {
        let font = build(&Charset::from("ab"));
        assert_eq!(font.atlas().font_px(), 10);
        assert_eq!(font.glyph('a').size, [0.6, 0.8]);
    }

    #[test]
    fn test_unmapped_chars_fall_back() {
        let font = build(&Charset::from("a1"));
        let atlas = font.atlas();

        assert!(atlas.contains(GlyphKey::Char('a' as u32)));
        assert!(!atlas.contains(GlyphKey::Char('1' as u32)));
        assert_eq!(font.glyph('1'), atlas.fallback());
        // 'a', fallback and solid fill.
        assert_eq!(atlas.len(), 3);
    }

    #[test]
    fn test_text_width_sums_advances() {
        let font = build(&Charset::Ascii);
        // a (0.7) + space (0.4) + i (0.3) + unmapped '1' falls back (0.6)
        let width = font.text_width("a i1");
        assert!((width - 2.0).abs() < 1e-6);
        assert_eq!(font.text_width(""), 0.0);
    }

    #[test]
    fn test_rasterizer_called_once_per_char() {
        let mut rasterizer = MockRasterizer::new();
        FontAtlas::build(
            &mut rasterizer,
            &Charset::from("aabbc"),
            &PackerConfig::default(),
        )
        .unwrap();
        assert_eq!(rasterizer.calls, 3);
    }

    #[test]
    fn test_all_packs_exactly_the_mapped_set() {
        let mut rasterizer = MockRasterizer::new();
        let mapped = rasterizer.mapped_chars();
        let font = FontAtlas::build(&mut rasterizer, &Charset::All, &PackerConfig::default())
            .unwrap();
        let atlas = font.atlas();

        assert_eq!(rasterizer.calls, mapped.len());
        // Mapped characters, fallback and solid fill.
        assert_eq!(atlas.len(), mapped.len() + 2);
        for ch in mapped {
            assert!(atlas.contains(GlyphKey::from(ch)), "{:?} missing", ch);
        }
        assert!(!atlas.contains(GlyphKey::Char('1' as u32)));
    }

    #[test]
    fn test_solid_fill_is_optional() {
        let mut rasterizer = MockRasterizer::new();
        let font = FontAtlas::build(
            &mut rasterizer,
            &Charset::from("a"),
            &PackerConfig::default().with_solid_fill(false),
        )
        .unwrap();
        assert!(font.solid_fill().is_none());

        let font = build(&Charset::from("a"));
        let solid = font.solid_fill().unwrap();
        assert_eq!(solid.size, [1.0, 1.0]);
    }

    #[test]
    fn test_zero_nominal_size_is_reported() {
        struct Broken;
        impl GlyphRasterizer for Broken {
            fn nominal_px(&self) -> u32 {
                0
            }
            fn rasterize(&mut self, _ch: char) -> Option<glyph_atlas::GlyphBitmap> {
                None
            }
            fn rasterize_missing(&mut self) -> glyph_atlas::GlyphBitmap {
                glyph_atlas::GlyphBitmap::empty(0)
            }
            fn mapped_chars(&mut self) -> Vec<char> {
                Vec::new()
            }
        }

        let err = FontAtlas::build(&mut Broken, &Charset::Ascii, &PackerConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            crate::TextError::Atlas(glyph_atlas::AtlasError::InvalidFontSize(0))
        );
    }
}
