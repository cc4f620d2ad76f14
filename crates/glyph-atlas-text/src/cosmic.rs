//! `cosmic-text` implementation of [`GlyphRasterizer`].
//!
//! Each character is shaped on its own so that the face's cmap, hinting and advance
//! are all resolved by cosmic-text; the resulting physical cache key is rasterized to
//! an alpha mask through `SwashCache`.
//!
//! The font system starts from an empty database, so shaping never silently pulls a
//! glyph from a system fallback font: anything the face lacks maps to glyph 0.

use std::collections::HashSet;
use std::path::Path;

use cosmic_text::{
    fontdb, Attrs, Buffer, CacheKey, CacheKeyFlags, Family, FontSystem, Metrics, Shaping,
    SwashCache, SwashContent,
};
use glyph_atlas::GlyphBitmap;

use crate::error::{TextError, TextResult};
use crate::rasterizer::GlyphRasterizer;

/// A character no face should map, used to get the `.notdef` glyph with its advance.
const MISSING_PROBE: char = '\u{FFFF}';

/// Rasterizer for a single face loaded from font bytes.
pub struct CosmicRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    face_id: fontdb::ID,
    weight: fontdb::Weight,
    family: String,
    font_px: u32,
}

impl CosmicRasterizer {
    /// Load a face from a font file.
    pub fn from_file(path: impl AsRef<Path>, font_px: u32) -> TextResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => TextError::FontFileNotFound(path.to_path_buf()),
            _ => TextError::from(err),
        })?;
        Self::from_font_data(data, font_px)
    }

    /// Load a face from raw TrueType/OpenType bytes.
    pub fn from_font_data(data: Vec<u8>, font_px: u32) -> TextResult<Self> {
        let mut font_system =
            FontSystem::new_with_locale_and_db("en-US".to_string(), fontdb::Database::new());

        let before: HashSet<fontdb::ID> = font_system.db().faces().map(|face| face.id).collect();
        font_system.db_mut().load_font_data(data);

        let (face_id, weight, family) = font_system
            .db()
            .faces()
            .find(|face| !before.contains(&face.id))
            .map(|face| {
                let family = face
                    .families
                    .first()
                    .map(|f| f.0.clone())
                    .unwrap_or_default();
                (face.id, face.weight, family)
            })
            .ok_or_else(|| TextError::FontLoadError("no face found in font data".to_string()))?;

        log::info!("Loaded font face {:?} at {}px", family, font_px);

        Ok(Self {
            font_system,
            swash_cache: SwashCache::new(),
            face_id,
            weight,
            family,
            font_px,
        })
    }

    /// Family name of the loaded face.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Shape `ch` alone. Returns the physical cache key, the rounded advance and the
    /// glyph id (0 means the face has no glyph for `ch`).
    fn shape_char(&mut self, ch: char) -> Option<(CacheKey, i32, u16)> {
        let font_px = self.font_px as f32;
        let metrics = Metrics::new(font_px, font_px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        // Prevent wrapping: set a huge width and line height from metrics.
        buffer.set_size(
            &mut self.font_system,
            Some(f32::MAX),
            Some(metrics.line_height),
        );

        let attrs = Attrs::new().family(Family::Name(&self.family));
        let mut utf8 = [0u8; 4];
        buffer.set_text(
            &mut self.font_system,
            ch.encode_utf8(&mut utf8),
            &attrs,
            Shaping::Advanced,
            None,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let run = buffer.layout_runs().next()?;
        let glyph = run.glyphs.first()?;
        let physical = glyph.physical((0.0, 0.0), 1.0);

        Some((physical.cache_key, glyph.w.round() as i32, glyph.glyph_id))
    }

    /// Rasterize `cache_key` into an alpha mask.
    fn render(&mut self, cache_key: CacheKey, advance_px: i32) -> GlyphBitmap {
        let image = self
            .swash_cache
            .get_image(&mut self.font_system, cache_key)
            .clone();

        match image {
            Some(image) if image.content == SwashContent::Mask => GlyphBitmap::new(
                [image.placement.width, image.placement.height],
                // Swash `top` is already measured upward from the baseline.
                [image.placement.left, image.placement.top],
                advance_px,
                image.data,
            ),
            Some(_) => {
                // Color glyphs would need an RGBA atlas.
                log::warn!("Glyph {} is not a coverage mask, packing it empty", cache_key.glyph_id);
                GlyphBitmap::empty(advance_px)
            }
            None => GlyphBitmap::empty(advance_px),
        }
    }
}

impl GlyphRasterizer for CosmicRasterizer {
    fn nominal_px(&self) -> u32 {
        self.font_px
    }

    fn rasterize(&mut self, ch: char) -> Option<GlyphBitmap> {
        let (cache_key, advance_px, glyph_id) = self.shape_char(ch)?;
        if glyph_id == 0 {
            return None;
        }
        Some(self.render(cache_key, advance_px))
    }

    fn rasterize_missing(&mut self) -> GlyphBitmap {
        if let Some((cache_key, advance_px, _)) = self.shape_char(MISSING_PROBE) {
            return self.render(cache_key, advance_px);
        }

        // Shaping gave nothing back; rasterize glyph 0 directly and advance by its width.
        let (cache_key, _, _) = CacheKey::new(
            self.face_id,
            0,
            self.font_px as f32,
            (0.0, 0.0),
            self.weight,
            CacheKeyFlags::empty(),
        );
        let mut bitmap = self.render(cache_key, 0);
        bitmap.advance_px = bitmap.width() as i32;
        bitmap
    }

    fn mapped_chars(&mut self) -> Vec<char> {
        let Some(font) = self.font_system.get_font(self.face_id, self.weight) else {
            log::warn!("Face {:?} could not be opened, no characters listed", self.family);
            return Vec::new();
        };

        let mut chars = Vec::new();
        font.as_swash().charmap().enumerate(|code, glyph_id| {
            if glyph_id == 0 {
                return;
            }
            if let Some(ch) = char::from_u32(code) {
                chars.push(ch);
            }
        });
        chars.sort_unstable();
        chars.dedup();
        chars
    }
}
