//! Atlas assembly: validation, ordering, packing, compositing and glyph-info emission.
//!
//! The packer works in a top-left-origin frame (y down). The finished pixel buffer is
//! stored bottom row first, which is what a texture upload with row 0 at `v = 0`
//! expects. Every glyph bitmap is flipped vertically while it is copied in.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::config::PackerConfig;
use crate::error::{AtlasError, PackResult};
use crate::glyph::{AtlasPx, AtlasRectPx, GlyphBitmap, GlyphKey, GlyphRecord};
use crate::packer::{shrink_search, PackStats, ShelfPacker};

/// Glyph rectangle in texture pixel space (bottom-left origin, half-open).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TexRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl TexRect {
    #[inline]
    pub const fn width(self) -> u32 {
        self.x1 - self.x0
    }

    #[inline]
    pub const fn height(self) -> u32 {
        self.y1 - self.y0
    }
}

/// UV rectangle (normalized texture coords).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvRect {
    pub const fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }
}

/// Everything a renderer needs to draw one glyph from the atlas.
///
/// Metrics are in font units: pixel values divided by the nominal font size, so a
/// unit quad scaled by `size` has the right proportions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphInfo {
    pub rect: TexRect,
    /// (width, height)
    pub size: [f32; 2],
    pub advance: f32,
    /// (left, top), top measured upward from the baseline.
    pub bearing: [f32; 2],
}

impl GlyphInfo {
    fn new(rect: TexRect, bitmap: &GlyphBitmap, font_px: u32) -> Self {
        let px = font_px as f32;
        Self {
            rect,
            size: [bitmap.width() as f32 / px, bitmap.height() as f32 / px],
            advance: bitmap.advance_px as f32 / px,
            bearing: [
                bitmap.bearing_px[0] as f32 / px,
                bitmap.bearing_px[1] as f32 / px,
            ],
        }
    }

    /// Normalized texture coordinates of the glyph's rectangle.
    pub fn uv(&self, side_length: u32) -> UvRect {
        let side = side_length as f32;
        UvRect::new(
            [self.rect.x0 as f32 / side, self.rect.y0 as f32 / side],
            [self.rect.x1 as f32 / side, self.rect.y1 as f32 / side],
        )
    }
}

/// A finished single-channel glyph atlas.
#[derive(Clone, Debug)]
pub struct GlyphAtlas {
    side_length: u32,
    margin_px: u32,
    font_px: u32,
    /// `side_length²` coverage bytes, bottom row first.
    pixels: Vec<u8>,
    glyphs: HashMap<GlyphKey, GlyphInfo>,
    fallback: GlyphInfo,
    stats: PackStats,
}

impl GlyphAtlas {
    #[inline]
    pub const fn side_length(&self) -> u32 {
        self.side_length
    }

    #[inline]
    pub const fn margin_px(&self) -> u32 {
        self.margin_px
    }

    #[inline]
    pub const fn font_px(&self) -> u32 {
        self.font_px
    }

    #[inline]
    pub const fn stats(&self) -> PackStats {
        self.stats
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Number of entries, including the fallback and solid-fill glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Never true for a built atlas; the fallback glyph is always present.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, key: GlyphKey) -> Option<&GlyphInfo> {
        self.glyphs.get(&key)
    }

    pub fn contains(&self, key: GlyphKey) -> bool {
        self.glyphs.contains_key(&key)
    }

    /// Entry for `char_code`, or the fallback glyph when there is none.
    pub fn lookup(&self, char_code: u32) -> &GlyphInfo {
        self.glyphs
            .get(&GlyphKey::Char(char_code))
            .unwrap_or(&self.fallback)
    }

    /// Entry for `ch`, or the fallback glyph when there is none.
    #[inline]
    pub fn glyph(&self, ch: char) -> &GlyphInfo {
        self.lookup(ch as u32)
    }

    #[inline]
    pub fn fallback(&self) -> &GlyphInfo {
        &self.fallback
    }

    pub fn solid_fill(&self) -> Option<&GlyphInfo> {
        self.glyphs.get(&GlyphKey::SolidFill)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GlyphKey, &GlyphInfo)> {
        self.glyphs.iter()
    }

    /// Rectangle of `key` back in the packer's top-left-origin frame.
    pub fn placement(&self, key: GlyphKey) -> Option<AtlasRectPx> {
        self.glyphs.get(&key).map(|info| {
            let rect = info.rect;
            let top = self.side_length - 1 - rect.y1;
            AtlasRectPx::new(AtlasPx::new(rect.x0, top), [rect.width(), rect.height()])
        })
    }

    /// Row `y` of the pixel buffer (row 0 is the bottom of the texture).
    pub fn row(&self, y: u32) -> &[u8] {
        let side = self.side_length as usize;
        let start = y as usize * side;
        &self.pixels[start..start + side]
    }

    /// Expand coverage into white RGBA8 with coverage as alpha, same row order.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&coverage| [0xff, 0xff, 0xff, coverage])
            .collect()
    }
}

/// Build an atlas from rasterized glyphs.
///
/// `fallback` is always packed and is returned by lookups for characters that have no
/// entry. When `config.solid_fill` is set, a fully covered `font_px` square is packed
/// as well. Glyph bitmaps are consumed.
pub fn pack(
    glyphs: Vec<GlyphRecord>,
    fallback: GlyphBitmap,
    config: &PackerConfig,
) -> PackResult<GlyphAtlas> {
    if config.font_px == 0 {
        return Err(AtlasError::InvalidFontSize(config.font_px));
    }

    let mut entries: Vec<(GlyphKey, GlyphBitmap)> = Vec::with_capacity(glyphs.len() + 2);
    let mut seen = HashSet::with_capacity(glyphs.len());
    for record in glyphs {
        if !seen.insert(record.char_code) {
            return Err(AtlasError::DuplicateCharCode(record.char_code));
        }
        entries.push((GlyphKey::Char(record.char_code), record.bitmap));
    }
    entries.push((GlyphKey::Fallback, fallback));
    if config.solid_fill {
        entries.push((GlyphKey::SolidFill, GlyphBitmap::solid(config.font_px)));
    }

    if let Some((key, bitmap)) = entries.iter().find(|(_, b)| !b.has_consistent_size()) {
        return Err(AtlasError::InvalidGlyphDimensions {
            key: *key,
            width: bitmap.width(),
            height: bitmap.height(),
            pixel_len: bitmap.pixels.len(),
        });
    }

    // Stable: equal areas keep their input order.
    entries.sort_by_key(|(_, bitmap)| Reverse(bitmap.area()));

    let packer = ShelfPacker::new(
        entries.iter().map(|(_, bitmap)| bitmap.size_px).collect(),
        config.margin_px,
    );
    let outcome = shrink_search(&packer, config.effective_precision(), config.max_iterations)?;

    let side_length = outcome.side_length;

    log::debug!(
        "packed {} glyphs into {}x{} ({} candidates, started at {})",
        entries.len(),
        side_length,
        side_length,
        outcome.stats.attempts,
        outcome.stats.start_side
    );

    let side = side_length as usize;
    let mut pixels = vec![0u8; side * side];
    let mut infos = HashMap::with_capacity(entries.len());

    for ((key, bitmap), origin) in entries.into_iter().zip(outcome.placements) {
        let rect = tex_rect(side_length, origin, &bitmap);
        blit_flipped(&mut pixels, side, rect, &bitmap);
        infos.insert(key, GlyphInfo::new(rect, &bitmap, config.font_px));
    }

    let fallback = infos[&GlyphKey::Fallback];

    Ok(GlyphAtlas {
        side_length,
        margin_px: config.margin_px,
        font_px: config.font_px,
        pixels,
        glyphs: infos,
        fallback,
        stats: outcome.stats,
    })
}

/// Convert a top-left-origin placement into the bottom-left-origin texture rect.
fn tex_rect(side_length: u32, origin: AtlasPx, bitmap: &GlyphBitmap) -> TexRect {
    let y1 = side_length - 1 - origin.y;
    TexRect {
        x0: origin.x,
        y0: y1 - bitmap.height(),
        x1: origin.x + bitmap.width(),
        y1,
    }
}

/// Copy `bitmap` (top row first) into `rect`, so that its top row lands on the
/// highest texture row of the rectangle.
fn blit_flipped(pixels: &mut [u8], side: usize, rect: TexRect, bitmap: &GlyphBitmap) {
    let w = bitmap.width() as usize;
    let h = bitmap.height() as usize;
    if w == 0 || h == 0 {
        return;
    }

    for (r, row) in bitmap.pixels.chunks_exact(w).enumerate() {
        let dst_row = rect.y0 as usize + (h - 1 - r);
        let start = dst_row * side + rect.x0 as usize;
        pixels[start..start + w].copy_from_slice(row);
    }
}
