//! Atlas image and summary output.

use std::path::Path;

use anyhow::Context;
use glyph_atlas::{GlyphAtlas, GlyphKey};
use image::{imageops, GrayImage, ImageFormat};

/// The atlas as a greyscale image, top row first.
///
/// The atlas stores its bottom row first, so the buffer is flipped on the way out.
pub fn atlas_image(atlas: &GlyphAtlas) -> anyhow::Result<GrayImage> {
    let side = atlas.side_length();
    let stored = GrayImage::from_raw(side, side, atlas.pixels().to_vec())
        .context("atlas pixel buffer does not match its side length")?;
    Ok(imageops::flip_vertical(&stored))
}

/// Write the atlas as a PNG, whatever the extension of `path`.
pub fn write_png(atlas: &GlyphAtlas, path: &Path) -> anyhow::Result<()> {
    atlas_image(atlas)?
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Log every glyph entry, sorted by key.
pub fn log_glyph_table(atlas: &GlyphAtlas) {
    let mut entries: Vec<_> = atlas.iter().collect();
    entries.sort_by_key(|(key, _)| **key);

    for (key, info) in entries {
        let label = match key {
            GlyphKey::Char(code) => match char::from_u32(*code) {
                Some(ch) if !ch.is_control() => format!("{:?}", ch),
                _ => format!("U+{:04X}", code),
            },
            GlyphKey::Fallback => "<fallback>".to_string(),
            GlyphKey::SolidFill => "<solid>".to_string(),
        };
        log::debug!(
            "  {:>10} rect=({}, {})..({}, {}) size={:.3}x{:.3} advance={:.3}",
            label,
            info.rect.x0,
            info.rect.y0,
            info.rect.x1,
            info.rect.y1,
            info.size[0],
            info.size[1],
            info.advance
        );
    }
}
