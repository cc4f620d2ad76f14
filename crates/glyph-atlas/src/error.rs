use crate::glyph::GlyphKey;

/// Errors that can occur while building a glyph atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// The starting side length failed, usually because it exceeds
    /// [`MAX_ATLAS_SIDE`](crate::packer::MAX_ATLAS_SIDE). `side_length` is that failed side.
    PackingImpossible { glyph_count: usize, side_length: u64 },

    /// A bitmap whose pixel buffer does not match its declared size.
    InvalidGlyphDimensions {
        key: GlyphKey,
        width: u32,
        height: u32,
        pixel_len: usize,
    },

    /// Two records share the same character code.
    DuplicateCharCode(u32),

    /// The nominal pixel size used for normalisation is zero.
    InvalidFontSize(u32),
}

impl std::fmt::Display for AtlasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtlasError::PackingImpossible {
                glyph_count,
                side_length,
            } => write!(
                f,
                "Cannot pack {} glyphs: the starting {}x{} atlas failed (largest side is {})",
                glyph_count,
                side_length,
                side_length,
                crate::packer::MAX_ATLAS_SIDE
            ),
            AtlasError::InvalidGlyphDimensions {
                key,
                width,
                height,
                pixel_len,
            } => write!(
                f,
                "Invalid glyph dimensions for {:?}: {}x{} but {} pixels supplied",
                key, width, height, pixel_len
            ),
            AtlasError::DuplicateCharCode(code) => {
                write!(f, "Duplicate character code U+{:04X}", code)
            }
            AtlasError::InvalidFontSize(px) => write!(f, "Invalid nominal font size: {}px", px),
        }
    }
}

impl std::error::Error for AtlasError {}

/// Result type for atlas operations.
pub type PackResult<T> = Result<T, AtlasError>;
