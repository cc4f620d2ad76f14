use glyph_atlas::AtlasError;

/// Errors that can occur while turning a font into an atlas.
#[derive(Debug, Clone, PartialEq)]
pub enum TextError {
    /// Packing the rasterized glyphs failed.
    Atlas(AtlasError),

    /// Font loading failed.
    FontLoadError(String),

    /// Font file not found.
    FontFileNotFound(std::path::PathBuf),

    /// Generic IO error.
    IoError(String),
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextError::Atlas(err) => write!(f, "Atlas packing failed: {}", err),
            TextError::FontLoadError(msg) => write!(f, "Failed to load font: {}", msg),
            TextError::FontFileNotFound(path) => {
                write!(f, "Font file not found: {}", path.display())
            }
            TextError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for TextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextError::Atlas(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AtlasError> for TextError {
    fn from(err: AtlasError) -> Self {
        TextError::Atlas(err)
    }
}

impl From<std::io::Error> for TextError {
    fn from(err: std::io::Error) -> Self {
        TextError::IoError(err.to_string())
    }
}

/// Result type for text operations.
pub type TextResult<T> = Result<T, TextError>;
