//! Font front-end for `glyph-atlas`.
//!
//! # Design goals
//! - **Rasterizer-agnostic**: the packer only needs [`GlyphRasterizer`]; cosmic-text is one
//!   implementation behind the `cosmic` feature.
//! - **CPU only**: produces an atlas pixel buffer and quad meshes; no GPU types.
//!
//! Typical flow:
//! 1. Create a rasterizer for a face at a nominal pixel size.
//! 2. Call [`FontAtlas::build`] with a [`Charset`] and a `PackerConfig`.
//! 3. Upload `font.atlas().pixels()` as a single-channel texture.
//! 4. Build [`TextMesh`]es for strings and upload their vertex/index bytes.

#![deny(warnings)]

mod error;
mod font;
mod mesh;
mod rasterizer;

#[cfg(feature = "cosmic")]
pub mod cosmic;

#[cfg(test)]
mod test_support;

pub use error::*;
pub use font::*;
pub use mesh::*;
pub use rasterizer::*;
