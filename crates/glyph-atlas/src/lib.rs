//! # glyph-atlas
//!
//! Packs rasterized glyph bitmaps into a single square, single-channel atlas.
//!
//! This crate knows nothing about fonts or GPUs. It takes CPU-side coverage bitmaps,
//! finds a small square that holds all of them with a shrinking-square shelf packer,
//! composites them into one buffer (bottom row first) and returns per-glyph texture
//! rectangles plus metrics normalised by the nominal font size.
//!
//! Rasterization lives in `glyph-atlas-text`; texture upload is left to the renderer.

#![deny(warnings)]

mod atlas;
mod config;
mod error;
mod glyph;
pub mod packer;

pub use atlas::*;
pub use config::*;
pub use error::*;
pub use glyph::*;
pub use packer::{PackStats, ShelfPacker};
