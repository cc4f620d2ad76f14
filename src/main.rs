//! fontpack
//!
//! Rasterizes a font face, packs it into a single square atlas and writes the atlas
//! as a greyscale PNG.

mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glyph_atlas::{PackerConfig, DEFAULT_MARGIN_PX, DEFAULT_PACKING_PRECISION};
use glyph_atlas_text::cosmic::CosmicRasterizer;
use glyph_atlas_text::{Charset, FontAtlas, TextMesh};

#[derive(Parser, Debug)]
#[command(version, about = "Pack a font into a single-channel glyph atlas")]
struct Args {
    /// TrueType/OpenType font file
    font: PathBuf,

    /// Nominal pixel size to rasterize at
    #[arg(short, long, default_value_t = 32)]
    size: u32,

    /// Padding around every glyph, in pixels
    #[arg(short, long, default_value_t = DEFAULT_MARGIN_PX)]
    margin: u32,

    /// Area kept per shrink step; values outside (0, 1) are clamped
    #[arg(short, long, default_value_t = DEFAULT_PACKING_PRECISION)]
    precision: f32,

    /// Pack exactly these characters instead of printable ASCII
    #[arg(long, conflicts_with = "all")]
    chars: Option<String>,

    /// Pack every character the face maps
    #[arg(long)]
    all: bool,

    /// Do not pack the solid-fill block
    #[arg(long)]
    no_solid_fill: bool,

    /// Stop after this many successful packings
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Output PNG path
    #[arg(short, long, default_value = "atlas.png")]
    output: PathBuf,

    /// Measure this string with the packed font
    #[arg(long)]
    preview: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = PackerConfig::default()
        .with_margin(args.margin)
        .with_packing_precision(args.precision)
        .with_solid_fill(!args.no_solid_fill)
        .with_max_iterations(args.max_iterations);

    let charset = match &args.chars {
        Some(chars) => Charset::from(chars.as_str()),
        None if args.all => Charset::All,
        None => Charset::Ascii,
    };

    let mut rasterizer = CosmicRasterizer::from_file(&args.font, args.size)
        .with_context(|| format!("loading {}", args.font.display()))?;
    let font = FontAtlas::build(&mut rasterizer, &charset, &config)?;

    let atlas = font.atlas();
    let stats = atlas.stats();
    log::info!(
        "✓ {}x{} atlas, {} entries, {} candidates tried (started at {}, precision {:.3})",
        atlas.side_length(),
        atlas.side_length(),
        atlas.len(),
        stats.attempts,
        stats.start_side,
        config.effective_precision()
    );
    output::log_glyph_table(atlas);

    if let Some(text) = &args.preview {
        let mesh = TextMesh::new(&font, text, [1.0, 1.0, 1.0, 1.0]);
        let bounds = mesh.bounds(0.0);
        log::info!(
            "{:?}: width {:.3} em, {} vertices, bounds {:?}..{:?}",
            text,
            mesh.width(),
            mesh.vertices().len(),
            bounds.min,
            bounds.max
        );
    }

    output::write_png(atlas, &args.output)?;
    log::info!("✓ Wrote {}", args.output.display());

    Ok(())
}
