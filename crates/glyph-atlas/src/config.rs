//! Packer parameters

/// Default padding around every glyph. Large enough that linear sampling never
/// picks up a neighbour's edge.
pub const DEFAULT_MARGIN_PX: u32 = 2;

/// Area kept per shrink step when the caller passes an out-of-range value <= 0.
pub const DEFAULT_PACKING_PRECISION: f32 = 0.75;

/// Upper clamp for precision values >= 1 (1.0 itself would never shrink).
pub const MAX_PACKING_PRECISION: f32 = 0.999;

pub const DEFAULT_FONT_PX: u32 = 32;

/// Parameters for a single atlas build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackerConfig {
    /// Padding in pixels reserved on every side of every glyph.
    pub margin_px: u32,

    /// Fraction of the atlas area kept per shrink step, in (0, 1).
    ///
    /// Higher values shrink in smaller steps: denser atlases, more iterations.
    pub packing_precision: f32,

    /// Nominal pixel size the glyphs were rasterized at. Glyph metrics are
    /// divided by this to get mesh-space sizes.
    pub font_px: u32,

    /// Also pack a `font_px` square block of full coverage.
    pub solid_fill: bool,

    /// Stop shrinking after this many successful packings.
    pub max_iterations: Option<u32>,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            margin_px: DEFAULT_MARGIN_PX,
            packing_precision: DEFAULT_PACKING_PRECISION,
            font_px: DEFAULT_FONT_PX,
            solid_fill: true,
            max_iterations: None,
        }
    }
}

impl PackerConfig {
    pub fn with_margin(mut self, margin_px: u32) -> Self {
        self.margin_px = margin_px;
        self
    }

    pub fn with_packing_precision(mut self, packing_precision: f32) -> Self {
        self.packing_precision = packing_precision;
        self
    }

    pub fn with_font_px(mut self, font_px: u32) -> Self {
        self.font_px = font_px;
        self
    }

    pub fn with_solid_fill(mut self, solid_fill: bool) -> Self {
        self.solid_fill = solid_fill;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: Option<u32>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// `packing_precision` clamped into (0, 1).
    pub fn effective_precision(&self) -> f32 {
        let p = self.packing_precision;
        if p.is_nan() || p <= 0.0 {
            DEFAULT_PACKING_PRECISION
        } else if p >= 1.0 {
            MAX_PACKING_PRECISION
        } else {
            p
        }
    }
}
