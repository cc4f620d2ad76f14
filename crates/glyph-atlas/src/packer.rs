//! Shrinking-square shelf packer.
//!
//! Glyphs are placed left-to-right in horizontal shelves inside a square of side `S`.
//! The search starts from a side that is guaranteed to fit everything and keeps
//! shrinking the square's *area* by `packing_precision` until a pass fails. The last
//! successful pass wins.
//!
//! Every glyph reserves a slot of `(w + 2 * margin) x (h + 2 * margin)`; the glyph
//! itself sits `margin` pixels inside its slot. Slots never overlap.

use crate::error::{AtlasError, PackResult};
use crate::glyph::AtlasPx;

/// Largest side a finished atlas may have; sides are stored as `u32`.
pub const MAX_ATLAS_SIDE: u64 = u32::MAX as u64;

/// Counters describing one shrink search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PackStats {
    /// First candidate side length.
    pub start_side: u64,
    /// Candidate side lengths tried, including the final failing one.
    pub attempts: u32,
    /// Candidates that packed every glyph.
    pub successes: u32,
}

/// Result of [`shrink_search`].
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub side_length: u32,
    /// Glyph top-left positions, aligned with the packer's size list.
    pub placements: Vec<AtlasPx>,
    pub stats: PackStats,
}

/// Next candidate of the shrink schedule: `floor(sqrt(precision) * side)`.
///
/// Always strictly below `side` so the search terminates even when rounding would
/// otherwise stall it.
pub fn shrink_schedule_next(side: u64, precision: f32) -> u64 {
    let next = (side as f64 * (precision as f64).sqrt()).floor() as u64;
    next.min(side.saturating_sub(1))
}

/// Greedy shelf placer over a fixed, already-ordered list of glyph sizes.
#[derive(Clone, Debug)]
pub struct ShelfPacker {
    sizes: Vec<[u32; 2]>,
    margin_px: u32,
}

impl ShelfPacker {
    /// `sizes` must already be in packing order (largest area first).
    pub fn new(sizes: Vec<[u32; 2]>, margin_px: u32) -> Self {
        Self { sizes, margin_px }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// A side length the greedy pass can never fail at.
    ///
    /// The first term is the classic generous bound (sum of heights times count times
    /// the doubled margin), capped at [`MAX_ATLAS_SIDE`]. The other two make it
    /// provably sufficient: with every slot narrower than the side, shelves never
    /// overflow horizontally, and the shelves together are never taller than all
    /// slots stacked. Only those two can push the start past [`MAX_ATLAS_SIDE`].
    pub fn start_side(&self) -> u64 {
        let slot_pad = 2 * self.margin_px as u64;
        let count = self.sizes.len() as u64;

        let height_sum: u64 = self.sizes.iter().map(|s| s[1] as u64).sum();
        let generous = height_sum
            .saturating_mul(count)
            .saturating_mul(slot_pad.max(1));

        let stacked = height_sum + count * slot_pad + 1;
        let widest = self
            .sizes
            .iter()
            .map(|s| s[0] as u64 + slot_pad + 1)
            .max()
            .unwrap_or(1);

        generous.min(MAX_ATLAS_SIDE).max(stacked).max(widest)
    }

    /// One greedy pass at side `side`. Returns glyph top-left positions on success.
    pub fn try_pack(&self, side: u64) -> Option<Vec<AtlasPx>> {
        let margin = self.margin_px as u64;
        let slot_pad = 2 * margin;

        let mut placements = Vec::with_capacity(self.sizes.len());

        let mut shelf_x = 0u64;
        let mut shelf_y = 0u64;
        let mut shelf_height = 0u64;

        for &[w, h] in &self.sizes {
            let slot_w = w as u64 + slot_pad;
            let slot_h = h as u64 + slot_pad;

            // Too wide even for an empty shelf.
            if slot_w >= side {
                return None;
            }

            // Horizontal overflow: start a new shelf below the tallest slot so far.
            if shelf_x + slot_w >= side {
                shelf_y += shelf_height;
                shelf_x = 0;
                shelf_height = 0;
            }

            // Vertical overflow: not even a fresh shelf fits.
            if shelf_y + slot_h >= side {
                return None;
            }

            let x = u32::try_from(shelf_x + margin).ok()?;
            let y = u32::try_from(shelf_y + margin).ok()?;
            placements.push(AtlasPx::new(x, y));

            shelf_x += slot_w;
            shelf_height = shelf_height.max(slot_h);
        }

        Some(placements)
    }
}

/// Shrink the candidate square until a pass fails and keep the last success.
///
/// `precision` must already be clamped into (0, 1). `max_successes` caps the number
/// of successful passes; the search then stops early with the smallest side found.
/// Candidates above [`MAX_ATLAS_SIDE`] count as failed passes.
pub fn shrink_search(
    packer: &ShelfPacker,
    precision: f32,
    max_successes: Option<u32>,
) -> PackResult<SearchOutcome> {
    let start_side = packer.start_side();
    let mut stats = PackStats {
        start_side,
        ..Default::default()
    };

    let mut side = start_side;
    let mut best: Option<(u32, Vec<AtlasPx>)> = None;

    loop {
        stats.attempts += 1;

        let packed = u32::try_from(side)
            .ok()
            .and_then(|side_px| packer.try_pack(side).map(|placements| (side_px, placements)));
        let Some((side_px, placements)) = packed else {
            log::trace!("side {} failed", side);
            break;
        };

        log::trace!("side {} packed", side);
        stats.successes += 1;
        best = Some((side_px, placements));

        if max_successes.is_some_and(|max| stats.successes >= max.max(1)) {
            break;
        }

        let next = shrink_schedule_next(side, precision);
        if next == 0 {
            break;
        }
        side = next;
    }

    match best {
        Some((side_length, placements)) => Ok(SearchOutcome {
            side_length,
            placements,
            stats,
        }),
        None => Err(AtlasError::PackingImpossible {
            glyph_count: packer.len(),
            side_length: start_side,
        }),
    }
}
