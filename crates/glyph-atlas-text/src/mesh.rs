//! CPU-side quad meshes for strings.
//!
//! One quad per character, laid out left to right on a baseline at `y = 0`, in font
//! units (1.0 = nominal font size). Positions use y up, matching the atlas's
//! bottom-left texture origin, so UVs map straight from `GlyphInfo::rect`.
//!
//! Each mesh also carries a background quad covering the text's bounds plus
//! [`BACKGROUND_MARGIN`], textured with the atlas's solid-fill glyph.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use glyph_atlas::UvRect;

use crate::font::FontAtlas;

/// Every text quad faces the viewer.
const TEXT_NORMAL: [f32; 3] = [0.0, 0.0, -1.0];

/// Two triangles per quad: bottom-left, bottom-right, top-left / bottom-right, top-right, top-left.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 1, 3, 2];

/// Padding around the text covered by the background quad, in font units.
pub const BACKGROUND_MARGIN: f32 = 0.2;

/// Background color of meshes built with [`TextMesh::new`].
pub const CLEAR_BACKGROUND: [f32; 4] = [0.0; 4];

/// Vertex format for text glyph quads.
///
/// Color is linear RGBA in `[0, 1]`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl TextVertex {
    pub const fn new(pos: [f32; 3], uv: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            pos,
            normal: TEXT_NORMAL,
            uv,
            color,
        }
    }
}

/// Axis-aligned box around a mesh.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Quads for one string in one font.
#[derive(Clone, Debug, Default)]
pub struct TextMesh {
    text: String,
    color: [f32; 4],
    vertices: Vec<TextVertex>,
    indices: Vec<u32>,
    /// Pen x where each glyph starts; lets `set_text` resume mid-string.
    pens: Vec<f32>,
    /// Pen x after the last glyph.
    width: f32,
    background: [f32; 4],
    /// Always four vertices once built, in the same corner order as glyph quads.
    background_vertices: Vec<TextVertex>,
}

impl TextMesh {
    pub fn new(font: &FontAtlas, text: &str, color: [f32; 4]) -> Self {
        Self::with_background(font, text, color, CLEAR_BACKGROUND)
    }

    pub fn with_background(
        font: &FontAtlas,
        text: &str,
        color: [f32; 4],
        background: [f32; 4],
    ) -> Self {
        let mut mesh = Self {
            color,
            background,
            ..Default::default()
        };
        mesh.set_text(font, text);
        mesh
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn vertices(&self) -> &[TextVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn background_color(&self) -> [f32; 4] {
        self.background
    }

    pub fn background_vertices(&self) -> &[TextVertex] {
        &self.background_vertices
    }

    pub fn background_indices(&self) -> &'static [u32] {
        &QUAD_INDICES
    }

    /// Raw background vertex bytes for a buffer upload.
    pub fn background_vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.background_vertices)
    }

    /// Total advance of the string, in font units.
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Raw vertex bytes for a buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for a buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Replace the text. Quads for the common prefix with the old text are kept.
    ///
    /// `font` must be the font the mesh was built with.
    ///
    /// Returns the number of glyphs that were rebuilt.
    pub fn set_text(&mut self, font: &FontAtlas, text: &str) -> usize {
        let keep = self
            .text
            .chars()
            .zip(text.chars())
            .take_while(|(old, new)| old == new)
            .count();

        self.vertices.truncate(keep * 4);
        self.indices.truncate(keep * 6);
        self.pens.truncate(keep);

        // Resume after the last kept glyph.
        let mut pen = match (keep.checked_sub(1), self.pens.last()) {
            (Some(last), Some(&last_pen)) => text
                .chars()
                .nth(last)
                .map_or(0.0, |ch| last_pen + font.glyph(ch).advance),
            _ => 0.0,
        };

        let mut rebuilt = 0;
        for ch in text.chars().skip(keep) {
            self.push_quad(font, ch, pen);
            pen += font.glyph(ch).advance;
            rebuilt += 1;
        }

        self.width = pen;
        self.text.clear();
        self.text.push_str(text);
        self.rebuild_background(font);

        rebuilt
    }

    /// Recolor every vertex.
    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
        for vertex in &mut self.vertices {
            vertex.color = color;
        }
    }

    pub fn set_background_color(&mut self, background: [f32; 4]) {
        self.background = background;
        for vertex in &mut self.background_vertices {
            vertex.color = background;
        }
    }

    /// Bounding box of all vertex positions, grown by `margin` on x and y.
    ///
    /// An empty mesh has a zero-sized box at the origin.
    pub fn bounds(&self, margin: f32) -> Bounds {
        let Some(first) = self.vertices.first() else {
            return Bounds {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            };
        };

        let start = Vec3::from(first.pos);
        let (min, max) = self
            .vertices
            .iter()
            .map(|v| Vec3::from(v.pos))
            .fold((start, start), |(min, max), p| (min.min(p), max.max(p)));

        let grow = Vec3::new(margin, margin, 0.0);
        Bounds {
            min: min - grow,
            max: max + grow,
        }
    }

    /// Without a solid-fill glyph in the atlas the background UVs are all zero.
    fn rebuild_background(&mut self, font: &FontAtlas) {
        let Bounds { min, max } = self.bounds(BACKGROUND_MARGIN);
        let uv = font
            .solid_fill()
            .map(|solid| solid.uv(font.side_length()))
            .unwrap_or(UvRect::new([0.0; 2], [0.0; 2]));

        let color = self.background;
        self.background_vertices.clear();
        self.background_vertices.extend_from_slice(&[
            TextVertex::new([min.x, min.y, 0.0], [uv.min[0], uv.min[1]], color),
            TextVertex::new([max.x, min.y, 0.0], [uv.max[0], uv.min[1]], color),
            TextVertex::new([min.x, max.y, 0.0], [uv.min[0], uv.max[1]], color),
            TextVertex::new([max.x, max.y, 0.0], [uv.max[0], uv.max[1]], color),
        ]);
    }

    fn push_quad(&mut self, font: &FontAtlas, ch: char, pen: f32) {
        let info = font.glyph(ch);
        let uv = info.uv(font.side_length());

        let x = pen + info.bearing[0];
        let y = info.bearing[1] - info.size[1];
        let [w, h] = info.size;

        let base = self.vertices.len() as u32;
        let color = self.color;
        self.vertices.extend_from_slice(&[
            TextVertex::new([x, y, 0.0], [uv.min[0], uv.min[1]], color),
            TextVertex::new([x + w, y, 0.0], [uv.max[0], uv.min[1]], color),
            TextVertex::new([x, y + h, 0.0], [uv.min[0], uv.max[1]], color),
            TextVertex::new([x + w, y + h, 0.0], [uv.max[0], uv.max[1]], color),
        ]);
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        self.pens.push(pen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Charset;
    use crate::test_support::MockRasterizer;
    use glyph_atlas::PackerConfig;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn font() -> FontAtlas {
        let mut rasterizer = MockRasterizer::new();
        FontAtlas::build(&mut rasterizer, &Charset::Ascii, &PackerConfig::default()).unwrap()
    }

    #[test]
    fn test_quad_per_char() {
        let font = font();
        let mesh = TextMesh::new(&font, "ab c", WHITE);

        assert_eq!(mesh.vertices().len(), 16);
        assert_eq!(mesh.indices().len(), 24);
        assert_eq!(&mesh.indices()[6..12], &[4, 5, 6, 5, 7, 6]);
        assert!(mesh.vertices().iter().all(|v| v.normal == [0.0, 0.0, -1.0]));
    }

    #[test]
    fn test_quad_geometry_and_uvs() {
        let font = font();
        let mesh = TextMesh::new(&font, "ab", WHITE);
        let a = font.glyph('a');
        let b_quad = &mesh.vertices()[4..8];

        // Second glyph starts one advance of 'a' to the right, shifted by its bearing.
        let x = a.advance + font.glyph('b').bearing[0];
        assert_eq!(b_quad[0].pos, [x, 0.0, 0.0]);
        assert_eq!(b_quad[3].pos[1], 0.8);

        let uv = font.glyph('b').uv(font.side_length());
        assert_eq!(b_quad[0].uv, uv.min);
        assert_eq!(b_quad[3].uv, uv.max);
    }

    #[test]
    fn test_width_matches_font_measurement() {
        let font = font();
        let mesh = TextMesh::new(&font, "hi there", WHITE);
        assert_eq!(mesh.width(), font.text_width("hi there"));
    }

    #[test]
    fn test_set_text_reuses_prefix() {
        let font = font();
        let mut mesh = TextMesh::new(&font, "hello", WHITE);
        let kept = mesh.vertices()[..12].to_vec();

        let rebuilt = mesh.set_text(&font, "help me");
        assert_eq!(rebuilt, 4);
        assert_eq!(&mesh.vertices()[..12], kept.as_slice());

        let fresh = TextMesh::new(&font, "help me", WHITE);
        assert_eq!(mesh.vertices(), fresh.vertices());
        assert_eq!(mesh.indices(), fresh.indices());
        assert_eq!(mesh.width(), fresh.width());
        assert_eq!(mesh.text(), "help me");
    }

    #[test]
    fn test_set_text_shorter_and_empty() {
        let font = font();
        let mut mesh = TextMesh::new(&font, "abc", WHITE);

        assert_eq!(mesh.set_text(&font, "ab"), 0);
        assert_eq!(mesh.vertices().len(), 8);

        assert_eq!(mesh.set_text(&font, ""), 0);
        assert!(mesh.is_empty());
        assert_eq!(mesh.width(), 0.0);
    }

    #[test]
    fn test_set_color() {
        let font = font();
        let mut mesh = TextMesh::new(&font, "ab", WHITE);
        mesh.set_color([1.0, 0.0, 0.0, 1.0]);
        assert!(mesh.vertices().iter().all(|v| v.color == [1.0, 0.0, 0.0, 1.0]));

        mesh.set_text(&font, "abc");
        assert_eq!(mesh.vertices()[8].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_bounds_with_margin() {
        let font = font();
        let mesh = TextMesh::new(&font, "ab", WHITE);
        let bounds = mesh.bounds(0.2);
        let tight = mesh.bounds(0.0);

        assert_eq!(tight.min, Vec3::new(0.1, 0.0, 0.0));
        assert!((bounds.min.x - (tight.min.x - 0.2)).abs() < 1e-6);
        assert!((bounds.max.y - (tight.max.y + 0.2)).abs() < 1e-6);
        assert_eq!(bounds.min.z, 0.0);
        assert_eq!(bounds.max.z, 0.0);
        assert!(bounds.size().x > tight.size().x);
    }

    #[test]
    fn test_empty_mesh_bounds() {
        let font = font();
        let mesh = TextMesh::new(&font, "", WHITE);
        let bounds = mesh.bounds(1.0);
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::ZERO);
    }

    #[test]
    fn test_background_covers_padded_bounds() {
        let font = font();
        let gray = [0.1, 0.1, 0.1, 0.8];
        let mesh = TextMesh::with_background(&font, "ab", WHITE, gray);
        let bounds = mesh.bounds(BACKGROUND_MARGIN);
        let quad = mesh.background_vertices();

        assert_eq!(quad.len(), 4);
        assert_eq!(quad[0].pos, [bounds.min.x, bounds.min.y, 0.0]);
        assert_eq!(quad[1].pos, [bounds.max.x, bounds.min.y, 0.0]);
        assert_eq!(quad[2].pos, [bounds.min.x, bounds.max.y, 0.0]);
        assert_eq!(quad[3].pos, [bounds.max.x, bounds.max.y, 0.0]);
        assert!(quad.iter().all(|v| v.color == gray));
        assert_eq!(mesh.background_indices(), &[0, 1, 2, 1, 3, 2]);
        assert_eq!(mesh.background_vertex_bytes().len(), 4 * std::mem::size_of::<TextVertex>());
    }

    #[test]
    fn test_background_samples_solid_fill() {
        let font = font();
        let mesh = TextMesh::new(&font, "a", WHITE);
        let quad = mesh.background_vertices();
        let uv = font.solid_fill().unwrap().uv(font.side_length());

        assert_eq!(quad[0].uv, uv.min);
        assert_eq!(quad[3].uv, uv.max);
        assert_eq!(mesh.background_color(), CLEAR_BACKGROUND);
    }

    #[test]
    fn test_background_follows_text_and_color() {
        let font = font();
        let mut mesh = TextMesh::new(&font, "a", WHITE);
        let short = mesh.background_vertices()[3].pos;

        mesh.set_text(&font, "abc");
        let long = mesh.background_vertices()[3].pos;
        assert!(long[0] > short[0]);
        assert_eq!(long[0], mesh.bounds(BACKGROUND_MARGIN).max.x);

        mesh.set_background_color([0.0, 0.0, 1.0, 1.0]);
        assert!(mesh
            .background_vertices()
            .iter()
            .all(|v| v.color == [0.0, 0.0, 1.0, 1.0]));
        // Glyph quads keep their own color.
        assert!(mesh.vertices().iter().all(|v| v.color == WHITE));
    }

    #[test]
    fn test_background_without_solid_fill() {
        let mut rasterizer = MockRasterizer::new();
        let font = FontAtlas::build(
            &mut rasterizer,
            &Charset::Ascii,
            &PackerConfig::default().with_solid_fill(false),
        )
        .unwrap();
        let mesh = TextMesh::new(&font, "a", WHITE);
        assert!(mesh.background_vertices().iter().all(|v| v.uv == [0.0, 0.0]));
    }

    #[test]
    fn test_byte_views() {
        let font = font();
        let mesh = TextMesh::new(&font, "a", WHITE);
        assert_eq!(
            mesh.vertex_bytes().len(),
            4 * std::mem::size_of::<TextVertex>()
        );
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }
}
