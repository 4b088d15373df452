//! The raster surface bubbles are drawn onto.
//!
//! Shapes are described as closed [`Path`]s of lines and cubic curves and
//! filled with anti-aliased coverage from [ab_glyph_rasterizer], the same
//! rasterizer that draws glyphs. Everything is composited "source over" onto
//! an RGBA image that starts fully transparent.

use crate::colour::Colour;
use crate::font::{FontBook, FontSpec};
use crate::units::Px;
use ab_glyph::{Font as _, ScaleFont as _};
use ab_glyph_rasterizer::{point, Rasterizer};
use image::{Rgba, RgbaImage};

/// Control-point distance for approximating a quarter circle with a cubic
const KAPPA: f32 = 0.552_284_8;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Segment {
    Line([(f32, f32); 2]),
    Cubic([(f32, f32); 4]),
}

/// A set of closed outlines. Overlapping outlines wound in opposite directions
/// cancel out, which is how rings are made.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
    start: (f32, f32),
    cursor: (f32, f32),
}

impl Path {
    pub fn new() -> Path {
        Path::default()
    }

    /// Begin a new outline, closing the current one
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.close();
        self.start = (x, y);
        self.cursor = (x, y);
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.segments.push(Segment::Line([self.cursor, (x, y)]));
        self.cursor = (x, y);
        self
    }

    pub fn cubic_to(&mut self, c1: (f32, f32), c2: (f32, f32), x: f32, y: f32) -> &mut Self {
        self.segments
            .push(Segment::Cubic([self.cursor, c1, c2, (x, y)]));
        self.cursor = (x, y);
        self
    }

    /// Close the current outline with a straight line back to its start
    pub fn close(&mut self) -> &mut Self {
        if self.cursor != self.start {
            let (x, y) = self.start;
            self.line_to(x, y);
        }
        self
    }

    /// A rectangle with circular corners. The radius is clamped to half of the
    /// smaller side.
    pub fn rounded_rect(x: Px, y: Px, w: Px, h: Px, radius: Px) -> Path {
        let (x, y, w, h) = (*x, *y, *w, *h);
        let r = radius.0.min(w / 2.0).min(h / 2.0).max(0.0);
        let k = r * (1.0 - KAPPA);

        let mut p = Path::new();
        p.move_to(x + r, y)
            .line_to(x + w - r, y)
            .cubic_to((x + w - k, y), (x + w, y + k), x + w, y + r)
            .line_to(x + w, y + h - r)
            .cubic_to((x + w, y + h - k), (x + w - k, y + h), x + w - r, y + h)
            .line_to(x + r, y + h)
            .cubic_to((x + k, y + h), (x, y + h - k), x, y + h - r)
            .line_to(x, y + r)
            .cubic_to((x, y + k), (x + k, y), x + r, y)
            .close();
        p
    }

    pub fn rect(x: Px, y: Px, w: Px, h: Px) -> Path {
        Path::rounded_rect(x, y, w, h, Px::ZERO)
    }

    pub fn triangle(a: (Px, Px), b: (Px, Px), c: (Px, Px)) -> Path {
        let mut p = Path::new();
        p.move_to(*a.0, *a.1)
            .line_to(*b.0, *b.1)
            .line_to(*c.0, *c.1)
            .close();
        p
    }

    pub fn circle(center: (Px, Px), radius: Px) -> Path {
        let mut p = Path::new();
        p.push_circle((*center.0, *center.1), *radius, false);
        p
    }

    /// The band between two concentric circles
    pub fn ring(center: (Px, Px), outer: Px, inner: Px) -> Path {
        let mut p = Path::new();
        p.push_circle((*center.0, *center.1), *outer, false);
        p.push_circle((*center.0, *center.1), *inner, true);
        p
    }

    fn push_circle(&mut self, (cx, cy): (f32, f32), r: f32, reversed: bool) {
        let k = r * KAPPA;
        self.move_to(cx + r, cy);
        if reversed {
            self.cubic_to((cx + r, cy - k), (cx + k, cy - r), cx, cy - r)
                .cubic_to((cx - k, cy - r), (cx - r, cy - k), cx - r, cy)
                .cubic_to((cx - r, cy + k), (cx - k, cy + r), cx, cy + r)
                .cubic_to((cx + k, cy + r), (cx + r, cy + k), cx + r, cy);
        } else {
            self.cubic_to((cx + r, cy + k), (cx + k, cy + r), cx, cy + r)
                .cubic_to((cx - k, cy + r), (cx - r, cy + k), cx - r, cy)
                .cubic_to((cx - r, cy - k), (cx - k, cy - r), cx, cy - r)
                .cubic_to((cx + k, cy - r), (cx + r, cy - k), cx + r, cy);
        }
        self.close();
    }

    /// Rasterize onto a `width` × `height` grid, calling `f(x, y, coverage)` for
    /// every pixel. Points outside the grid are clamped onto its edge.
    pub fn coverage<F: FnMut(u32, u32, f32)>(&self, width: u32, height: u32, f: F) {
        if width == 0 || height == 0 || self.segments.is_empty() {
            return;
        }

        let (w, h) = (width as f32, height as f32);
        let clamp = |(x, y): (f32, f32)| point(x.clamp(0.0, w), y.clamp(0.0, h));

        let mut rasterizer = Rasterizer::new(width as usize, height as usize);
        for segment in &self.segments {
            match *segment {
                Segment::Line([a, b]) => rasterizer.draw_line(clamp(a), clamp(b)),
                Segment::Cubic([a, b, c, d]) => {
                    rasterizer.draw_cubic(clamp(a), clamp(b), clamp(c), clamp(d))
                }
            }
        }
        rasterizer.for_each_pixel_2d(f);
    }
}

/// Porter-Duff "source over" on straight (non-premultiplied) alpha. An opaque
/// destination stays exactly opaque.
fn source_over(dst: Rgba<u8>, src: Colour) -> Rgba<u8> {
    let [dr, dg, db, da] = dst.0;
    let sa = src.a as f32 / 255.0;
    let da_f = da as f32 / 255.0;
    let out_a = sa + da_f * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| {
        let c = (s as f32 * sa + d as f32 * da_f * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    let a = if da == u8::MAX {
        u8::MAX
    } else {
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(src.r, dr), channel(src.g, dg), channel(src.b, db), a])
}

/// An RGBA surface to draw on
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// A fully transparent surface
    pub fn new(width: u32, height: u32) -> Canvas {
        Canvas {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Composite `colour` at `coverage` over one pixel. Pixels off the surface are ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, colour: Colour, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        if coverage <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        *dst = source_over(*dst, colour.with_coverage(coverage));
    }

    pub fn fill(&mut self, path: &Path, colour: Colour) {
        let (w, h) = (self.width(), self.height());
        path.coverage(w, h, |x, y, c| {
            self.blend_pixel(x as i64, y as i64, colour, c)
        });
    }

    /// Composite `source` with its top-left corner at `(left, top)`. When a mask is
    /// given, only pixels inside the mask are drawn, scaled by its coverage.
    pub fn draw_image(&mut self, source: &RgbaImage, left: i64, top: i64, mask: Option<&Path>) {
        let sample = |x: i64, y: i64| -> Option<Rgba<u8>> {
            let (sx, sy) = (x - left, y - top);
            if sx < 0 || sy < 0 || sx >= source.width() as i64 || sy >= source.height() as i64 {
                return None;
            }
            Some(*source.get_pixel(sx as u32, sy as u32))
        };

        let composite = |canvas: &mut Canvas, x: i64, y: i64, coverage: f32| {
            if let Some(px) = sample(x, y) {
                canvas.blend_pixel(x, y, Colour::from(px.0), coverage);
            }
        };

        match mask {
            Some(mask) => {
                let (w, h) = (self.width(), self.height());
                let mut covered = Vec::new();
                mask.coverage(w, h, |x, y, c| {
                    if c > 0.0 {
                        covered.push((x, y, c));
                    }
                });
                for (x, y, c) in covered {
                    composite(self, x as i64, y as i64, c);
                }
            }
            None => {
                for sy in 0..source.height() as i64 {
                    for sx in 0..source.width() as i64 {
                        composite(self, left + sx, top + sy, 1.0);
                    }
                }
            }
        }
    }
}

/// Something that can draw text onto a [`Canvas`]. Text is set left to right
/// starting at `origin`, which is the left end of the baseline.
pub trait TextPainter {
    fn paint(&self, canvas: &mut Canvas, font: &FontSpec, text: &str, origin: (Px, Px), colour: Colour);
}

impl<T: TextPainter + ?Sized> TextPainter for &T {
    fn paint(&self, canvas: &mut Canvas, font: &FontSpec, text: &str, origin: (Px, Px), colour: Colour) {
        (**self).paint(canvas, font, text, origin, colour)
    }
}

impl TextPainter for FontBook {
    fn paint(&self, canvas: &mut Canvas, font: &FontSpec, text: &str, origin: (Px, Px), colour: Colour) {
        let Some(f) = self.get(font.id) else {
            log::warn!("painting with a font that isn't in the font book");
            return;
        };

        // ab_glyph scales by the font's full height; convert from em size so
        // advances agree with what the measurer reports
        let outlines = &f.outlines;
        let units_per_em = outlines.units_per_em().unwrap_or(1000.0);
        let scale = ab_glyph::PxScale::from(*font.size * outlines.height_unscaled() / units_per_em);
        let scaled = outlines.as_scaled(scale);

        let mut caret = *origin.0;
        for ch in text.chars() {
            let Some(gid) = f.glyph_id(ch) else {
                continue;
            };
            let id = ab_glyph::GlyphId(gid.0);
            let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, *origin.1));
            caret += scaled.h_advance(id);

            if let Some(outlined) = outlines.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (left, top) = (bounds.min.x as i64, bounds.min.y as i64);
                outlined.draw(|x, y, c| canvas.blend_pixel(left + x as i64, top + y as i64, colour, c));
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A stand-in for real glyphs, matching the monospace measurer: every grapheme
    //! is drawn as a solid block 10px wide reaching from the baseline up to
    //! three quarters of the font size.

    use super::*;
    use crate::measure::testing::{Monospace, GLYPH_WIDTH};
    use crate::measure::{Measurement, TextMeasurer};
    use unicode_segmentation::UnicodeSegmentation;

    pub struct BlockPainter;

    impl TextMeasurer for BlockPainter {
        fn measure(&self, font: &FontSpec, text: &str) -> Measurement {
            Monospace.measure(font, text)
        }
    }

    impl TextPainter for BlockPainter {
        fn paint(&self, canvas: &mut Canvas, font: &FontSpec, text: &str, origin: (Px, Px), colour: Colour) {
            let height = font.size * 0.75;
            for (i, g) in text.graphemes(true).enumerate() {
                if g.trim().is_empty() {
                    continue;
                }
                let x = origin.0 + Px(i as f32 * GLYPH_WIDTH);
                canvas.fill(
                    &Path::rect(x + Px(1.0), origin.1 - height, Px(GLYPH_WIDTH - 2.0), height),
                    colour,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;

    #[test]
    fn new_canvas_is_transparent() {
        let canvas = Canvas::new(4, 3);
        assert!(canvas.image().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn fills_a_rect_exactly() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill(&Path::rect(Px(2.0), Px(2.0), Px(4.0), Px(4.0)), colours::WHITE);
        assert_eq!(canvas.pixel(3, 3), Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(2, 5), Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(6, 3).0[3], 0);
        assert_eq!(canvas.pixel(1, 1).0[3], 0);
    }

    #[test]
    fn rounded_corners_are_cut_away() {
        let mut canvas = Canvas::new(40, 40);
        canvas.fill(
            &Path::rounded_rect(Px(0.0), Px(0.0), Px(40.0), Px(40.0), Px(16.0)),
            colours::WHITE,
        );
        assert_eq!(canvas.pixel(0, 0).0[3], 0);
        assert_eq!(canvas.pixel(20, 0).0[3], 255);
        assert_eq!(canvas.pixel(20, 20).0[3], 255);
        assert_eq!(canvas.pixel(39, 39).0[3], 0);
    }

    #[test]
    fn ring_leaves_the_middle_empty() {
        let mut canvas = Canvas::new(40, 40);
        canvas.fill(
            &Path::ring((Px(20.0), Px(20.0)), Px(20.0), Px(10.0)),
            colours::WHITE,
        );
        assert_eq!(canvas.pixel(20, 20).0[3], 0);
        assert_eq!(canvas.pixel(20, 5).0[3], 255);
        assert_eq!(canvas.pixel(0, 0).0[3], 0);
    }

    #[test]
    fn triangle_covers_one_half() {
        let mut canvas = Canvas::new(20, 20);
        canvas.fill(
            &Path::triangle((Px(0.0), Px(0.0)), (Px(20.0), Px(0.0)), (Px(0.0), Px(20.0))),
            colours::BLACK,
        );
        assert_eq!(canvas.pixel(2, 2).0[3], 255);
        assert_eq!(canvas.pixel(17, 17).0[3], 0);
    }

    #[test]
    fn blending_is_source_over() {
        let mut canvas = Canvas::new(1, 1);
        canvas.blend_pixel(0, 0, colours::WHITE, 1.0);
        canvas.blend_pixel(0, 0, colours::BLACK, 0.5);
        let [r, g, b, a] = canvas.pixel(0, 0).0;
        assert_eq!(a, 255);
        assert!((126..=129).contains(&r) && r == g && g == b);
        // off the surface is a no-op
        canvas.blend_pixel(-1, 0, colours::BLACK, 1.0);
        canvas.blend_pixel(0, 1, colours::BLACK, 1.0);
    }

    #[test]
    fn antialiased_edges_keep_an_opaque_surface_opaque() {
        let mut canvas = Canvas::new(40, 40);
        canvas.fill(&Path::rect(Px(0.0), Px(0.0), Px(40.0), Px(40.0)), colours::BLACK);
        // edges that cut through pixels leave partial coverage everywhere along them
        canvas.fill(&Path::circle((Px(20.3), Px(19.7)), Px(13.4)), colours::WHITE);
        canvas.fill(
            &Path::triangle((Px(2.5), Px(37.2)), (Px(37.1), Px(3.3)), (Px(30.6), Px(36.9))),
            Colour::new_rgba(34, 197, 94, 0.6),
        );
        assert!(canvas.image().pixels().all(|p| p.0[3] == 255));

        let edge = canvas.pixel(33, 20).0;
        assert!(edge[0] > 0 && edge[0] < 255, "{edge:?}");
    }

    #[test]
    fn translucent_over_translucent() {
        let mut canvas = Canvas::new(1, 1);
        canvas.blend_pixel(0, 0, Colour::new_rgba(255, 0, 0, 0.5), 1.0);
        canvas.blend_pixel(0, 0, Colour::new_rgba(0, 0, 255, 0.5), 1.0);
        let [r, g, b, a] = canvas.pixel(0, 0).0;
        // each layer is 128/255 opaque: 128 + 128 * (1 - 128/255), rounded
        assert_eq!(a, 192);
        assert_eq!(g, 0);
        assert!(b > r && r > 0);
    }

    #[test]
    fn masked_image_only_draws_inside_the_mask() {
        let source = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let mut canvas = Canvas::new(10, 10);
        let mask = Path::circle((Px(5.0), Px(5.0)), Px(5.0));
        canvas.draw_image(&source, 0, 0, Some(&mask));
        assert_eq!(canvas.pixel(5, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(0, 0).0[3], 0);

        let mut unmasked = Canvas::new(10, 10);
        unmasked.draw_image(&source, 2, 2, None);
        assert_eq!(unmasked.pixel(1, 1).0[3], 0);
        assert_eq!(unmasked.pixel(9, 9), Rgba([255, 0, 0, 255]));
    }
}
