//! Drawing a planned bubble onto a [`Canvas`].
//!
//! The compositor makes no layout decisions of its own: every position comes
//! from a [`BubbleGeometry`], and the only thing measured here is the width of
//! the initials so they can be centred in the avatar.

use crate::avatar::{cover_fit_image, Avatar};
use crate::canvas::{Canvas, Path, TextPainter};
use crate::colour::Colour;
use crate::config::BubbleConfig;
use crate::font::FontSpec;
use crate::layout::{AvatarGeometry, BubbleGeometry, TextRun};
use crate::measure::{FallbackMetrics, TextMeasurer};
use crate::units::Px;
use image::imageops;

/// Draws bubbles with one set of fonts and one configuration
pub struct Compositor<'a, F: ?Sized> {
    fonts: &'a F,
    config: &'a BubbleConfig,
}

impl<'a, F: TextMeasurer + TextPainter + ?Sized> Compositor<'a, F> {
    pub fn new(fonts: &'a F, config: &'a BubbleConfig) -> Compositor<'a, F> {
        Compositor { fonts, config }
    }

    /// Draw everything in `geometry`, back to front: avatar, bubble, pointer
    /// arrow, quote, then the message text
    pub fn draw(&self, canvas: &mut Canvas, geometry: &BubbleGeometry, avatar: &Avatar) {
        match avatar {
            Avatar::Image(image) => self.image_avatar(canvas, geometry.avatar, image),
            Avatar::Initials(initials) => self.initials_avatar(canvas, geometry.avatar, initials),
        }

        let palette = &self.config.palette;
        let bubble = geometry.bubble;
        canvas.fill(
            &Path::rounded_rect(bubble.x, bubble.y, bubble.w, bubble.h, geometry.radius),
            palette.bubble,
        );
        let arrow = geometry.arrow;
        canvas.fill(&Path::triangle(arrow.anchor, arrow.tip, arrow.base), palette.bubble);

        let fonts = &self.config.fonts;
        if let Some(quote) = &geometry.quote {
            let bar = quote.bar;
            canvas.fill(&Path::rect(bar.x, bar.y, bar.w, bar.h), palette.quoted_bar);
            self.text(canvas, &fonts.author, &quote.author, palette.quoted_header);
            for line in &quote.lines {
                self.text(canvas, &fonts.quoted, line, palette.quoted_text);
            }
        }

        self.text(canvas, &fonts.author, &geometry.author, palette.author);
        for line in &geometry.body {
            self.text(canvas, &fonts.body, line, palette.text);
        }
        self.text(canvas, &fonts.time, &geometry.time, palette.time);
    }

    fn text(&self, canvas: &mut Canvas, font: &FontSpec, run: &TextRun, colour: Colour) {
        if run.text.is_empty() {
            return;
        }
        self.fonts
            .paint(canvas, font, &run.text, (run.x, run.baseline), colour);
    }

    fn image_avatar(&self, canvas: &mut Canvas, at: AvatarGeometry, image: &image::RgbaImage) {
        let style = &self.config.avatar;
        let (cx, cy) = at.center;
        let r = at.radius;
        let size = (r * 2.0).to_pixels();
        let left = (*cx - *r).round() as i64;
        let top = (*cy - *r).round() as i64;

        if *style.shadow_blur > 0.0 {
            // a blurred disc in a layer with room for the blur to spread into
            let margin = (style.shadow_blur * 2.0).to_pixels();
            let mut layer = Canvas::new(size + margin * 2, size + margin * 2);
            let offset = Px(margin as f32) + r;
            layer.fill(&Path::circle((offset, offset), r), style.shadow_colour);
            let shadow = imageops::blur(layer.image(), *style.shadow_blur / 2.0);
            canvas.draw_image(&shadow, left - margin as i64, top - margin as i64, None);
        }

        let fitted = cover_fit_image(image, size);
        canvas.draw_image(&fitted, left, top, Some(&Path::circle(at.center, r)));

        if *style.border_width > 0.0 {
            let inner = (r - style.border_width).max(Px::ZERO);
            canvas.fill(&Path::ring(at.center, r, inner), style.border_colour);
        }
    }

    fn initials_avatar(&self, canvas: &mut Canvas, at: AvatarGeometry, initials: &str) {
        let style = &self.config.avatar;
        canvas.fill(&Path::circle(at.center, at.radius), style.initials_background);
        if initials.is_empty() {
            return;
        }

        // centred on the avatar both ways
        let font = &self.config.fonts.initials;
        let m = self.fonts.measure(font, initials);
        let (cx, cy) = at.center;
        let x = cx - m.width / 2.0;
        let baseline =
            cy + (m.ascent_or(FallbackMetrics::AUTHOR) - m.descent_or(FallbackMetrics::AUTHOR)) / 2.0;
        self.fonts
            .paint(canvas, font, initials, (x, baseline), style.initials_colour);
    }
}
