use crate::config::{BubbleConfig, Side};
use crate::measure::{FallbackMetrics, TextMeasurer};
use crate::rect::Rect;
use crate::units::Px;
use crate::BubbleError;

/// A run of text placed at a baseline
#[derive(Clone, PartialEq, Debug)]
pub struct TextRun {
    pub text: String,
    /// Left edge of the run
    pub x: Px,
    pub baseline: Px,
}

/// A quote that has already been wrapped to [`BubbleConfig::quote_width`]
#[derive(Clone, PartialEq, Debug)]
pub struct WrappedQuote {
    pub author: String,
    pub lines: Vec<String>,
}

/// Where the quoted message sits inside the bubble
#[derive(Clone, PartialEq, Debug)]
pub struct QuoteGeometry {
    /// The whole quoted block, bar included
    pub block: Rect,
    /// The coloured bar down the left of the block
    pub bar: Rect,
    pub author: TextRun,
    pub lines: Vec<TextRun>,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AvatarGeometry {
    pub center: (Px, Px),
    pub radius: Px,
}

/// The bubble's pointer: a right triangle whose right angle sits at `anchor`
/// on the bubble's top edge
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ArrowGeometry {
    pub anchor: (Px, Px),
    /// Outer point, level with the anchor and pointing away from the bubble
    pub tip: (Px, Px),
    /// Lower point, straight below the anchor
    pub base: (Px, Px),
}

/// The position of every element of one rendered bubble
#[derive(Clone, PartialEq, Debug)]
pub struct BubbleGeometry {
    /// Size of the surface to draw on
    pub width: Px,
    pub height: Px,
    pub bubble: Rect,
    /// Corner radius, clamped to half the bubble's smaller side
    pub radius: Px,
    pub quote: Option<QuoteGeometry>,
    pub author: TextRun,
    pub body: Vec<TextRun>,
    /// Right-aligned inside the bubble's padding
    pub time: TextRun,
    pub avatar: AvatarGeometry,
    pub arrow: ArrowGeometry,
}

/// The part of a source image that fills a target rectangle without distortion,
/// as `(x, y, width, height)` in source pixels. The longer axis (relative to the
/// target's aspect ratio) is cropped equally from both ends.
pub fn cover_fit(source: (f32, f32), target: (f32, f32)) -> (f32, f32, f32, f32) {
    let (sw, sh) = source;
    let source_ratio = sw / sh;
    let target_ratio = target.0 / target.1;

    if source_ratio > target_ratio {
        // wider than the target, crop the sides
        let w = sh * target_ratio;
        ((sw - w) / 2.0, 0.0, w, sh)
    } else {
        // taller than the target, crop top and bottom
        let h = sw / target_ratio;
        (0.0, (sh - h) / 2.0, sw, h)
    }
}

/// Compute the geometry of a bubble from its already-wrapped text.
///
/// The height is the sum of independently measured blocks, top to bottom:
/// header padding, the quote (reply mode only) and its gap, the body lines, the
/// body-to-time gap, the timestamp and the footer padding. The message author
/// line is not part of that sum; it sits in the room the footer padding leaves.
/// A bubble is never shorter than its avatar.
///
/// Text is laid out from half the header padding down, with every run placed at
/// the baseline of its font.
pub fn plan<M: TextMeasurer + ?Sized>(
    measurer: &M,
    config: &BubbleConfig,
    quote: Option<&WrappedQuote>,
    author: &str,
    body: &[String],
    time: &str,
) -> Result<BubbleGeometry, BubbleError> {
    config.validate()?;
    let fonts = &config.fonts;

    // measure every block on its own
    let body_metrics = measurer.measure(&fonts.body, "Mg");
    let body_line_height = body_metrics.height_or(FallbackMetrics::BODY) + config.body_line_extra;
    let body_height = body_line_height * body.len() as f32;

    let time_metrics = measurer.measure(&fonts.time, time);
    let time_height = time_metrics.height_or(FallbackMetrics::TIME);

    let quote_metrics = quote.map(|q| {
        let author = measurer.measure(&fonts.author, &q.author);
        let line = measurer.measure(&fonts.quoted, "Mg");
        let author_height = author.height_or(FallbackMetrics::AUTHOR);
        let line_height = line.height_or(FallbackMetrics::QUOTED) + config.quoted_line_extra;
        let height = author_height
            + config.quote_author_gap
            + (line_height + config.quoted_line_gap) * q.lines.len() as f32;
        (author, author_height, line, line_height, height)
    });
    let quote_stack = quote_metrics
        .as_ref()
        .map(|&(.., height)| height + config.quote_body_gap)
        .unwrap_or_default();

    let stack = config.padding.top
        + quote_stack
        + body_height
        + config.body_time_gap
        + time_height
        + config.padding.bottom;
    let height = stack.max(config.avatar_size);

    // horizontal layout
    let bubble_w = config.bubble_width();
    let (bubble_x, avatar_x) = match config.side {
        Side::Left => (config.avatar_size + config.avatar_spacing, config.avatar_size / 2.0),
        Side::Right => (Px::ZERO, config.width - config.avatar_size / 2.0),
    };
    let bubble = Rect::new(bubble_x, Px::ZERO, bubble_w, height);
    let radius = config
        .bubble_radius
        .min(bubble.w / 2.0)
        .min(bubble.h / 2.0)
        .max(Px::ZERO);

    let x = bubble.x + config.padding.left;
    let mut y = config.padding.top / 2.0;

    let quote = quote.zip(quote_metrics).map(
        |(q, (author_metrics, author_height, line_metrics, line_height, block_height))| {
            let top = y;
            let qx = x + config.bar_width + config.bar_gap;

            let author = TextRun {
                text: q.author.clone(),
                x: qx,
                baseline: y + author_metrics.ascent_or(FallbackMetrics::AUTHOR),
            };
            y += author_height + config.quote_author_gap;

            let ascent = line_metrics.ascent_or(FallbackMetrics::QUOTED);
            let lines = q
                .lines
                .iter()
                .map(|line| {
                    let run = TextRun {
                        text: line.clone(),
                        x: qx,
                        baseline: y + ascent,
                    };
                    y += line_height + config.quoted_line_gap;
                    run
                })
                .collect();
            y += config.quote_body_gap;

            QuoteGeometry {
                block: Rect::new(x, top, config.text_width(), block_height),
                bar: Rect::new(x, top, config.bar_width, block_height),
                author,
                lines,
            }
        },
    );

    let author_metrics = measurer.measure(&fonts.author, author);
    let author = TextRun {
        text: author.to_string(),
        x,
        baseline: y + author_metrics.ascent_or(FallbackMetrics::AUTHOR),
    };
    y += author_metrics.ascent_or(FallbackMetrics::AUTHOR)
        + author_metrics.descent_or(FallbackMetrics::AUTHOR)
        + config.author_body_gap;

    let body_ascent = body_metrics.ascent_or(FallbackMetrics::BODY);
    let body = body
        .iter()
        .map(|line| {
            let run = TextRun {
                text: line.clone(),
                x,
                baseline: y + body_ascent,
            };
            y += body_line_height;
            run
        })
        .collect();

    y += config.body_time_gap;
    let time = TextRun {
        text: time.to_string(),
        x: bubble.right() - config.padding.right - time_metrics.width,
        baseline: y + time_metrics.ascent_or(FallbackMetrics::TIME),
    };

    let arrow = {
        let (size, h) = (config.arrow_size, config.arrow_height);
        match config.side {
            Side::Left => {
                let anchor = (bubble.x + size, bubble.y);
                ArrowGeometry {
                    anchor,
                    tip: (anchor.0 - size * 2.0, anchor.1),
                    base: (anchor.0, anchor.1 + h * 2.0),
                }
            }
            Side::Right => {
                let anchor = (bubble.right() - size, bubble.y);
                ArrowGeometry {
                    anchor,
                    tip: (anchor.0 + size * 2.0, anchor.1),
                    base: (anchor.0, anchor.1 + h * 2.0),
                }
            }
        }
    };

    let geometry = BubbleGeometry {
        width: config.width,
        height,
        bubble,
        radius,
        quote,
        author,
        body,
        time,
        avatar: AvatarGeometry {
            center: (avatar_x, config.avatar_size / 2.0),
            radius: config.avatar_size / 2.0,
        },
        arrow,
    };
    log::debug!(
        "planned {}x{} bubble with {} body lines{}",
        geometry.width,
        geometry.height,
        geometry.body.len(),
        if geometry.quote.is_some() { " and a quote" } else { "" }
    );
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontRoles;
    use crate::measure::testing::*;
    use proptest::prelude::*;

    fn config() -> BubbleConfig {
        BubbleConfig::new(FontRoles::single(fake_font(32.0).id))
    }

    fn body(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn stacks_blocks_with_gaps_and_padding() {
        let g = plan(&Monospace, &config(), None, "Ana", &body(1), "12:37").unwrap();
        // 24 top + 35 body + 8 gap + 24 time + 48 bottom
        assert_eq!(g.height, Px(139.0));
        assert_eq!(g.bubble, Rect::new(Px(88.0), Px(0.0), Px(312.0), Px(139.0)));
        assert_eq!(g.width, Px(400.0));
        assert!(g.quote.is_none());
    }

    #[test]
    fn text_starts_inside_the_padding() {
        let g = plan(&Monospace, &config(), None, "Ana", &body(2), "").unwrap();
        assert_eq!(g.author.x, Px(102.0));
        // half the header padding, then the author's 27px ascent
        assert_eq!(g.author.baseline, Px(39.0));
        // author ink (27 + 9) and a 12px gap, then the body ascent
        assert_eq!(g.body[0].baseline, Px(12.0 + 36.0 + 12.0 + 24.0));
        assert_eq!(g.body[1].baseline - g.body[0].baseline, Px(35.0));
    }

    #[test]
    fn timestamp_is_right_aligned() {
        let g = plan(&Monospace, &config(), None, "Ana", &body(1), "12:37").unwrap();
        assert_eq!(g.time.x, g.bubble.right() - Px(14.0) - Px(50.0));
        assert!(g.time.baseline < g.height);
    }

    #[test]
    fn bubble_is_never_shorter_than_the_avatar() {
        let mut c = config();
        c.avatar_size(Px(200.0));
        let g = plan(&Monospace, &c, None, "Ana", &body(0), "").unwrap();
        assert_eq!(g.height, Px(200.0));
        assert_eq!(g.bubble.h, Px(200.0));
    }

    #[test]
    fn reply_adds_the_quote_block() {
        let quote = WrappedQuote {
            author: "Bia".into(),
            lines: body(2),
        };
        let plain = plan(&Monospace, &config(), None, "Ana", &body(1), "").unwrap();
        let reply = plan(&Monospace, &config(), Some(&quote), "Ana", &body(1), "").unwrap();

        // 36 author + 4 gap + 2 * (34 + 4) lines + 10 gap to the body
        assert_eq!(reply.height - plain.height, Px(126.0));

        let q = reply.quote.unwrap();
        assert_eq!(q.bar.h, Px(116.0));
        assert_eq!(q.bar.x, Px(102.0));
        assert_eq!(q.lines.len(), 2);
        assert_eq!(q.lines[0].x, Px(102.0 + 5.0 + 8.0));
        assert!(q.author.baseline < q.lines[0].baseline);
        assert!(q.block.bottom() < reply.author.baseline);
        assert_eq!(reply.author.baseline - plain.author.baseline, Px(126.0));
    }

    #[test]
    fn right_side_mirrors_avatar_and_arrow() {
        let mut c = config();
        c.side(Side::Right);
        let g = plan(&Monospace, &c, None, "Ana", &body(1), "").unwrap();
        assert_eq!(g.bubble.x, Px(0.0));
        assert_eq!(g.avatar.center, (Px(360.0), Px(40.0)));
        assert_eq!(g.arrow.anchor, (Px(300.0), Px(0.0)));
        assert_eq!(g.arrow.tip, (Px(324.0), Px(0.0)));
        assert_eq!(g.arrow.base, (Px(300.0), Px(36.0)));

        let left = plan(&Monospace, &config(), None, "Ana", &body(1), "").unwrap();
        assert_eq!(left.avatar.center, (Px(40.0), Px(40.0)));
        assert_eq!(left.arrow.anchor, (Px(100.0), Px(0.0)));
        assert_eq!(left.arrow.tip, (Px(76.0), Px(0.0)));
    }

    #[test]
    fn corner_radius_is_clamped() {
        let mut c = config();
        c.bubble_radius(Px(500.0));
        let g = plan(&Monospace, &c, None, "Ana", &body(1), "").unwrap();
        assert_eq!(g.radius, g.bubble.h / 2.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut c = config();
        c.width(Px(-10.0));
        let err = plan(&Monospace, &c, None, "Ana", &body(1), "").unwrap_err();
        assert!(matches!(err, BubbleError::InvalidConfig("width", _)));
    }

    #[test]
    fn cover_fit_crops_the_long_axis() {
        assert_eq!(cover_fit((200.0, 100.0), (1.0, 1.0)), (50.0, 0.0, 100.0, 100.0));
        assert_eq!(cover_fit((100.0, 300.0), (1.0, 1.0)), (0.0, 100.0, 100.0, 100.0));
        assert_eq!(cover_fit((64.0, 64.0), (80.0, 80.0)), (0.0, 0.0, 64.0, 64.0));
    }

    proptest! {
        #[test]
        fn more_body_lines_never_shrink_the_bubble(n in 0usize..40, quoted in 0usize..5) {
            let quote = WrappedQuote { author: "Bia".into(), lines: body(quoted) };
            let c = config();
            let shorter = plan(&Monospace, &c, Some(&quote), "Ana", &body(n), "9:41").unwrap();
            let longer = plan(&Monospace, &c, Some(&quote), "Ana", &body(n + 1), "9:41").unwrap();
            prop_assert!(longer.height >= shorter.height);
        }

        #[test]
        fn cover_fit_is_square_and_centred(w in 1.0f32..4000.0, h in 1.0f32..4000.0) {
            let (x, y, cw, ch) = cover_fit((w, h), (1.0, 1.0));
            prop_assert!((cw - ch).abs() <= 0.01 * cw.max(1.0));
            prop_assert!(cw <= w + 0.01 && ch <= h + 0.01);
            prop_assert!((x - (w - cw) / 2.0).abs() < 0.01);
            prop_assert!((y - (h - ch) / 2.0).abs() < 0.01);
        }
    }
}
