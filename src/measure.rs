//! Text measurement.
//!
//! Everything in the layout engine measures text through the [`TextMeasurer`]
//! trait, so that layout can be driven by real fonts (via [`FontBook`]) or by a
//! deterministic stand-in.

use crate::font::{FontBook, FontSpec};
use crate::units::Px;
use owned_ttf_parser::AsFaceRef;

/// The result of measuring a run of text.
///
/// `ascent` and `descent` describe the ink bounding box of the run, both measured
/// away from the baseline (so `descent` is positive below the baseline). They are
/// `None` when the provider has no bounding box to report, for example for an
/// empty or all-whitespace string.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Measurement {
    pub width: Px,
    pub ascent: Option<Px>,
    pub descent: Option<Px>,
}

/// Ascent and descent to assume when a measurement has no bounding box
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FallbackMetrics {
    pub ascent: Px,
    pub descent: Px,
}

impl FallbackMetrics {
    pub const AUTHOR: FallbackMetrics = FallbackMetrics::new(14.0, 4.0);
    pub const QUOTED: FallbackMetrics = FallbackMetrics::new(12.0, 4.0);
    pub const BODY: FallbackMetrics = FallbackMetrics::new(15.0, 5.0);
    pub const TIME: FallbackMetrics = FallbackMetrics::new(10.0, 3.0);

    pub const fn new(ascent: f32, descent: f32) -> FallbackMetrics {
        FallbackMetrics {
            ascent: Px(ascent),
            descent: Px(descent),
        }
    }
}

impl Measurement {
    pub fn ascent_or(&self, fallback: FallbackMetrics) -> Px {
        self.ascent.unwrap_or(fallback.ascent)
    }

    pub fn descent_or(&self, fallback: FallbackMetrics) -> Px {
        self.descent.unwrap_or(fallback.descent)
    }

    /// Height of the ink box, rounded up to whole pixels
    pub fn height_or(&self, fallback: FallbackMetrics) -> Px {
        (self.ascent_or(fallback) + self.descent_or(fallback)).ceil()
    }
}

/// Something that can measure text set in a given font.
///
/// Implementations must be deterministic: the same `(font, text)` pair must always
/// produce the same measurement. Measuring is done once per candidate line while
/// wrapping, so it should be cheap.
pub trait TextMeasurer {
    fn measure(&self, font: &FontSpec, text: &str) -> Measurement;

    /// Shorthand for the advance width of `text`
    fn width(&self, font: &FontSpec, text: &str) -> Px {
        self.measure(font, text).width
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, font: &FontSpec, text: &str) -> Measurement {
        (**self).measure(font, text)
    }
}

impl TextMeasurer for FontBook {
    fn measure(&self, font: &FontSpec, text: &str) -> Measurement {
        let Some(f) = self.get(font.id) else {
            log::warn!("measuring with a font that isn't in the font book");
            return Measurement::default();
        };
        let face = f.face.as_face_ref();
        let scaling = f.scaling(font.size);

        let mut width = 0.0f32;
        let mut y_max: Option<i16> = None;
        let mut y_min: Option<i16> = None;
        for gid in text.chars().filter_map(|ch| f.glyph_id(ch)) {
            width += face.glyph_hor_advance(gid).unwrap_or_default() as f32;
            if let Some(bbox) = face.glyph_bounding_box(gid) {
                y_max = Some(y_max.map_or(bbox.y_max, |y| y.max(bbox.y_max)));
                y_min = Some(y_min.map_or(bbox.y_min, |y| y.min(bbox.y_min)));
            }
        }

        Measurement {
            width: Px(width * scaling),
            ascent: y_max.map(|y| Px(y as f32 * scaling)),
            descent: y_min.map(|y| Px(-(y as f32) * scaling)),
        }
    }
}
