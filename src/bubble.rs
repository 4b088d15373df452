use crate::avatar::Avatar;
use crate::canvas::{Canvas, TextPainter};
use crate::compositor::Compositor;
use crate::config::{BubbleConfig, Mode, MAX_SURFACE_SIZE};
use crate::layout::{plan, truncate_graphemes, wrap, WrapOptions, WrappedQuote};
use crate::measure::TextMeasurer;
use crate::BubbleError;
use chrono::Timelike;
use image::RgbaImage;

/// The message being replied to
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Quote {
    pub author: String,
    pub snippet: String,
}

/// The text content of one chat message
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Message {
    pub body: String,
    pub author: String,
    /// Shown as-is in the bottom corner of the bubble
    pub time: String,
    /// Only drawn in [`Mode::Reply`]
    pub quote: Option<Quote>,
}

impl Message {
    pub fn new<B: ToString, A: ToString>(body: B, author: A) -> Message {
        Message {
            body: body.to_string(),
            author: author.to_string(),
            ..Default::default()
        }
    }

    pub fn time<S: ToString>(mut self, time: S) -> Self {
        self.time = time.to_string();
        self
    }

    /// Set the timestamp from a clock time, formatted as `HH:MM`
    pub fn sent_at<T: Timelike>(self, time: T) -> Self {
        self.time(format!("{:02}:{:02}", time.hour(), time.minute()))
    }

    pub fn quote<A: ToString, S: ToString>(mut self, author: A, snippet: S) -> Self {
        self.quote = Some(Quote {
            author: author.to_string(),
            snippet: snippet.to_string(),
        });
        self
    }
}

/// The pixels of a rendered bubble: non-premultiplied RGBA, 8 bits per channel,
/// row by row from the top left. Encoding to PNG or anything else is left to the
/// caller.
#[derive(Debug, Clone)]
pub struct RenderedBubble {
    image: RgbaImage,
}

impl RenderedBubble {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Lay out and draw one message bubble.
///
/// Text is wrapped and measured with `fonts`, the geometry planned from the
/// result, and everything drawn onto a transparent surface exactly as wide as
/// the configured width and as tall as the planned bubble. The avatar must
/// already be resolved; see [`Avatar::decode`] and [`Avatar::acquire`].
///
/// Fails if the configuration is invalid, if the bubble would be taller than
/// [`MAX_SURFACE_SIZE`], or if the configuration asks for a reply bubble and
/// the message has no quote.
pub fn render<F: TextMeasurer + TextPainter + ?Sized>(
    message: &Message,
    avatar: &Avatar,
    config: &BubbleConfig,
    fonts: &F,
) -> Result<RenderedBubble, BubbleError> {
    config.validate()?;

    let wrap_options = |width| {
        WrapOptions::new(width)
            .max_lines(config.max_lines)
            .ellipsis(&config.ellipsis)
    };

    let quote = match (config.mode, &message.quote) {
        (Mode::Normal, _) => None,
        (Mode::Reply, None) => return Err(BubbleError::MissingQuote),
        (Mode::Reply, Some(quote)) => Some(WrappedQuote {
            author: quote.author.clone(),
            lines: wrap(
                fonts,
                &config.fonts.quoted,
                &quote.snippet,
                &wrap_options(config.quote_width()),
            ),
        }),
    };

    let body = wrap(
        fonts,
        &config.fonts.body,
        &message.body,
        &wrap_options(config.text_width()),
    );
    let author = truncate_graphemes(&message.author, config.author_name_limit, "...");

    let geometry = plan(fonts, config, quote.as_ref(), &author, &body, &message.time)?;
    let limit = MAX_SURFACE_SIZE as f32;
    // also catches NaN
    if !(*geometry.width <= limit && *geometry.height <= limit) {
        return Err(BubbleError::SurfaceTooLarge(*geometry.width, *geometry.height));
    }

    let mut canvas = Canvas::new(geometry.width.to_pixels(), geometry.height.to_pixels());
    Compositor::new(fonts, config).draw(&mut canvas, &geometry, avatar);

    Ok(RenderedBubble {
        image: canvas.into_image(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::testing::BlockPainter;
    use crate::config::{FontRoles, Side};
    use crate::layout::Padding;
    use crate::measure::testing::fake_font;
    use crate::Px;
    use chrono::NaiveTime;
    use image::{DynamicImage, Rgba};

    fn config() -> BubbleConfig {
        BubbleConfig::new(FontRoles::single(fake_font(32.0).id))
    }

    fn message() -> Message {
        Message::new("Hello world", "Ana Souza").time("12:37")
    }

    fn initials() -> Avatar {
        Avatar::from_image(None, "Ana Souza")
    }

    #[test]
    fn output_is_the_configured_width_by_the_planned_height() {
        let out = render(&message(), &initials(), &config(), &BlockPainter).unwrap();
        assert_eq!((out.width(), out.height()), (400, 139));
        assert_eq!(out.as_raw().len(), 400 * 139 * 4);
        assert_eq!(out.into_raw().len(), 400 * 139 * 4);
    }

    #[test]
    fn long_bodies_grow_the_bubble() {
        let text = lipsum::lipsum(120);
        let long = Message::new(text, "Ana").time("12:37");
        let out = render(&long, &initials(), &config(), &BlockPainter).unwrap();
        assert!(out.height() > 139);
    }

    #[test]
    fn reply_without_a_quote_is_rejected() {
        let mut c = config();
        c.mode(Mode::Reply);
        let err = render(&message(), &initials(), &c, &BlockPainter).unwrap_err();
        assert!(matches!(err, BubbleError::MissingQuote));

        let reply = message().quote("Bia", "see you there");
        let out = render(&reply, &initials(), &c, &BlockPainter).unwrap();
        assert!(out.height() > 139);
    }

    #[test]
    fn quotes_are_ignored_in_normal_mode() {
        let plain = render(&message(), &initials(), &config(), &BlockPainter).unwrap();
        let quoted = render(
            &message().quote("Bia", "see you there"),
            &initials(),
            &config(),
            &BlockPainter,
        )
        .unwrap();
        assert_eq!(plain.as_raw(), quoted.as_raw());
    }

    #[test]
    fn invalid_config_is_fatal() {
        let mut c = config();
        c.width(Px(0.0));
        assert!(matches!(
            render(&message(), &initials(), &c, &BlockPainter),
            Err(BubbleError::InvalidConfig(..))
        ));
    }

    #[test]
    fn infinite_or_oversized_bubbles_are_rejected() {
        let mut c = config();
        c.width(Px(f32::INFINITY));
        assert!(matches!(
            render(&message(), &initials(), &c, &BlockPainter),
            Err(BubbleError::InvalidConfig("width", _))
        ));

        let mut c = config();
        c.padding(Padding::bubble(Px(1.0e7), Px(14.0)));
        assert!(matches!(
            render(&message(), &initials(), &c, &BlockPainter),
            Err(BubbleError::SurfaceTooLarge(..))
        ));

        let mut c = config();
        c.padding(Padding::bubble(Px(f32::NAN), Px(14.0)));
        assert!(matches!(
            render(&message(), &initials(), &c, &BlockPainter),
            Err(BubbleError::InvalidConfig("padding", _))
        ));
    }

    #[test]
    fn failed_avatar_fetch_looks_like_no_avatar() {
        let fetch = async { Err::<DynamicImage, _>("timed out") };
        let fetched = pollster::block_on(Avatar::acquire(fetch, "Ana Souza"));

        let a = render(&message(), &fetched, &config(), &BlockPainter).unwrap();
        let b = render(&message(), &initials(), &config(), &BlockPainter).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn sides_mirror_each_other() {
        let mut c = config();
        c.side(Side::Right);
        let right = render(&message(), &initials(), &c, &BlockPainter).unwrap();
        let left = render(&message(), &initials(), &config(), &BlockPainter).unwrap();
        assert_eq!(right.height(), left.height());
        // avatar column is on the outside edge
        let bubble = Rgba::<u8>::from(c.palette.bubble);
        assert_eq!(*left.image().get_pixel(399, 70), bubble);
        assert_eq!(*right.image().get_pixel(0, 70), bubble);
        assert_eq!(right.image().get_pixel(399, 70).0[3], 0);
    }

    #[test]
    fn long_author_names_are_shortened() {
        let c = config();
        let long = Message::new("hi", "Maximiliano Fernandes").time("9:41");
        let short = Message::new("hi", "Maximiliano Fe...").time("9:41");
        let a = render(&long, &initials(), &c, &BlockPainter).unwrap();
        let b = render(&short, &initials(), &c, &BlockPainter).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn timestamps_from_clock_times() {
        let time = NaiveTime::from_hms_opt(9, 5, 59).unwrap();
        assert_eq!(Message::new("", "").sent_at(time).time, "09:05");
    }
}
