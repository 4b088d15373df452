use crate::colour::{colours, Colour};
use crate::font::{Font, FontSpec};
use crate::layout::Padding;
use crate::style::Palette;
use crate::{BubbleError, Px};
use id_arena::Id;

/// Largest width or height, in pixels, of a surface a bubble may be drawn on
pub const MAX_SURFACE_SIZE: u32 = 16_384;

/// Whether the bubble quotes another message above its body
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Mode {
    #[default]
    Normal,
    Reply,
}

/// Which side of the conversation the bubble sits on. The avatar sits on the
/// outer edge and the pointer arrow on the bubble's top corner next to it.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

/// The font used for each role text plays in a bubble
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FontRoles {
    /// Message author and quoted author
    pub author: FontSpec,
    /// Quoted snippet
    pub quoted: FontSpec,
    /// Message body
    pub body: FontSpec,
    /// Timestamp
    pub time: FontSpec,
    /// Initials drawn when there is no avatar image
    pub initials: FontSpec,
}

impl FontRoles {
    /// The standard sizes: bold 36px author, 32px quote and body, 24px time and
    /// bold 28px initials
    pub fn new(regular: Id<Font>, bold: Id<Font>) -> FontRoles {
        FontRoles {
            author: FontSpec::new(bold, Px(36.0)),
            quoted: FontSpec::new(regular, Px(32.0)),
            body: FontSpec::new(regular, Px(32.0)),
            time: FontSpec::new(regular, Px(24.0)),
            initials: FontSpec::new(bold, Px(28.0)),
        }
    }

    /// Every role set in the same face at the standard sizes
    pub fn single(font: Id<Font>) -> FontRoles {
        FontRoles::new(font, font)
    }
}

/// How the avatar circle is decorated
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AvatarStyle {
    /// Width of the ring around an image avatar; 0 disables it
    pub border_width: Px,
    pub border_colour: Colour,
    /// Blur radius of the drop shadow behind an image avatar; 0 disables it
    pub shadow_blur: Px,
    pub shadow_colour: Colour,
    /// Disc colour behind the initials
    pub initials_background: Colour,
    pub initials_colour: Colour,
}

impl Default for AvatarStyle {
    fn default() -> Self {
        AvatarStyle {
            border_width: Px(2.0),
            border_colour: colours::WHITE,
            shadow_blur: Px(6.0),
            shadow_colour: Colour::new_rgba(0, 0, 0, 0.25),
            initials_background: colours::SLATE,
            initials_colour: colours::WHITE,
        }
    }
}

/// Everything that controls how a bubble is laid out and drawn. A config is
/// never modified by rendering and can be shared between renders.
#[derive(Clone, PartialEq, Debug)]
pub struct BubbleConfig {
    pub mode: Mode,
    pub side: Side,
    /// Total width of the output image, avatar column included
    pub width: Px,
    /// Diameter of the avatar circle
    pub avatar_size: Px,
    /// Gap between the avatar column and the bubble
    pub avatar_spacing: Px,
    pub bubble_radius: Px,
    pub padding: Padding,
    pub quote_body_gap: Px,
    pub body_time_gap: Px,
    /// Width of the bar beside a quote
    pub bar_width: Px,
    /// Gap between the bar and the quoted text
    pub bar_gap: Px,
    /// Gap below the quoted author
    pub quote_author_gap: Px,
    /// Gap between quoted lines
    pub quoted_line_gap: Px,
    /// Added to the measured height of a quoted line
    pub quoted_line_extra: Px,
    /// Added to the measured height of a body line
    pub body_line_extra: Px,
    /// Gap between the message author and the body
    pub author_body_gap: Px,
    /// Half the base of the pointer arrow
    pub arrow_size: Px,
    /// Half the height of the pointer arrow
    pub arrow_height: Px,
    /// Most lines the body or quote may wrap to
    pub max_lines: usize,
    pub ellipsis: String,
    /// Author names longer than this many graphemes are shortened
    pub author_name_limit: usize,
    pub fonts: FontRoles,
    pub palette: Palette,
    pub avatar: AvatarStyle,
}

impl BubbleConfig {
    pub fn new(fonts: FontRoles) -> BubbleConfig {
        BubbleConfig {
            mode: Mode::Normal,
            side: Side::Left,
            width: Px(400.0),
            avatar_size: Px(80.0),
            avatar_spacing: Px(8.0),
            bubble_radius: Px(16.0),
            padding: Padding::bubble(Px(24.0), Px(14.0)),
            quote_body_gap: Px(10.0),
            body_time_gap: Px(8.0),
            bar_width: Px(5.0),
            bar_gap: Px(8.0),
            quote_author_gap: Px(4.0),
            quoted_line_gap: Px(4.0),
            quoted_line_extra: Px(2.0),
            body_line_extra: Px(3.0),
            author_body_gap: Px(12.0),
            arrow_size: Px(12.0),
            arrow_height: Px(18.0),
            max_lines: 20,
            ellipsis: "…".to_string(),
            author_name_limit: 15,
            fonts,
            palette: Palette::default(),
            avatar: AvatarStyle::default(),
        }
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn side(&mut self, side: Side) -> &mut Self {
        self.side = side;
        self
    }

    pub fn width(&mut self, width: Px) -> &mut Self {
        self.width = width;
        self
    }

    pub fn avatar_size(&mut self, avatar_size: Px) -> &mut Self {
        self.avatar_size = avatar_size;
        self
    }

    pub fn bubble_radius(&mut self, bubble_radius: Px) -> &mut Self {
        self.bubble_radius = bubble_radius;
        self
    }

    pub fn padding(&mut self, padding: Padding) -> &mut Self {
        self.padding = padding;
        self
    }

    pub fn palette(&mut self, palette: Palette) -> &mut Self {
        self.palette = palette;
        self
    }

    pub fn avatar_style(&mut self, avatar: AvatarStyle) -> &mut Self {
        self.avatar = avatar;
        self
    }

    pub fn fonts(&mut self, fonts: FontRoles) -> &mut Self {
        self.fonts = fonts;
        self
    }

    pub fn max_lines(&mut self, max_lines: usize) -> &mut Self {
        self.max_lines = max_lines;
        self
    }

    pub fn ellipsis<S: ToString>(&mut self, ellipsis: S) -> &mut Self {
        self.ellipsis = ellipsis.to_string();
        self
    }

    /// Width of the bubble itself: everything but the avatar column
    pub fn bubble_width(&self) -> Px {
        self.width - self.avatar_size - self.avatar_spacing
    }

    /// Widest a body line may be
    pub fn text_width(&self) -> Px {
        self.bubble_width() - self.padding.horizontal()
    }

    /// Widest a quoted line may be, leaving room for the bar
    pub fn quote_width(&self) -> Px {
        self.text_width() - self.bar_width - self.bar_gap
    }

    /// Reject configurations that would produce an empty, negative or oversized
    /// surface
    pub fn validate(&self) -> Result<(), BubbleError> {
        fn positive(name: &'static str, value: Px) -> Result<(), BubbleError> {
            if value.is_finite() && *value > 0.0 {
                Ok(())
            } else {
                Err(BubbleError::InvalidConfig(name, *value))
            }
        }

        positive("width", self.width)?;
        if *self.width > MAX_SURFACE_SIZE as f32 {
            return Err(BubbleError::InvalidConfig("width", *self.width));
        }
        positive("avatar_size", self.avatar_size)?;
        positive("bubble width", self.bubble_width())?;
        positive("author font size", self.fonts.author.size)?;
        positive("quoted font size", self.fonts.quoted.size)?;
        positive("body font size", self.fonts.body.size)?;
        positive("time font size", self.fonts.time.size)?;
        positive("initials font size", self.fonts.initials.size)?;

        let padding = self.padding;
        for inset in [padding.top, padding.right, padding.bottom, padding.left] {
            if !inset.is_finite() {
                return Err(BubbleError::InvalidConfig("padding", *inset));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::testing::fake_font;

    fn config() -> BubbleConfig {
        BubbleConfig::new(FontRoles::single(fake_font(32.0).id))
    }

    #[test]
    fn default_widths() {
        let c = config();
        assert_eq!(c.bubble_width(), Px(312.0));
        assert_eq!(c.text_width(), Px(284.0));
        assert_eq!(c.quote_width(), Px(271.0));
        assert_eq!(c.padding.bottom, Px(48.0));
    }

    #[test]
    fn setters_chain() {
        let c = config()
            .mode(Mode::Reply)
            .side(Side::Right)
            .width(Px(600.0))
            .clone();
        assert_eq!(c.mode, Mode::Reply);
        assert_eq!(c.side, Side::Right);
        assert_eq!(c.width, Px(600.0));
    }

    #[test]
    fn rejects_non_positive_sizes() {
        assert!(config().validate().is_ok());
        assert!(matches!(
            config().width(Px(0.0)).validate(),
            Err(BubbleError::InvalidConfig("width", _))
        ));
        assert!(matches!(
            config().avatar_size(Px(-1.0)).validate(),
            Err(BubbleError::InvalidConfig("avatar_size", _))
        ));
        assert!(matches!(
            config().width(Px(80.0)).validate(),
            Err(BubbleError::InvalidConfig("bubble width", _))
        ));
        assert!(config().width(Px(f32::NAN)).validate().is_err());
        assert!(matches!(
            config().width(Px(f32::INFINITY)).validate(),
            Err(BubbleError::InvalidConfig("width", _))
        ));
        assert!(matches!(
            config().width(Px(1.0e9)).validate(),
            Err(BubbleError::InvalidConfig("width", _))
        ));

        let mut huge_font = config();
        huge_font.fonts.body.size = Px(f32::INFINITY);
        assert!(matches!(
            huge_font.validate(),
            Err(BubbleError::InvalidConfig("body font size", _))
        ));
    }
}
