use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum BubbleError {
    /// A size or inset in the [`BubbleConfig`](crate::BubbleConfig) was out of
    /// range, or left no room for the bubble
    #[error("invalid configuration: `{0}` is out of range (got {1})")]
    InvalidConfig(&'static str, f32),

    /// The planned bubble would not fit on a surface of at most
    /// [`MAX_SURFACE_SIZE`](crate::MAX_SURFACE_SIZE) pixels a side
    #[error("bubble of {0} x {1} px is larger than the biggest allowed surface")]
    SurfaceTooLarge(f32, f32),

    /// The configuration asked for a reply bubble but the message has no quote
    #[error("reply mode requires a quoted author and snippet")]
    MissingQuote,

    /// A colour string was not `#rgb` or `#rrggbb`
    #[error("invalid colour: {0:?}")]
    InvalidColour(String),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [ab_glyph] failed to read the font outlines
    InvalidFont(#[from] ab_glyph::InvalidFont),

    #[error(transparent)]
    /// [image] failed to decode the image
    Image(#[from] image::ImageError),
}
