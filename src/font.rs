use crate::{BubbleError, Px};
use ab_glyph::FontVec;
use id_arena::{Arena, Id};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};

/// A parsed font object. Fonts can be TTF or OTF fonts. The same bytes are parsed
/// twice: once by [owned_ttf_parser] for metrics, once by [ab_glyph] for the glyph
/// outlines used when rasterizing text.
///
/// Bold, italic, etc. are separate faces; load each weight you need as its own font
/// and refer to it by its id within a [FontBook]
pub struct Font {
    pub face: OwnedFace,
    pub outlines: FontVec,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, BubbleError> {
        let outlines = FontVec::try_from_vec(bytes.clone())?;
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face, outlines })
    }

    /// Obtain the full name of the font, if the font has one
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// Obtain the family name of the font, if the font has one
    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Obtain the weight of the font. Numerical values generally map as follows:
    ///
    /// * 100: Thin (Hairline)
    /// * 400: Normal
    /// * 700: Bold
    /// * 900: Black (Heavy)
    pub fn weight(&self) -> u16 {
        self.face.as_face_ref().weight().to_number()
    }

    /// Pixels per font unit at the given font size
    pub fn scaling(&self, size: Px) -> f32 {
        *size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Px) -> Px {
        Px(self.scaling(size) * self.face.as_face_ref().ascender() as f32)
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Px) -> Px {
        Px(self.scaling(size) * self.face.as_face_ref().descender() as f32)
    }

    /// Calculate the default line height of the font for the given size. The returned value is
    /// how much to vertically offset a second row of text below a first row of text.
    pub fn line_height(&self, size: Px) -> Px {
        let leading = Px(self.scaling(size) * self.face.as_face_ref().line_gap() as f32);
        leading + self.ascent(size) - self.descent(size)
    }

    /// The glyph for a character, substituting the replacement glyph (or `?`) for
    /// characters the font doesn't cover
    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
    }
}

/// A font plus the size to set it at. This is the identity under which text is
/// measured: the same spec and string always measure the same.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FontSpec {
    pub id: Id<Font>,
    pub size: Px,
}

impl FontSpec {
    pub fn new(id: Id<Font>, size: Px) -> FontSpec {
        FontSpec { id, size }
    }
}

/// The collection of fonts that bubbles can be rendered with
#[derive(Default)]
pub struct FontBook {
    pub fonts: Arena<Font>,
}

impl FontBook {
    pub fn new() -> FontBook {
        FontBook::default()
    }

    /// Add a font to the book, returning the id used to refer to it in a [FontSpec]
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Parse and add a font in one step
    pub fn load_font(&mut self, bytes: Vec<u8>) -> Result<Id<Font>, BubbleError> {
        Ok(self.add_font(Font::load(bytes)?))
    }

    pub fn get(&self, id: Id<Font>) -> Option<&Font> {
        self.fonts.get(id)
    }
}
