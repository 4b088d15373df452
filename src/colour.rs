use crate::error::BubbleError;
use image::Rgba;

/// A colour in the sRGB space with straight (non-premultiplied) alpha
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new opaque colour. r, g, and b range from 0 to 255
    pub const fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b, a: 255 }
    }

    /// Create a new colour with alpha. r, g, and b range from 0 to 255, a from 0.0 to 1.0
    pub fn new_rgba(r: u8, g: u8, b: u8, a: f32) -> Colour {
        Colour {
            r,
            g,
            b,
            a: (a.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    /// Parse a CSS-style hex colour, either `#rgb` or `#rrggbb`. The leading `#` is required.
    pub fn from_hex(hex: &str) -> Result<Colour, BubbleError> {
        let invalid = || BubbleError::InvalidColour(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                // #abc => #aabbcc
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Ok(Colour::new_rgb_bytes(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Colour::new_rgb_bytes(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// The same colour with its alpha scaled by `coverage` (0.0 to 1.0)
    pub fn with_coverage(self, coverage: f32) -> Colour {
        Colour {
            a: (self.a as f32 * coverage.clamp(0.0, 1.0)).round() as u8,
            ..self
        }
    }
}

impl From<Colour> for Rgba<u8> {
    fn from(c: Colour) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

impl From<[u8; 4]> for Colour {
    fn from(c: [u8; 4]) -> Self {
        let [r, g, b, a] = c;
        Colour { r, g, b, a }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::new_rgb_bytes(0, 0, 0);
    pub const WHITE: Colour = Colour::new_rgb_bytes(255, 255, 255);
    /// Slate grey behind initials when there is no avatar image
    pub const SLATE: Colour = Colour::new_rgb_bytes(0x94, 0xa3, 0xb8);
}
