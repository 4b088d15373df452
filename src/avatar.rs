use crate::layout::cover_fit;
use crate::BubbleError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use std::fmt::Display;
use std::future::Future;
use unicode_segmentation::UnicodeSegmentation;

/// What goes in the avatar circle. Decided once, before drawing starts: either a
/// decoded picture or, when there is no usable picture, the author's initials.
#[derive(Debug, Clone, PartialEq)]
pub enum Avatar {
    Image(RgbaImage),
    Initials(String),
}

/// Up to two uppercase initials: the first character of each of the first two
/// words of `name`
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.graphemes(true).next())
        .map(str::to_uppercase)
        .collect()
}

/// Decode an image from its encoded bytes (PNG, JPEG, WebP, ...)
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, BubbleError> {
    let format = image::guess_format(bytes)?;
    Ok(image::load_from_memory_with_format(bytes, format)?)
}

/// Scale `image` to fill a `size` × `size` square without distortion, cropping
/// the longer axis equally from both ends
pub fn cover_fit_image(source: &RgbaImage, size: u32) -> RgbaImage {
    if source.width() == 0 || source.height() == 0 {
        return RgbaImage::new(size, size);
    }
    let (x, y, w, h) = cover_fit((source.width() as f32, source.height() as f32), (1.0, 1.0));
    let w = (w.round() as u32).clamp(1, source.width());
    let h = (h.round() as u32).clamp(1, source.height());
    let x = (x.round() as u32).min(source.width() - w);
    let y = (y.round() as u32).min(source.height() - h);

    let cropped = imageops::crop_imm(source, x, y, w, h).to_image();
    imageops::resize(&cropped, size, size, FilterType::Triangle)
}

impl Avatar {
    /// Use `image` if there is one, otherwise the author's initials
    pub fn from_image(image: Option<DynamicImage>, author: &str) -> Avatar {
        match image {
            Some(image) if image.width() > 0 && image.height() > 0 => Avatar::Image(image.to_rgba8()),
            Some(_) => {
                log::warn!("avatar image is empty, using initials instead");
                Avatar::Initials(initials(author))
            }
            None => Avatar::Initials(initials(author)),
        }
    }

    /// Use the outcome of loading an avatar, falling back to initials when the
    /// load failed
    pub fn resolve<E: Display>(image: Option<Result<DynamicImage, E>>, author: &str) -> Avatar {
        match image {
            Some(Ok(image)) => Avatar::from_image(Some(image), author),
            Some(Err(e)) => {
                log::warn!("failed to load avatar, using initials instead: {e}");
                Avatar::Initials(initials(author))
            }
            None => Avatar::Initials(initials(author)),
        }
    }

    /// Decode encoded image bytes, falling back to initials when there are no
    /// bytes or they don't decode
    pub fn decode(bytes: Option<&[u8]>, author: &str) -> Avatar {
        Avatar::resolve(bytes.map(decode_image), author)
    }

    /// Wait for an avatar to be fetched, falling back to initials if fetching
    /// fails. Timeouts and cancellation are up to the future being awaited.
    pub async fn acquire<F, E>(fetch: F, author: &str) -> Avatar
    where
        F: Future<Output = Result<DynamicImage, E>>,
        E: Display,
    {
        Avatar::resolve(Some(fetch.await), author)
    }

    pub fn is_initials(&self) -> bool {
        matches!(self, Avatar::Initials(_))
    }
}
