//! Text wrapping and bubble geometry.
//!
//! Layout runs strictly forward: text is measured through a
//! [`TextMeasurer`](crate::TextMeasurer), [`wrap`] turns each block of text
//! into lines, and [`plan`] turns the lines plus a
//! [`BubbleConfig`](crate::BubbleConfig) into a [`BubbleGeometry`] holding the
//! position of everything that will be drawn. Nothing here touches pixels.
//!
//! # Example
//!
//! ```
//! use bubble_gen::{FontSpec, Measurement, Px, TextMeasurer};
//! use bubble_gen::layout::{wrap, WrapOptions};
//!
//! // every character is 10px wide
//! struct Fixed;
//! impl TextMeasurer for Fixed {
//!     fn measure(&self, _font: &FontSpec, text: &str) -> Measurement {
//!         Measurement { width: Px(text.chars().count() as f32 * 10.0), ..Default::default() }
//!     }
//! }
//!
//! let arena = id_arena::Arena::<bubble_gen::Font>::new();
//! let font = FontSpec::new(arena.next_id(), Px(16.0));
//! let lines = wrap(&Fixed, &font, "Hello, world!", &WrapOptions::new(Px(60.0)));
//! assert_eq!(lines, vec!["Hello,", "world!"]);
//! ```

mod geometry;
mod padding;
mod text;

pub use geometry::*;
pub use padding::*;
pub use text::*;
