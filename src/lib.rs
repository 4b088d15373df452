mod avatar;
pub use avatar::*;

mod bubble;
pub use bubble::*;

mod canvas;
pub use canvas::*;

mod colour;
pub use colour::*;

mod compositor;
pub use compositor::*;

mod config;
pub use config::*;

mod font;
pub use font::*;

/// Text wrapping and the geometry of a bubble, before anything is drawn
pub mod layout;

mod measure;
pub use measure::*;

mod rect;
pub use rect::*;

mod style;
pub use style::*;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export of the image crate, whose types appear in the public API
pub use image;
