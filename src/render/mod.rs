//! Text layout, color and font handling for the date stamp.
//!
//! - [`place`] — where the text box goes for a given [`Anchor`]
//! - [`ColorSpec`] — named colors and pass-through color specifiers
//! - [`StampFont`] — TrueType font with a built-in bitmap fallback

mod color;
mod font;
mod glyphs;
mod layout;

pub use color::ColorSpec;
pub use font::StampFont;
pub use layout::{Anchor, MARGIN, Placement, place};
