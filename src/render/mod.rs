//! Pure image transforms applied to every thumbnail: downsize, tint, caption.

pub mod composite;
pub mod resize;
pub mod text;

pub use composite::draw_layer;
pub use resize::downsize;
pub use text::{TextLayoutEngine, draw_text, find_font_size};
