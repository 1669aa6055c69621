//! Caption randomly picked background images with auto-fitted, outlined text.
//!
//! A run reads a directory of images and a file of sentences, then for every sentence picks an
//! image at random, downsizes it, tints it with a translucent layer and draws the sentence
//! centered on top. See [`generate`].
#![forbid(unsafe_code)]

pub mod error;
pub mod image_bank;
pub mod pipeline;
pub mod render;
pub mod sentence_bank;

pub use error::{ThumbnailError, ThumbnailResult};
pub use image_bank::{DecodeCache, ImageBank, Images};
pub use pipeline::{GenerateOpts, caption_image, generate, generate_with};
pub use render::{TextLayoutEngine, downsize, draw_layer, draw_text, find_font_size};
pub use sentence_bank::SentenceBank;
