use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::{Rgba, RgbaImage};
use rand::SeedableRng;

use crate::{
    error::ThumbnailResult,
    image_bank::ImageBank,
    render::{TextLayoutEngine, downsize, draw_layer, draw_text},
    sentence_bank::SentenceBank,
};

pub const MAX_WIDTH: u32 = 1200;
pub const MAX_HEIGHT: u32 = 1200;
pub const OVERLAY_RGBA: Rgba<u8> = Rgba([96, 126, 180, 190]);
pub const TEXT_RGBA: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BORDER_RGBA: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Parameters shared by every thumbnail of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOpts {
    pub max_width: u32,
    pub max_height: u32,
    pub overlay: Rgba<u8>,
    pub text_color: Rgba<u8>,
    /// `None` draws the caption without an outline.
    pub border_color: Option<Rgba<u8>>,
    /// Seed for image selection; `None` picks from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GenerateOpts {
    fn default() -> Self {
        Self {
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            overlay: OVERLAY_RGBA,
            text_color: TEXT_RGBA,
            border_color: Some(BORDER_RGBA),
            seed: None,
        }
    }
}

/// Write `image_{i}.png` into `output` for every sentence `i`, each captioned over a random
/// image from `images`. Returns the written paths in sentence order.
pub fn generate(
    images: impl AsRef<Path>,
    sentences: impl AsRef<Path>,
    font: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> ThumbnailResult<Vec<PathBuf>> {
    generate_with(
        images.as_ref(),
        sentences.as_ref(),
        font.as_ref(),
        output.as_ref(),
        &GenerateOpts::default(),
    )
}

#[tracing::instrument(skip(opts))]
pub fn generate_with(
    images: &Path,
    sentences: &Path,
    font: &Path,
    output: &Path,
    opts: &GenerateOpts,
) -> ThumbnailResult<Vec<PathBuf>> {
    let mut bank = ImageBank::load(images)?;
    let sentences = SentenceBank::load(sentences)?;
    let mut engine = TextLayoutEngine::from_file(font)?;

    let mut rng = match opts.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };

    let mut written = Vec::with_capacity(sentences.len());
    for (i, sentence) in sentences.iter().enumerate() {
        let img = bank.random_with(&mut rng)?;
        let captioned = caption_image(&img, sentence, &mut engine, opts)?;

        let out_path = output.join(format!("image_{i}.png"));
        captioned
            .save_with_format(&out_path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", out_path.display()))?;
        tracing::info!(path = %out_path.display(), "wrote thumbnail");
        written.push(out_path);
    }

    Ok(written)
}

/// Downsize, tint and caption one image.
pub fn caption_image(
    img: &RgbaImage,
    text: &str,
    engine: &mut TextLayoutEngine,
    opts: &GenerateOpts,
) -> ThumbnailResult<RgbaImage> {
    let img = downsize(img, opts.max_width, opts.max_height);
    let img = draw_layer(&img, opts.overlay);
    draw_text(&img, engine, text, opts.text_color, opts.border_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_opts_use_fixed_constants() {
        let opts = GenerateOpts::default();
        assert_eq!((opts.max_width, opts.max_height), (1200, 1200));
        assert_eq!(opts.overlay.0, [96, 126, 180, 190]);
        assert_eq!(opts.text_color.0, [255, 255, 255, 255]);
        assert_eq!(opts.border_color, Some(Rgba([0, 0, 0, 255])));
        assert_eq!(opts.seed, None);
    }
}
