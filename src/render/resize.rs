use image::{RgbaImage, imageops::FilterType};

/// Downsize `img` keeping its aspect ratio. A bound of 0 leaves that axis unconstrained.
///
/// Width is fitted first; the resulting height is then checked against `max_h`. The image is
/// never enlarged.
pub fn downsize(img: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (src_w, src_h) = img.dimensions();
    let (w, h) = downsized_dimensions(src_w, src_h, max_w, max_h);
    if (w, h) == (src_w, src_h) {
        return img.clone();
    }
    tracing::trace!(src_w, src_h, w, h, "downsize");
    image::imageops::resize(img, w, h, FilterType::CatmullRom)
}

/// Target size computed by [`downsize`].
pub fn downsized_dimensions(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let mut w = f64::from(width);
    let mut h = f64::from(height);
    if max_w > 0 && w > f64::from(max_w) {
        h *= f64::from(max_w) / w;
        w = f64::from(max_w);
    }
    if max_h > 0 && h > f64::from(max_h) {
        w *= f64::from(max_h) / h;
        h = f64::from(max_h);
    }
    (round_dim(w), round_dim(h))
}

fn round_dim(v: f64) -> u32 {
    (v.round_ties_even() as u32).max(1)
}
