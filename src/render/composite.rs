use image::{Rgba, RgbaImage};

use crate::error::{ThumbnailError, ThumbnailResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Composite a premultiplied RGBA8 buffer over a straight-alpha buffer of the same length.
///
/// Pixels where `src` is fully transparent are left byte-for-byte untouched.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> ThumbnailResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ThumbnailError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let below = premultiply(Rgba([d[0], d[1], d[2], d[3]]));
        let out = unpremultiply(over(below, [s[0], s[1], s[2], s[3]]));
        d.copy_from_slice(&out.0);
    }
    Ok(())
}

pub fn premultiply(px: Rgba<u8>) -> PremulRgba8 {
    let [r, g, b, a] = px.0;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let a16 = u16::from(a);
    [
        mul_div255(u16::from(r), a16),
        mul_div255(u16::from(g), a16),
        mul_div255(u16::from(b), a16),
        a,
    ]
}

pub fn unpremultiply(px: PremulRgba8) -> Rgba<u8> {
    let a = px[3];
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let a32 = u32::from(a);
    let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a32 / 2) / a32).min(255) as u8 };
    Rgba([un(px[0]), un(px[1]), un(px[2]), a])
}

/// Alpha-composite a uniform `color` layer over a copy of `img`.
pub fn draw_layer(img: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let mut out = img.clone();
    if color.0[3] == 0 {
        return out;
    }
    let layer = premultiply(color);
    for px in out.pixels_mut() {
        *px = unpremultiply(over(premultiply(*px), layer));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
