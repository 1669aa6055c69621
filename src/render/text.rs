use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::{
    error::{ThumbnailError, ThumbnailResult},
    render::composite::over_in_place,
};

/// Vertical gap between lines of a multi-line caption, in pixels.
pub const LINE_SPACING: f64 = 40.0;
/// Share of the image width and height the caption may cover.
pub const FILL_RATIO: f64 = 0.9;
pub const INITIAL_FONT_SIZE: u32 = 512;
pub const MAX_FONT_SIZE: u32 = 4096;

const OUTLINE_OFFSETS: [(f64, f64); 8] = [
    (-1.0, -1.0),
    (-1.0, 0.0),
    (-1.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (1.0, -1.0),
    (1.0, 0.0),
    (1.0, 1.0),
];

/// A loaded font plus the Parley contexts used to shape and measure text with it.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    font_data: vello_cpu::peniko::FontData,
}

/// One shaped line of a caption.
pub struct LineLayout {
    pub layout: parley::Layout<()>,
    pub width: f64,
    pub height: f64,
}

/// A caption shaped at a fixed font size, lines stacked with [`LINE_SPACING`].
pub struct TextBlock {
    pub lines: Vec<LineLayout>,
    pub width: f64,
    pub height: f64,
}

impl TextLayoutEngine {
    pub fn from_file(path: impl AsRef<Path>) -> ThumbnailResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| ThumbnailError::input(format!("read font '{}': {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(font_bytes: Vec<u8>) -> ThumbnailResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ThumbnailError::input("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ThumbnailError::input("registered font family has no name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_data,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shape every line of `text` at `size_px`.
    pub fn layout_block(&mut self, text: &str, size_px: u32) -> ThumbnailResult<TextBlock> {
        if size_px == 0 {
            return Err(ThumbnailError::render("font size must be > 0"));
        }

        let mut lines = Vec::new();
        for line in text.split('\n') {
            lines.push(self.layout_line(line, size_px as f32));
        }

        let width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
        let gaps = lines.len().saturating_sub(1) as f64;
        let height = lines.iter().map(|l| l.height).sum::<f64>() + LINE_SPACING * gaps;
        Ok(TextBlock {
            lines,
            width,
            height,
        })
    }

    /// Bounding box of `text` at `size_px`; a size of 0 measures as empty.
    pub fn measure(&mut self, text: &str, size_px: u32) -> ThumbnailResult<(f64, f64)> {
        if size_px == 0 {
            return Ok((0.0, 0.0));
        }
        let block = self.layout_block(text, size_px)?;
        Ok((block.width, block.height))
    }

    fn layout_line(&mut self, line: &str, size_px: f32) -> LineLayout {
        // Blank lines still take up a line's height.
        let shaped = if line.is_empty() { " " } else { line };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, shaped, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(shaped);
        layout.break_all_lines(None);

        let mut width = 0.0f64;
        let mut height = 0.0f64;
        for l in layout.lines() {
            let m = l.metrics();
            width = width.max(f64::from(m.advance));
            height += f64::from(m.ascent + m.descent + m.leading);
        }
        if line.is_empty() {
            width = 0.0;
        }

        LineLayout {
            layout,
            width,
            height,
        }
    }
}

/// Largest font size at which `text` covers less than [`FILL_RATIO`] of both image axes.
///
/// The size is halved from [`INITIAL_FONT_SIZE`] until the text fits, then grown one step at a
/// time until it no longer fits, and finally stepped back by one.
pub fn find_font_size(
    engine: &mut TextLayoutEngine,
    img_w: u32,
    img_h: u32,
    text: &str,
) -> ThumbnailResult<u32> {
    let max_w = f64::from(img_w) * FILL_RATIO;
    let max_h = f64::from(img_h) * FILL_RATIO;

    let mut size = INITIAL_FONT_SIZE;
    // Seeded with the image size so the first halving always happens.
    let (mut w, mut h) = (f64::from(img_w), f64::from(img_h));
    while size > 0 && (w > max_w || h > max_h) {
        size = (f64::from(size) / 2.0).round_ties_even() as u32;
        (w, h) = engine.measure(text, size)?;
    }

    while w < max_w && h < max_h {
        if size >= MAX_FONT_SIZE {
            return Err(ThumbnailError::render(format!(
                "font size search did not converge below {MAX_FONT_SIZE}"
            )));
        }
        size += 1;
        (w, h) = engine.measure(text, size)?;
    }

    let size = size.saturating_sub(1);
    if size == 0 {
        return Err(ThumbnailError::render(format!(
            "text does not fit a {img_w}x{img_h} image at any font size"
        )));
    }
    tracing::debug!(img_w, img_h, size, "font size found");
    Ok(size)
}

/// Copy of `img` with `text` auto-sized and centered, outlined when `border_color` is set.
pub fn draw_text(
    img: &RgbaImage,
    engine: &mut TextLayoutEngine,
    text: &str,
    color: Rgba<u8>,
    border_color: Option<Rgba<u8>>,
) -> ThumbnailResult<RgbaImage> {
    let (w, h) = img.dimensions();
    let width_u16: u16 = w
        .try_into()
        .map_err(|_| ThumbnailError::render("image width exceeds u16"))?;
    let height_u16: u16 = h
        .try_into()
        .map_err(|_| ThumbnailError::render("image height exceeds u16"))?;

    let size = find_font_size(engine, w, h, text)?;
    let block = engine.layout_block(text, size)?;
    let x0 = (f64::from(w) - block.width) / 2.0;
    let y0 = (f64::from(h) - block.height) / 2.0;

    let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
    if let Some(border) = border_color {
        ctx.set_paint(paint_color(border));
        for (dx, dy) in OUTLINE_OFFSETS {
            fill_block(&mut ctx, &engine.font_data, &block, x0 + dx, y0 + dy);
        }
    }
    ctx.set_paint(paint_color(color));
    fill_block(&mut ctx, &engine.font_data, &block, x0, y0);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
    ctx.render_to_pixmap(&mut pixmap);

    let mut rgba = img.as_raw().clone();
    over_in_place(&mut rgba, pixmap.data_as_u8_slice())?;

    RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| ThumbnailError::render("captioned image byte length mismatch"))
}

fn fill_block(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    block: &TextBlock,
    x0: f64,
    y0: f64,
) {
    let mut top = y0;
    for line in &block.lines {
        let left = x0 + (block.width - line.width) / 2.0;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((left, top)));

        for l in line.layout.lines() {
            for item in l.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: u32::from(g.id),
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        top += line.height + LINE_SPACING;
    }
}

fn paint_color(c: Rgba<u8>) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.0;
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}
