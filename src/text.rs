use ab_glyph::{point, Font, FontVec, Glyph, GlyphId, Point, PxScale, ScaleFont};
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};

#[derive(Clone, Debug)]
pub struct GlyphData {
    pub glyphs: Vec<Glyph>,
    pub width: u32,
    pub height: u32,
}

impl GlyphData {
    /// Size of the box the glyphs occupy once drawn, orientation included.
    pub fn extent(&self, rotated: bool) -> (u32, u32) {
        if rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

//把文本转换为字体，方便画图
pub fn text_to_glyphs(text: &str, font: &FontVec, scale: PxScale) -> GlyphData {
    let scaled_font = font.as_scaled(scale);

    let mut glyphs: Vec<Glyph> = vec![];
    layout_paragraph(scaled_font, point(0.0, 0.0), text, &mut glyphs);

    let glyphs_height = scaled_font.height().ceil() as u32;
    let glyphs_width = match (glyphs.first(), glyphs.last()) {
        (Some(first), Some(last)) => {
            let max_x = last.position.x + scaled_font.h_advance(last.id);
            (max_x - first.position.x).ceil().max(0.0) as u32
        }
        _ => 0,
    };

    GlyphData {
        glyphs,
        width: glyphs_width,
        height: glyphs_height,
    }
}

/// Visits every pixel covered by the glyphs, in coordinates local to the
/// glyph box. Rotation is a quarter turn counter-clockwise, so the text
/// reads bottom to top.
fn for_each_covered_pixel(
    glyph_data: &GlyphData,
    font: &FontVec,
    rotated: bool,
    mut plot: impl FnMut(u32, u32, f32),
) {
    let (width, height) = (i64::from(glyph_data.width), i64::from(glyph_data.height));

    for glyph in &glyph_data.glyphs {
        if let Some(outlined) = font.outline_glyph(glyph.clone()) {
            let bounds = outlined.px_bounds();

            outlined.draw(|x, y, coverage| {
                if coverage <= 0.0 {
                    return;
                }

                let local_x = bounds.min.x as i64 + i64::from(x);
                let local_y = bounds.min.y as i64 + i64::from(y);
                if local_x < 0 || local_y < 0 || local_x >= width || local_y >= height {
                    return;
                }

                let (final_x, final_y) = if rotated {
                    (local_y, width - 1 - local_x)
                } else {
                    (local_x, local_y)
                };
                plot(final_x as u32, final_y as u32, coverage.min(1.0));
            })
        }
    }
}

pub fn draw_glyphs_to_gray_buffer(
    buffer: &mut GrayImage,
    glyph_data: &GlyphData,
    font: &FontVec,
    (origin_x, origin_y): (u32, u32),
    rotated: bool,
) {
    for_each_covered_pixel(glyph_data, font, rotated, |x, y, _| {
        let (final_x, final_y) = (origin_x + x, origin_y + y);
        if final_x < buffer.width() && final_y < buffer.height() {
            buffer.put_pixel(final_x, final_y, Luma([1]));
        }
    })
}

pub fn draw_glyphs_to_rgba_buffer(
    buffer: &mut RgbaImage,
    glyph_data: &GlyphData,
    font: &FontVec,
    (origin_x, origin_y): (u32, u32),
    rotated: bool,
    pixel: Rgba<u8>,
) {
    for_each_covered_pixel(glyph_data, font, rotated, |x, y, coverage| {
        let (final_x, final_y) = (origin_x + x, origin_y + y);
        if final_x >= buffer.width() || final_y >= buffer.height() {
            return;
        }

        let px = buffer.get_pixel_mut(final_x, final_y);
        let alpha = px.0[3];
        px.apply2(&pixel, |old, new| {
            ((coverage * new as f32) + (1.0 - coverage) * old as f32) as u8
        });
        px.0[3] = alpha.max((coverage * 255.0) as u8);
    })
}

pub fn layout_paragraph<F, SF>(font: SF, position: Point, text: &str, target: &mut Vec<Glyph>)
where
    F: Font,
    SF: ScaleFont<F>,
{
    let v_advance = font.height() + font.line_gap();
    let mut caret = position + point(0.0, font.ascent());
    let mut last_glyph: Option<GlyphId> = None;
    for c in text.chars() {
        if c.is_control() {
            if c == '\n' {
                //进行换行
                caret = point(position.x, caret.y + v_advance);
            }
            continue;
        }

        let mut glyph = font.scaled_glyph(c);
        if let Some(previous) = last_glyph.take() {
            caret.x += font.kern(previous, glyph.id);
        }
        glyph.position = caret;
        last_glyph = Some(glyph.id);
        caret.x += font.h_advance(glyph.id);

        target.push(glyph);
    }
}
