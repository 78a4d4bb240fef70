use crate::app::Rect;
use crate::assets::SpriteSheet;

use super::font::{glyph_advance, glyph_rows, text_width_px, GLYPH_WIDTH};
use super::{Color, Surface, TextAlign};

/// Software surface over an RGBA8 frame buffer.
pub struct FrameSurface<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> FrameSurface<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let Some(byte_offset) = (y as usize)
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x as usize))
            .and_then(|pixel| pixel.checked_mul(4))
        else {
            return;
        };
        let Some(dst) = self.frame.get_mut(byte_offset..byte_offset + 4) else {
            return;
        };
        match color[3] {
            0 => {}
            255 => dst.copy_from_slice(&color),
            alpha => {
                let alpha = u16::from(alpha);
                for channel in 0..3 {
                    let src = u16::from(color[channel]);
                    let old = u16::from(dst[channel]);
                    dst[channel] = ((src * alpha + old * (255 - alpha)) / 255) as u8;
                }
                dst[3] = 255;
            }
        }
    }
}

impl Surface for FrameSurface<'_> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let start_x = rect.left.max(0);
        let start_y = rect.top.max(0);
        let end_x = rect.right().min(self.width as i32);
        let end_y = rect.bottom().min(self.height as i32);
        for y in start_y..end_y {
            for x in start_x..end_x {
                self.blend_pixel(x, y, color);
            }
        }
    }

    fn draw_sprite(&mut self, sheet: &SpriteSheet, frame: usize, x: i32, y: i32) {
        let Some(frame) = sheet.frame(frame) else {
            return;
        };
        let top = y - frame.height as i32;
        let row_stride = frame.width as usize * 4;
        for row in 0..frame.height as i32 {
            let dst_y = top + row;
            if dst_y < 0 || dst_y >= self.height as i32 {
                continue;
            }
            for col in 0..frame.width as i32 {
                let src = row as usize * row_stride + col as usize * 4;
                let Some(pixel) = frame.rgba.get(src..src + 4) else {
                    return;
                };
                self.blend_pixel(x + col, dst_y, [pixel[0], pixel[1], pixel[2], pixel[3]]);
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: i32, color: Color, align: TextAlign) {
        let scale = scale.max(1);
        let mut pen_x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - text_width_px(text, scale) / 2,
        };
        for ch in text.chars() {
            for (row_index, bits) in glyph_rows(ch).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    let left = pen_x + col * scale;
                    let top = y + row_index as i32 * scale;
                    self.fill_rect(Rect::new(left, top, scale, scale), color);
                }
            }
            pen_x += glyph_advance(scale);
        }
    }
}
