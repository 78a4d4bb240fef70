use crate::app::Rect;
use crate::assets::SpriteSheet;

use super::{Color, Surface, TextAlign};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Rect {
        rect: Rect,
        color: Color,
    },
    Sprite {
        sheet: String,
        frame: usize,
        x: i32,
        y: i32,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        align: TextAlign,
    },
}

/// Headless surface that records draw calls in issue order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn sprite_calls(&self) -> impl Iterator<Item = (&str, usize, i32, i32)> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Sprite { sheet, frame, x, y } => Some((sheet.as_str(), *frame, *x, *y)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::Rect { rect, color });
    }

    fn draw_sprite(&mut self, sheet: &SpriteSheet, frame: usize, x: i32, y: i32) {
        self.calls.push(DrawCall::Sprite {
            sheet: sheet.key().to_string(),
            frame,
            x,
            y,
        });
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        _scale: i32,
        _color: Color,
        align: TextAlign,
    ) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            align,
        });
    }
}
