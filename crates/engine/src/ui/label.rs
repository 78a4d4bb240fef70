use crate::app::{Color, Surface, TextAlign};

const DEFAULT_COLOR: Color = [255, 255, 255, 255];

#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    color: Color,
    align: TextAlign,
    scale: i32,
    x: i32,
    y: i32,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: DEFAULT_COLOR,
            align: TextAlign::Left,
            scale: 1,
            x: 0,
            y: 0,
        }
    }
}

impl Label {
    pub fn new(scale: i32, color: Color, align: TextAlign) -> Self {
        Self {
            color,
            align,
            scale: scale.max(1),
            ..Self::default()
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn render(&self, target: &mut dyn Surface) {
        if self.text.is_empty() {
            return;
        }
        target.draw_text(
            &self.text,
            self.x,
            self.y,
            self.scale,
            self.color,
            self.align,
        );
    }
}
