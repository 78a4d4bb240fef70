use std::sync::Arc;

use crate::app::Surface;
use crate::assets::SpriteSheet;

const UNTOGGLED_FRAME: usize = 0;
const TOGGLED_FRAME: usize = 1;

/// Two-state button; frame 0 is drawn when off, frame 1 when on.
///
/// Unlike sprites, a button is positioned by its top-left corner.
#[derive(Debug, Clone)]
pub struct ToggleButton {
    sheet: Arc<SpriteSheet>,
    toggled: bool,
    x: i32,
    y: i32,
}

impl ToggleButton {
    pub fn new(sheet: Arc<SpriteSheet>) -> Self {
        Self {
            sheet,
            toggled: false,
            x: 0,
            y: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.toggled = !self.toggled;
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn render(&self, target: &mut dyn Surface) {
        let frame = if self.toggled {
            TOGGLED_FRAME
        } else {
            UNTOGGLED_FRAME
        };
        let (_, height) = self.sheet.frame_size(frame);
        target.draw_sprite(&self.sheet, frame, self.x, self.y + height as i32);
    }
}
