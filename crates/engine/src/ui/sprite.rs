use std::sync::Arc;

use crate::app::Surface;
use crate::assets::SpriteSheet;

/// A positioned view onto one frame of a sprite sheet.
#[derive(Debug, Clone)]
pub struct Sprite {
    sheet: Arc<SpriteSheet>,
    current_frame: usize,
    x: i32,
    y: i32,
}

impl Sprite {
    pub fn new(sheet: Arc<SpriteSheet>) -> Self {
        Self {
            sheet,
            current_frame: 0,
            x: 0,
            y: 0,
        }
    }

    /// Selects frame `index`; out-of-range indices keep the current frame.
    pub fn set_current_frame(&mut self, index: usize) -> bool {
        if index >= self.sheet.frame_count() {
            return false;
        }
        self.current_frame = index;
        true
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn frame_count(&self) -> usize {
        self.sheet.frame_count()
    }

    pub fn current_frame_size(&self) -> (u32, u32) {
        self.sheet.frame_size(self.current_frame)
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn render(&self, target: &mut dyn Surface) {
        target.draw_sprite(&self.sheet, self.current_frame, self.x, self.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{DrawCall, RecordingSurface};

    #[test]
    fn out_of_range_frame_is_rejected() {
        let sheet = Arc::new(SpriteSheet::placeholder("s", &[(4, 4), (6, 2)]));
        let mut sprite = Sprite::new(sheet);

        assert!(sprite.set_current_frame(1));
        assert!(!sprite.set_current_frame(2));
        assert_eq!(sprite.current_frame(), 1);
        assert_eq!(sprite.current_frame_size(), (6, 2));
    }

    #[test]
    fn render_issues_one_sprite_call_at_position() {
        let sheet = Arc::new(SpriteSheet::placeholder("s", &[(4, 4)]));
        let mut sprite = Sprite::new(sheet);
        sprite.set_position(12, 40);
        let mut surface = RecordingSurface::new(100, 100);

        sprite.render(&mut surface);

        assert_eq!(
            surface.calls(),
            &[DrawCall::Sprite {
                sheet: "s".to_string(),
                frame: 0,
                x: 12,
                y: 40,
            }]
        );
    }
}
