mod font;
mod frame;
mod recording;
mod renderer;

use crate::app::Rect;
use crate::assets::SpriteSheet;

pub use font::text_width_px;
pub use frame::FrameSurface;
pub use recording::{DrawCall, RecordingSurface};
pub use renderer::Renderer;

pub type Color = [u8; 4];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Draw target for HUD widgets, panels and the world view.
///
/// Sprite positions are bottom-left anchored: `(x, y)` is the lower-left
/// corner of the frame, so a frame drawn at `y = height` sits on the bottom
/// edge of the surface. Text positions are top anchored.
pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_sprite(&mut self, sheet: &SpriteSheet, frame: usize, x: i32, y: i32);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: i32, color: Color, align: TextAlign);
}
