use crate::app::{Color, Rect, Surface};

use super::{MapEngine, SUB_TILES_PER_TILE};

pub const TILE_WIDTH_PX: f64 = 80.0;
pub const TILE_HEIGHT_PX: f64 = 40.0;

const ENTITY_MARKER_HALF_SIZE: i32 = 3;

/// Horizontal placement of the map view's center on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewportAlign {
    #[default]
    Default,
    Left,
    Right,
}

/// Screen/world projection and the camera that drives it.
pub trait MapRenderer {
    /// Projects a screen pixel to world tile coordinates.
    fn screen_to_world(&self, x: i32, y: i32) -> (f64, f64);
    fn world_to_screen(&self, x: f64, y: f64) -> (i32, i32);
    /// Pans the camera by screen pixels.
    fn move_camera_by(&mut self, dx: f64, dy: f64);
    /// Centers the camera on a world tile position.
    fn set_camera_target(&mut self, x: f64, y: f64);
    fn viewport_default(&mut self);
    fn viewport_to_left(&mut self);
    fn viewport_to_right(&mut self);
    fn alignment(&self) -> ViewportAlign;
    fn set_screen_size(&mut self, width: u32, height: u32);
    fn render(&self, target: &mut dyn Surface, engine: &MapEngine);
}

/// 2:1 isometric projection with 80x40 pixel tiles.
///
/// The camera is stored in orthographic pixel space; the viewport center is
/// at `w/2`, `w/4` or `3w/4` depending on alignment.
#[derive(Debug, Clone)]
pub struct IsoMapRenderer {
    screen_width: u32,
    screen_height: u32,
    camera_x: f64,
    camera_y: f64,
    align: ViewportAlign,
}

impl IsoMapRenderer {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            camera_x: 0.0,
            camera_y: 0.0,
            align: ViewportAlign::Default,
        }
    }

    pub fn camera(&self) -> (f64, f64) {
        (self.camera_x, self.camera_y)
    }

    fn viewport_center(&self) -> (f64, f64) {
        let width = f64::from(self.screen_width);
        let center_x = match self.align {
            ViewportAlign::Default => width / 2.0,
            ViewportAlign::Left => width / 4.0,
            ViewportAlign::Right => width * 3.0 / 4.0,
        };
        (center_x, f64::from(self.screen_height) / 2.0)
    }
}

pub(crate) fn world_to_ortho(x: f64, y: f64) -> (f64, f64) {
    ((x - y) * TILE_WIDTH_PX, (x + y) * TILE_HEIGHT_PX)
}

pub(crate) fn ortho_to_world(x: f64, y: f64) -> (f64, f64) {
    let column = x / TILE_WIDTH_PX;
    let row = y / TILE_HEIGHT_PX;
    ((column + row) / 2.0, (row - column) / 2.0)
}

impl MapRenderer for IsoMapRenderer {
    fn screen_to_world(&self, x: i32, y: i32) -> (f64, f64) {
        let (center_x, center_y) = self.viewport_center();
        ortho_to_world(
            f64::from(x) - center_x + self.camera_x,
            f64::from(y) - center_y + self.camera_y,
        )
    }

    fn world_to_screen(&self, x: f64, y: f64) -> (i32, i32) {
        let (center_x, center_y) = self.viewport_center();
        let (ortho_x, ortho_y) = world_to_ortho(x, y);
        (
            (ortho_x - self.camera_x + center_x).round() as i32,
            (ortho_y - self.camera_y + center_y).round() as i32,
        )
    }

    fn move_camera_by(&mut self, dx: f64, dy: f64) {
        self.camera_x += dx;
        self.camera_y += dy;
    }

    fn set_camera_target(&mut self, x: f64, y: f64) {
        let (ortho_x, ortho_y) = world_to_ortho(x, y);
        self.camera_x = ortho_x;
        self.camera_y = ortho_y;
    }

    fn viewport_default(&mut self) {
        self.align = ViewportAlign::Default;
    }

    fn viewport_to_left(&mut self) {
        self.align = ViewportAlign::Left;
    }

    fn viewport_to_right(&mut self) {
        self.align = ViewportAlign::Right;
    }

    fn alignment(&self) -> ViewportAlign {
        self.align
    }

    fn set_screen_size(&mut self, width: u32, height: u32) {
        self.screen_width = width;
        self.screen_height = height;
    }

    fn render(&self, target: &mut dyn Surface, engine: &MapEngine) {
        for (_, entity) in engine.entities() {
            let location = entity.location();
            let (x, y) = self.world_to_screen(
                location.x / SUB_TILES_PER_TILE,
                location.y / SUB_TILES_PER_TILE,
            );
            draw_marker(target, x, y, entity.marker_color());
        }
    }
}

fn draw_marker(target: &mut dyn Surface, x: i32, y: i32, color: Color) {
    let size = ENTITY_MARKER_HALF_SIZE * 2;
    target.fill_rect(
        Rect::new(x - ENTITY_MARKER_HALF_SIZE, y - ENTITY_MARKER_HALF_SIZE, size, size),
        color,
    );
}
