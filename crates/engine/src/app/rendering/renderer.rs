use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::FrameSurface;

const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Fixed-resolution frame buffer scaled onto the window.
///
/// The logical size never changes; window resizes only rebuild the
/// surface texture.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    logical_width: u32,
    logical_height: u32,
}

impl Renderer {
    pub fn new(window: Arc<Window>, logical_width: u32, logical_height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(
            Arc::clone(&window),
            logical_width,
            logical_height,
            size.width,
            size.height,
        )?;
        Ok(Self {
            window,
            pixels,
            logical_width,
            logical_height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(
            Arc::clone(&self.window),
            self.logical_width,
            self.logical_height,
            width,
            height,
        )?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        logical_width: u32,
        logical_height: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width, surface_height, window);
        Pixels::new(logical_width, logical_height, surface)
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    /// Maps a physical window position to logical pixel coordinates,
    /// clamping positions that fall in the letterbox.
    pub fn window_pos_to_logical(&self, x: f64, y: f64) -> (i32, i32) {
        match self.pixels.window_pos_to_pixel((x as f32, y as f32)) {
            Ok((px, py)) => (px as i32, py as i32),
            Err((px, py)) => (
                (px as i32).clamp(0, self.logical_width as i32 - 1),
                (py as i32).clamp(0, self.logical_height as i32 - 1),
            ),
        }
    }

    pub fn draw_frame(&mut self, draw: impl FnOnce(&mut FrameSurface<'_>)) -> Result<(), Error> {
        let (width, height) = (self.logical_width, self.logical_height);
        {
            let mut surface = FrameSurface::new(self.pixels.frame_mut(), width, height);
            surface.clear(CLEAR_COLOR);
            draw(&mut surface);
        }
        self.pixels.render()
    }
}
