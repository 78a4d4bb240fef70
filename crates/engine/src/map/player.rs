use crate::app::Vec2;

use super::SUB_TILES_PER_TILE;

const WALK_SPEED: f64 = 15.0;
const RUN_SPEED: f64 = 25.0;

/// The hero. Location and movement target are in sub-tiles.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    location: Vec2,
    target: Option<Vec2>,
    run_toggled: bool,
    is_running: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, location: Vec2) -> Self {
        Self {
            name: name.into(),
            location,
            target: None,
            run_toggled: false,
            is_running: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Vec2 {
        self.location
    }

    /// Location in whole tiles' coordinate space.
    pub fn tile_position(&self) -> (f64, f64) {
        (
            self.location.x / SUB_TILES_PER_TILE,
            self.location.y / SUB_TILES_PER_TILE,
        )
    }

    pub fn is_run_toggled(&self) -> bool {
        self.run_toggled
    }

    pub fn toggle_run_walk(&mut self) {
        self.run_toggled = !self.run_toggled;
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn set_is_running(&mut self, running: bool) {
        self.is_running = running;
    }

    /// Starts walking toward a world position given in tiles.
    pub fn move_to_world(&mut self, x: f64, y: f64) {
        self.target = Some(Vec2::new(x * SUB_TILES_PER_TILE, y * SUB_TILES_PER_TILE));
    }

    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }

    pub fn advance(&mut self, elapsed: f64) {
        let Some(target) = self.target else {
            return;
        };
        let speed = if self.is_running { RUN_SPEED } else { WALK_SPEED };
        let step = speed * elapsed.max(0.0);
        let distance = self.location.distance_to(target);
        if distance <= step {
            self.location = target;
            self.target = None;
            return;
        }
        let ratio = step / distance;
        self.location = Vec2::new(
            self.location.x + (target.x - self.location.x) * ratio,
            self.location.y + (target.y - self.location.y) * ratio,
        );
    }
}
