use std::fmt;

use thiserror::Error;

use crate::app::{Color, Vec2};

use super::{EntityCommands, EntityId, MapEntity, MissileDef};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MissileError {
    #[error("unknown missile id {id}")]
    UnknownMissile { id: i32 },
    #[error("missile {id} has invalid {field}: {value}")]
    InvalidDefinition {
        id: i32,
        field: &'static str,
        value: f64,
    },
}

/// Callback run once when a missile has covered its range.
pub type FlightComplete = Box<dyn FnOnce(EntityId, &mut EntityCommands)>;

/// A projectile travelling in a straight line from its spawn point.
///
/// A missile stays put until it is given a bearing with [`Missile::set_radians`].
pub struct Missile {
    def_id: i32,
    location: Vec2,
    velocity: f64,
    range: f64,
    travelled: f64,
    radians: Option<f64>,
    on_flight_complete: Option<FlightComplete>,
}

impl Missile {
    /// Spawns at a whole sub-tile location using `def`'s velocity (sub-tiles
    /// per second) and range (sub-tiles).
    pub fn new(x: i32, y: i32, def: &MissileDef) -> Result<Self, MissileError> {
        for (field, value) in [("velocity", def.velocity), ("range", def.range)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MissileError::InvalidDefinition {
                    id: def.id,
                    field,
                    value,
                });
            }
        }
        Ok(Self {
            def_id: def.id,
            location: Vec2::new(f64::from(x), f64::from(y)),
            velocity: def.velocity,
            range: def.range,
            travelled: 0.0,
            radians: None,
            on_flight_complete: None,
        })
    }

    pub fn set_radians(
        &mut self,
        radians: f64,
        on_flight_complete: impl FnOnce(EntityId, &mut EntityCommands) + 'static,
    ) {
        self.radians = Some(radians);
        self.on_flight_complete = Some(Box::new(on_flight_complete));
    }

    pub fn def_id(&self) -> i32 {
        self.def_id
    }

    pub fn radians(&self) -> Option<f64> {
        self.radians
    }
}

impl fmt::Debug for Missile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Missile")
            .field("def_id", &self.def_id)
            .field("location", &self.location)
            .field("travelled", &self.travelled)
            .field("radians", &self.radians)
            .finish_non_exhaustive()
    }
}

impl MapEntity for Missile {
    fn location(&self) -> Vec2 {
        self.location
    }

    fn advance(&mut self, id: EntityId, elapsed: f64, commands: &mut EntityCommands) {
        let Some(radians) = self.radians else {
            return;
        };
        if self.travelled >= self.range {
            return;
        }
        let step = (self.velocity * elapsed.max(0.0)).min(self.range - self.travelled);
        self.location = Vec2::new(
            self.location.x + radians.cos() * step,
            self.location.y + radians.sin() * step,
        );
        self.travelled += step;
        if self.travelled >= self.range {
            if let Some(on_flight_complete) = self.on_flight_complete.take() {
                on_flight_complete(id, commands);
            }
        }
    }

    fn marker_color(&self) -> Color {
        [255, 140, 40, 255]
    }
}
