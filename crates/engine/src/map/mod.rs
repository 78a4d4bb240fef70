//! World-side collaborators of the HUD: the map view, the entity container,
//! the hero and missiles.
//!
//! World coordinates are in tiles. Entity locations are in sub-tiles,
//! [`SUB_TILES_PER_TILE`] to a tile.

mod catalog;
mod engine;
mod missile;
mod player;
mod renderer;

pub use catalog::{CatalogError, MissileCatalog, MissileDef};
pub use engine::{EntityCommands, EntityId, MapEngine, MapEntity, Zone};
pub use missile::{FlightComplete, Missile, MissileError};
pub use player::Player;
pub use renderer::{IsoMapRenderer, MapRenderer, ViewportAlign, TILE_HEIGHT_PX, TILE_WIDTH_PX};

pub const SUB_TILES_PER_TILE: f64 = 5.0;
