use tracing::debug;

use crate::app::{Color, Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Anything the map engine advances and the map renderer draws.
pub trait MapEntity {
    /// Location in sub-tiles.
    fn location(&self) -> Vec2;
    fn advance(&mut self, id: EntityId, elapsed: f64, commands: &mut EntityCommands);
    fn marker_color(&self) -> Color {
        [200, 200, 200, 255]
    }
}

/// Structural changes requested by entities while they are being advanced.
/// Applied by the engine once the advance pass has finished.
#[derive(Debug, Default)]
pub struct EntityCommands {
    removals: Vec<EntityId>,
}

impl EntityCommands {
    pub fn remove(&mut self, id: EntityId) {
        self.removals.push(id);
    }
}

/// Named rectangle of the map, in tile coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub name: String,
    pub bounds: Rect,
}

#[derive(Default)]
pub struct MapEngine {
    allocator: EntityIdAllocator,
    entities: Vec<(EntityId, Box<dyn MapEntity>)>,
    zones: Vec<Zone>,
}

impl MapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: Box<dyn MapEntity>) -> EntityId {
        let id = self.allocator.allocate();
        self.entities.push((id, entity));
        id
    }

    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let before = self.entities.len();
        self.entities.retain(|(entity_id, _)| *entity_id != id);
        before != self.entities.len()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|(entity_id, _)| *entity_id == id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &dyn MapEntity)> {
        self.entities
            .iter()
            .map(|(id, entity)| (*id, entity.as_ref()))
    }

    /// Advances every entity in insertion order, then applies the removals
    /// they requested.
    pub fn advance(&mut self, elapsed: f64) {
        let mut commands = EntityCommands::default();
        for (id, entity) in &mut self.entities {
            entity.advance(*id, elapsed, &mut commands);
        }

        if commands.removals.is_empty() {
            return;
        }
        let mut removals = commands.removals;
        removals.sort();
        removals.dedup();
        self.entities
            .retain(|(id, _)| removals.binary_search(id).is_err());
        debug!(
            removed = removals.len(),
            entity_count = self.entities.len(),
            "map_entities_removed"
        );
    }

    pub fn add_zone(&mut self, name: impl Into<String>, bounds: Rect) {
        self.zones.push(Zone {
            name: name.into(),
            bounds,
        });
    }

    /// First zone, in insertion order, containing the tile position.
    pub fn zone_at(&self, x: f64, y: f64) -> Option<&Zone> {
        let (tile_x, tile_y) = (x.floor() as i32, y.floor() as i32);
        self.zones
            .iter()
            .find(|zone| zone.bounds.contains(tile_x, tile_y))
    }
}
