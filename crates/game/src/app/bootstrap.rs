use engine::app::{Rect, SystemClock, Vec2};
use engine::map::{CatalogError, IsoMapRenderer, MapEngine, MissileCatalog, Player};
use engine::{resolve_app_paths, AssetLoader, LoopConfig, Screen, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{ConfigError, ControlsConfig};
use super::session::{GameWorld, GameplayScreen};

const HERO_NAME: &str = "Wanderer";
/// Spawn point in sub-tiles.
const HERO_SPAWN: Vec2 = Vec2::new(25.0, 25.0);
/// Named areas in tile coordinates; the first match wins where they touch.
const ZONES: [(&str, Rect); 3] = [
    ("Rogue Encampment", Rect::new(0, 0, 19, 19)),
    ("Blood Moor", Rect::new(20, -20, 40, 60)),
    ("Den of Evil", Rect::new(-20, 20, 19, 19)),
];

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) assets: AssetLoader,
    pub(crate) screen: Box<dyn Screen>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== ARPG Client Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "app_root_resolved");

    let controls_config = ControlsConfig::load_from_dir(&paths.config_dir)?;
    let mut missiles = MissileCatalog::builtin();
    if let Some(path) = controls_config.missile_catalog_path(&paths.config_dir) {
        missiles.merge_file(&path)?;
    }

    let world = build_world(&controls_config, missiles);
    let screen = GameplayScreen::new(world, &controls_config, Box::new(SystemClock));
    let config = LoopConfig {
        window_width: controls_config.window_width,
        window_height: controls_config.window_height,
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        assets: AssetLoader::new(paths.assets_dir),
        screen: Box::new(screen),
    })
}

fn build_world(config: &ControlsConfig, missiles: MissileCatalog) -> GameWorld {
    let mut map_engine = MapEngine::new();
    for (name, bounds) in ZONES {
        map_engine.add_zone(name, bounds);
    }
    GameWorld {
        hero: Player::new(HERO_NAME, HERO_SPAWN),
        map_engine,
        map_renderer: Box::new(IsoMapRenderer::new(
            config.window_width,
            config.window_height,
        )),
        missiles,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
