use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::app::Color;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use super::controls::{ActionableRegion, ActionableType, DEFAULT_REGIONS};

pub(crate) const CONTROLS_CONFIG_FILE: &str = "controls.json";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path} at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config {path} at {field}: {reason}")]
    Invalid {
        path: PathBuf,
        field: &'static str,
        reason: String,
    },
}

/// Region override entry. `kind` is the raw actionable id so that files
/// written for newer clients still load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawRegion {
    pub(crate) kind: i64,
    pub(crate) left: i32,
    pub(crate) top: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ControlsConfig {
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) mouse_action_threshold_secs: f64,
    pub(crate) camera_pan_speed: f64,
    pub(crate) default_missile_id: i32,
    pub(crate) missile_target_scale: f64,
    pub(crate) zone_text_color: Color,
    pub(crate) zone_text_hide_secs: f64,
    pub(crate) actionable_regions: Option<Vec<RawRegion>>,
    /// Extra missile definitions, relative to the config directory.
    pub(crate) missile_catalog: Option<PathBuf>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            mouse_action_threshold_secs: 0.25,
            camera_pan_speed: 8.0,
            default_missile_id: 59,
            missile_target_scale: 5.0,
            zone_text_color: [255, 88, 82, 255],
            zone_text_hide_secs: 5.0,
            actionable_regions: None,
            missile_catalog: None,
        }
    }
}

impl ControlsConfig {
    /// Reads `<config_dir>/controls.json`, falling back to defaults when the
    /// file does not exist.
    pub(crate) fn load_from_dir(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONTROLS_CONFIG_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "controls_config_missing_using_defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let config = Self::parse(&path, &raw)?;
        info!(path = %path.display(), "controls_config_loaded");
        Ok(config)
    }

    fn parse(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: Self =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                let field = error.path().to_string();
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    field,
                    source: error.into_inner(),
                }
            })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            field,
            reason,
        };
        if self.window_width == 0 || self.window_height == 0 {
            return Err(invalid(
                "window_width",
                format!(
                    "window size must be non-zero, got {}x{}",
                    self.window_width, self.window_height
                ),
            ));
        }
        for (field, value) in [
            ("mouse_action_threshold_secs", self.mouse_action_threshold_secs),
            ("camera_pan_speed", self.camera_pan_speed),
            ("missile_target_scale", self.missile_target_scale),
            ("zone_text_hide_secs", self.zone_text_hide_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(
                    field,
                    format!("expected a finite non-negative number, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// The region table for this session. Override entries with an unknown
    /// kind are logged and skipped.
    pub(crate) fn regions(&self) -> Vec<ActionableRegion> {
        let Some(raw_regions) = &self.actionable_regions else {
            return DEFAULT_REGIONS.to_vec();
        };
        raw_regions
            .iter()
            .filter_map(|raw| match ActionableType::from_id(raw.kind) {
                Some(kind) => Some(ActionableRegion::new(
                    kind, raw.left, raw.top, raw.width, raw.height,
                )),
                None => {
                    warn!(kind = raw.kind, "unrecognized actionable type");
                    None
                }
            })
            .collect()
    }

    pub(crate) fn missile_catalog_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.missile_catalog
            .as_ref()
            .map(|relative| config_dir.join(relative))
    }
}
