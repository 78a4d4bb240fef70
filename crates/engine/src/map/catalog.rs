use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::MissileError;

/// Static properties of one missile type. Velocity is in sub-tiles per
/// second and range in sub-tiles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MissileDef {
    pub id: i32,
    pub name: String,
    pub velocity: f64,
    pub range: f64,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read missile catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse missile catalog {path} at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("missile catalog {path}: duplicate id {id}")]
    DuplicateId { path: PathBuf, id: i32 },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    missiles: Vec<MissileDef>,
}

const BUILTIN_MISSILES: &[(i32, &str, f64, f64)] = &[
    (0, "arrow", 100.0, 60.0),
    (1, "javelin", 80.0, 50.0),
    (6, "fire_arrow", 100.0, 60.0),
    (7, "ice_arrow", 100.0, 60.0),
    (22, "charged_bolt", 60.0, 40.0),
    (35, "ice_bolt", 80.0, 70.0),
    (40, "inferno", 50.0, 20.0),
    (59, "fire_bolt", 90.0, 75.0),
    (61, "glacial_spike", 80.0, 70.0),
    (70, "frost_nova", 60.0, 35.0),
];

/// Missile definitions keyed by id.
#[derive(Debug, Clone)]
pub struct MissileCatalog {
    defs: BTreeMap<i32, MissileDef>,
}

impl Default for MissileCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MissileCatalog {
    pub fn builtin() -> Self {
        let defs = BUILTIN_MISSILES
            .iter()
            .map(|(id, name, velocity, range)| {
                (
                    *id,
                    MissileDef {
                        id: *id,
                        name: (*name).to_string(),
                        velocity: *velocity,
                        range: *range,
                    },
                )
            })
            .collect();
        Self { defs }
    }

    pub fn get(&self, id: i32) -> Result<&MissileDef, MissileError> {
        self.defs.get(&id).ok_or(MissileError::UnknownMissile { id })
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Adds or replaces definitions from a JSON file of the form
    /// `{"missiles": [{"id": 59, "name": "...", "velocity": 90.0, "range": 75.0}]}`.
    pub fn merge_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let merged = self.merge_json(path, &raw)?;
        info!(path = %path.display(), merged, total = self.defs.len(), "missile_catalog_merged");
        Ok(merged)
    }

    fn merge_json(&mut self, path: &Path, raw: &str) -> Result<usize, CatalogError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let file: CatalogFile =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                let field = error.path().to_string();
                CatalogError::Parse {
                    path: path.to_path_buf(),
                    field,
                    source: error.into_inner(),
                }
            })?;

        let mut seen = BTreeSet::new();
        for def in &file.missiles {
            if !seen.insert(def.id) {
                return Err(CatalogError::DuplicateId {
                    path: path.to_path_buf(),
                    id: def.id,
                });
            }
        }
        let merged = file.missiles.len();
        for def in file.missiles {
            self.defs.insert(def.id, def);
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_default_missile() {
        let catalog = MissileCatalog::builtin();
        assert_eq!(catalog.get(59).expect("missile 59").name, "fire_bolt");
        assert_eq!(
            catalog.get(-1).expect_err("unknown"),
            MissileError::UnknownMissile { id: -1 }
        );
    }

    #[test]
    fn merge_file_overrides_and_adds_definitions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missiles.json");
        fs::write(
            &path,
            r#"{"missiles": [
                {"id": 59, "name": "big_bolt", "velocity": 40.0, "range": 10.0},
                {"id": 500, "name": "custom", "velocity": 1.0, "range": 2.0}
            ]}"#,
        )
        .expect("write");

        let mut catalog = MissileCatalog::builtin();
        let before = catalog.len();
        assert_eq!(catalog.merge_file(&path).expect("merge"), 2);

        assert_eq!(catalog.len(), before + 1);
        assert_eq!(catalog.get(59).expect("59").name, "big_bolt");
        assert_eq!(catalog.get(500).expect("500").range, 2.0);
    }

    #[test]
    fn parse_errors_carry_field_path() {
        let mut catalog = MissileCatalog::builtin();
        let error = catalog
            .merge_json(
                Path::new("missiles.json"),
                r#"{"missiles": [{"id": 1, "name": "a", "velocity": "fast", "range": 1.0}]}"#,
            )
            .expect_err("parse error");

        match error {
            CatalogError::Parse { field, .. } => assert_eq!(field, "missiles[0].velocity"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected_without_partial_merge() {
        let mut catalog = MissileCatalog::builtin();
        let error = catalog
            .merge_json(
                Path::new("missiles.json"),
                r#"{"missiles": [
                    {"id": 59, "name": "a", "velocity": 1.0, "range": 1.0},
                    {"id": 59, "name": "b", "velocity": 1.0, "range": 1.0}
                ]}"#,
            )
            .expect_err("duplicate");

        assert!(matches!(error, CatalogError::DuplicateId { id: 59, .. }));
        assert_eq!(catalog.get(59).expect("59").name, "fire_bolt");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let mut catalog = MissileCatalog::builtin();
        let error = catalog
            .merge_file(Path::new("definitely/not/here.json"))
            .expect_err("read error");
        assert!(matches!(error, CatalogError::Read { .. }));
    }
}
