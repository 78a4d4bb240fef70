use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, warn};

use crate::sprite_keys::{sheet_key_segments, SpriteKeyError};

const PLACEHOLDER_PALETTE: [[u8; 4]; 6] = [
    [96, 64, 48, 255],
    [70, 78, 104, 255],
    [112, 52, 52, 255],
    [52, 92, 70, 255],
    [88, 80, 56, 255],
    [64, 64, 72, 255],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SpriteFrame {
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        Self {
            width,
            height,
            rgba: color.repeat(pixel_count),
        }
    }
}

/// An ordered set of animation frames decoded from one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    key: String,
    frames: Vec<SpriteFrame>,
}

impl SpriteSheet {
    pub fn new(key: impl Into<String>, frames: Vec<SpriteFrame>) -> Self {
        Self {
            key: key.into(),
            frames,
        }
    }

    /// Solid-colour frames with the given sizes, used when a resource is missing.
    pub fn placeholder(key: impl Into<String>, frame_sizes: &[(u32, u32)]) -> Self {
        let key = key.into();
        let palette_index = key.bytes().map(usize::from).sum::<usize>() % PLACEHOLDER_PALETTE.len();
        let color = PLACEHOLDER_PALETTE[palette_index];
        let frames = frame_sizes
            .iter()
            .map(|(width, height)| SpriteFrame::solid(*width, *height, color))
            .collect();
        Self { key, frames }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&SpriteFrame> {
        self.frames.get(index)
    }

    /// Size of frame `index`, or `(0, 0)` when the frame does not exist.
    pub fn frame_size(&self, index: usize) -> (u32, u32) {
        self.frame(index)
            .map(|frame| (frame.width, frame.height))
            .unwrap_or((0, 0))
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid sheet key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: SpriteKeyError,
    },
    #[error("no frames found in {dir}")]
    NoFrames { dir: PathBuf },
    #[error("failed to open frame {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode frame {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Loads sprite sheets from `<root>/sprites/<key>/<n>.png`.
///
/// Frames are numbered from 0 and must be contiguous. Loaded sheets are
/// cached by key for the lifetime of the loader.
#[derive(Debug)]
pub struct AssetLoader {
    root: PathBuf,
    cache: HashMap<String, Arc<SpriteSheet>>,
    warned_keys: HashSet<String>,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
            warned_keys: HashSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the cached sheet for `key`, loading it on first use.
    ///
    /// Missing or undecodable resources are replaced by a placeholder built
    /// from `fallback_sizes` and reported once per key.
    pub fn load_sheet(&mut self, key: &str, fallback_sizes: &[(u32, u32)]) -> Arc<SpriteSheet> {
        if let Some(sheet) = self.cache.get(key) {
            return Arc::clone(sheet);
        }
        let sheet = match self.try_load_sheet(key) {
            Ok(sheet) => {
                debug!(sheet = key, frames = sheet.frame_count(), "sprite_sheet_loaded");
                sheet
            }
            Err(error) => {
                if self.warned_keys.insert(key.to_string()) {
                    warn!(sheet = key, error = %error, "sprite_sheet_load_failed_using_placeholder");
                }
                SpriteSheet::placeholder(key, fallback_sizes)
            }
        };
        let sheet = Arc::new(sheet);
        self.cache.insert(key.to_string(), Arc::clone(&sheet));
        sheet
    }

    pub fn try_load_sheet(&self, key: &str) -> Result<SpriteSheet, AssetError> {
        let dir = self.sheet_dir(key)?;
        let mut frames = Vec::new();
        loop {
            let path = dir.join(format!("{}.png", frames.len()));
            if !path.is_file() {
                break;
            }
            frames.push(load_frame(&path)?);
        }
        if frames.is_empty() {
            return Err(AssetError::NoFrames { dir });
        }
        Ok(SpriteSheet::new(key, frames))
    }

    fn sheet_dir(&self, key: &str) -> Result<PathBuf, AssetError> {
        let segments = sheet_key_segments(key).map_err(|source| AssetError::InvalidKey {
            key: key.to_string(),
            source,
        })?;
        let mut dir = self.root.join("sprites");
        for segment in segments {
            dir.push(segment);
        }
        Ok(dir)
    }
}

fn load_frame(path: &Path) -> Result<SpriteFrame, AssetError> {
    let reader = ImageReader::open(path).map_err(|source| AssetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decoded.to_rgba8();
    Ok(SpriteFrame {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}
