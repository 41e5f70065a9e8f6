use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::map::{landmark_positions, CoastlineMap, Position};

/// JSON view of a rendered map, written with `--snapshot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub image_path: PathBuf,
    pub player: Position,
    pub width: u32,
    pub height: u32,
    pub landmarks: Vec<Position>,
    pub rows: Vec<String>,
}

impl MapSnapshot {
    pub fn capture(map: &CoastlineMap, image_path: &Path, player: Position) -> Self {
        let landmarks = landmark_positions(map.width(), map.height())
            .into_iter()
            .filter(|pos| map.in_bounds(pos.x, pos.y))
            .collect();
        Self {
            image_path: image_path.to_path_buf(),
            player,
            width: map.width(),
            height: map.height(),
            landmarks,
            rows: map.render_rows(player),
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), "wrote map snapshot");
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
