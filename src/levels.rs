//! Level id to scene directory table.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{SceneError, SceneResult};

/// `{ "levels": { "0": "assets/editor/saves/test4" } }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelIndex {
    /// Level id to scene directory.
    #[serde(default)]
    pub levels: BTreeMap<u32, PathBuf>,
}

impl LevelIndex {
    /// Reads the index at `path`.
    pub fn load(path: &Path) -> SceneResult<Self> {
        if !path.is_file() {
            return Err(SceneError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let txt = fs::read_to_string(path).map_err(|e| SceneError::io(path, e))?;
        let index: LevelIndex = serde_json::from_str(&txt).map_err(|source| SceneError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        info!("level index {} lists {} levels", path.display(), index.levels.len());
        Ok(index)
    }

    /// Scene directory of `level`.
    pub fn path_for(&self, level: u32) -> Option<&Path> {
        self.levels.get(&level).map(PathBuf::as_path)
    }

    /// Lowest level id, where a new game starts.
    pub fn first(&self) -> Option<u32> {
        self.levels.keys().next().copied()
    }
}
