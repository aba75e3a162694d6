use nebula_types::{Level, LevelId};
use tracing::debug;

use crate::{CoreError, CoreResult};

/// Number of campaign levels every progress record tracks.
pub const LEVEL_COUNT: usize = 50;

const DEFAULT_LEVELS: &str = include_str!("../data/levels.json");

/// Read-only catalog of the campaign levels, ordered by id.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Load the catalog shipped with the crate.
    pub fn load_default() -> CoreResult<Self> {
        Self::from_json(DEFAULT_LEVELS)
    }

    /// Parse a catalog from a JSON array of level descriptors.
    ///
    /// Ids must run 1..=50 in order so that `levels[i]` is level `i + 1`.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let levels: Vec<Level> = serde_json::from_str(json)
            .map_err(|e| CoreError::Catalog(format!("malformed level data: {}", e)))?;

        if levels.len() != LEVEL_COUNT {
            return Err(CoreError::Catalog(format!(
                "expected {} levels, found {}",
                LEVEL_COUNT,
                levels.len()
            )));
        }

        for (index, level) in levels.iter().enumerate() {
            let expected = index as LevelId + 1;
            if level.id != expected {
                return Err(CoreError::Catalog(format!(
                    "level at position {} has id {}, expected {}",
                    index, level.id, expected
                )));
            }
        }

        debug!("Loaded level catalog with {} levels", levels.len());
        Ok(Self { levels })
    }

    pub fn all(&self) -> &[Level] {
        &self.levels
    }

    pub fn get(&self, level_id: LevelId) -> Option<&Level> {
        if level_id < 1 {
            return None;
        }
        self.levels.get(level_id as usize - 1)
    }

    /// Like [`LevelCatalog::get`] but reports unknown ids as `LevelNotFound`.
    pub fn require(&self, level_id: LevelId) -> CoreResult<&Level> {
        self.get(level_id)
            .ok_or(CoreError::LevelNotFound { level_id })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
