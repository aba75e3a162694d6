use nebula_types::LevelId;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Level {level_id} not found")]
    LevelNotFound { level_id: LevelId },
    #[error("Invalid level catalog: {0}")]
    Catalog(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::LevelNotFound { .. })
    }
}
