//! Audio store backed by a local directory

use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::AudioStore;
use async_trait::async_trait;

/// Generated audio files under one directory
#[derive(Debug, Clone)]
pub struct FsAudioStore {
    dir: PathBuf,
}

impl FsAudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, file_name: &str) -> Result<PathBuf, ApplicationError> {
        let name = Path::new(file_name);
        if name.components().count() != 1 || name.file_name().is_none() {
            return Err(ApplicationError::InvalidInput(format!(
                "Audio file name must not contain directories: {file_name}"
            )));
        }
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl AudioStore for FsAudioStore {
    async fn exists(&self, file_name: &str) -> Result<bool, ApplicationError> {
        let path = self.path_for(file_name)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| ApplicationError::Storage(format!("Cannot stat {}: {e}", path.display())))
    }

    async fn write(&self, file_name: &str, audio: Vec<u8>) -> Result<(), ApplicationError> {
        let path = self.path_for(file_name)?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ApplicationError::Storage(format!("Cannot create {}: {e}", self.dir.display()))
        })?;
        tokio::fs::write(&path, audio)
            .await
            .map_err(|e| ApplicationError::Storage(format!("Cannot write {}: {e}", path.display())))
    }
}
