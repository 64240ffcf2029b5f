//! Audio store port - generated audio files addressed by file name

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the generated audio directory
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AudioStore: Send + Sync {
    /// Whether `file_name` already exists
    async fn exists(&self, file_name: &str) -> Result<bool, ApplicationError>;

    /// Write `audio` to `file_name`, creating the directory if needed
    async fn write(&self, file_name: &str, audio: Vec<u8>) -> Result<(), ApplicationError>;
}
