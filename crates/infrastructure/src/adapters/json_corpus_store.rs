//! Corpus store backed by a JSON file

use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::CorpusStore;
use async_trait::async_trait;
use domain::DialogueCorpus;
use tracing::{debug, instrument};

/// Reads and rewrites the dialogue corpus file
#[derive(Debug, Clone)]
pub struct JsonCorpusStore {
    path: PathBuf,
}

impl JsonCorpusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CorpusStore for JsonCorpusStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<DialogueCorpus, ApplicationError> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ApplicationError::Storage(format!(
                    "Corpus file not found: {}",
                    self.path.display()
                ))
            } else {
                ApplicationError::Storage(format!("Cannot read {}: {e}", self.path.display()))
            }
        })?;

        let corpus = DialogueCorpus::from_json(&text)?;
        debug!(lines = corpus.line_count(), "Corpus loaded");
        Ok(corpus)
    }

    #[instrument(skip(self, corpus), fields(path = %self.path.display()))]
    async fn save(&self, corpus: &DialogueCorpus) -> Result<(), ApplicationError> {
        let json = corpus.to_pretty_json()?;

        // Write next to the target, then rename over it
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json.as_bytes())
            .await
            .map_err(|e| ApplicationError::Storage(format!("Cannot write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            ApplicationError::Storage(format!("Cannot replace {}: {e}", self.path.display()))
        })?;

        debug!("Corpus saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CORPUS: &str = r#"{
  "conversations": [
    {
      "id": 1,
      "title": "Chào hỏi",
      "dialogues": [
        {"id": 1, "text": "Xin chào", "language": "vi", "speaker": "A"}
      ]
    }
  ]
}"#;

    #[tokio::test]
    async fn load_and_save_round_trip_keeps_unicode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dialogues.json");
        std::fs::write(&path, CORPUS).unwrap();

        let store = JsonCorpusStore::new(&path);
        let mut corpus = store.load().await.unwrap();
        corpus.conversations[0].dialogues[0].set_audio_path("vietnamese", "/audios/a.mp3");
        store.save(&corpus).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Chào hỏi"));
        assert!(written.contains("\"speaker\": \"A\""));
        assert!(written.contains("\"audioPaths\""));
        assert!(!dir.path().join("dialogues.json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonCorpusStore::new(dir.path().join("absent.json"));

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, ApplicationError::Storage(_)));
        assert!(err.to_string().contains("Corpus file not found"));
    }

    #[tokio::test]
    async fn malformed_file_is_domain_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonCorpusStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }
}
