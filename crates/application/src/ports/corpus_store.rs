//! Corpus store port - load and save the dialogue corpus

use async_trait::async_trait;
use domain::DialogueCorpus;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the corpus document
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Read the corpus; a missing document is an error
    async fn load(&self) -> Result<DialogueCorpus, ApplicationError>;

    /// Replace the stored corpus
    async fn save(&self, corpus: &DialogueCorpus) -> Result<(), ApplicationError>;
}
