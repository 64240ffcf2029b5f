//! Audio batch service - generate missing dialogue audio and record its paths

use std::{fmt, sync::Arc, time::Duration};

use domain::{DialogueCorpus, audio_file_name};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{AudioStore, CorpusStore, SpeechSynthesisPort},
};

/// Naming and pacing for one batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBatchConfig {
    /// File name prefix, `{prefix}_{conversation}_{line}.mp3`
    pub file_prefix: String,
    /// Key written into each line's `audioPaths`
    pub audio_key: String,
    /// URL prefix the player uses to reach the audio directory
    pub public_prefix: String,
    /// Language passed to synthesis; lines in this language get `audioFile`
    pub language: String,
    /// Pause after each synthesized line
    pub delay: Duration,
}

impl Default for AudioBatchConfig {
    fn default() -> Self {
        Self {
            file_prefix: "vietnamese".to_string(),
            audio_key: "vietnamese".to_string(),
            public_prefix: "/audios/vietnamese".to_string(),
            language: "vi".to_string(),
            delay: Duration::from_secs(1),
        }
    }
}

impl AudioBatchConfig {
    /// Public path for a generated file
    pub fn public_path(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.public_prefix.trim_end_matches('/'))
    }
}

/// Counts from one generation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Result of a full run: generation report and the number of updated lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchRun {
    /// `None` when generation was skipped
    pub report: Option<BatchReport>,
    pub updated_lines: usize,
}

/// Service that fills the audio directory from the corpus
pub struct AudioBatchService {
    synthesizer: Arc<dyn SpeechSynthesisPort>,
    audio_store: Arc<dyn AudioStore>,
    corpus_store: Arc<dyn CorpusStore>,
    config: AudioBatchConfig,
}

impl fmt::Debug for AudioBatchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioBatchService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AudioBatchService {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesisPort>,
        audio_store: Arc<dyn AudioStore>,
        corpus_store: Arc<dyn CorpusStore>,
        config: AudioBatchConfig,
    ) -> Self {
        Self {
            synthesizer,
            audio_store,
            corpus_store,
            config,
        }
    }

    pub const fn config(&self) -> &AudioBatchConfig {
        &self.config
    }

    /// Synthesize every line whose audio file is missing
    ///
    /// Lines are processed one at a time. A failing line is logged and
    /// counted; the loop moves on to the next one.
    #[instrument(skip(self, corpus), fields(lines = corpus.line_count()))]
    pub async fn generate_missing(&self, corpus: &DialogueCorpus) -> BatchReport {
        let mut report = BatchReport::default();

        for (conversation, line) in corpus.lines() {
            report.total += 1;
            let file_name = audio_file_name(&self.config.file_prefix, &conversation.id, &line.id);

            match self.audio_store.exists(&file_name).await {
                Ok(true) => {
                    debug!(file = %file_name, "Audio exists, skipping");
                    report.skipped += 1;
                    continue;
                },
                Ok(false) => {},
                Err(e) => {
                    error!(file = %file_name, error = %e, "Cannot check audio file");
                    report.failed += 1;
                    continue;
                },
            }

            match self.synthesize_line(&file_name, &line.text).await {
                Ok(()) => {
                    info!(
                        conversation = %conversation.label(),
                        file = %file_name,
                        "Created audio"
                    );
                    report.created += 1;
                    if !self.config.delay.is_zero() {
                        tokio::time::sleep(self.config.delay).await;
                    }
                },
                Err(e) => {
                    error!(file = %file_name, error = %e, "Audio generation failed");
                    report.failed += 1;
                },
            }
        }

        info!(
            total = report.total,
            created = report.created,
            skipped = report.skipped,
            failed = report.failed,
            "Audio generation finished"
        );
        report
    }

    async fn synthesize_line(&self, file_name: &str, text: &str) -> Result<(), ApplicationError> {
        let audio = self
            .synthesizer
            .synthesize(text.to_string(), self.config.language.clone())
            .await?;
        self.audio_store.write(file_name, audio).await
    }

    /// Point every line at its generated audio
    ///
    /// `audioPaths[audio_key]` is always overwritten. `audioFile` is set when
    /// the line has none, or is in the batch language, and the file exists.
    /// Returns the number of lines whose `audioFile` was set.
    pub async fn update_audio_paths(
        &self,
        corpus: &mut DialogueCorpus,
    ) -> Result<usize, ApplicationError> {
        let mut updated = 0;

        for conversation in &mut corpus.conversations {
            for line in &mut conversation.dialogues {
                let file_name =
                    audio_file_name(&self.config.file_prefix, &conversation.id, &line.id);
                let public_path = self.config.public_path(&file_name);

                line.set_audio_path(self.config.audio_key.clone(), public_path.clone());

                let wants_default =
                    !line.has_audio_file() || line.is_in_language(&self.config.language);
                if wants_default && self.audio_store.exists(&file_name).await? {
                    line.set_default_audio(public_path);
                    updated += 1;
                }
            }
        }

        Ok(updated)
    }

    /// Load the corpus, generate missing audio, update paths and save
    #[instrument(skip(self))]
    pub async fn run(&self, skip_generation: bool) -> Result<BatchRun, ApplicationError> {
        let mut corpus = self.corpus_store.load().await?;
        if corpus.line_count() == 0 {
            warn!("Corpus has no dialogue lines");
        }

        let report = if skip_generation {
            None
        } else {
            Some(self.generate_missing(&corpus).await)
        };

        let updated_lines = self.update_audio_paths(&mut corpus).await?;
        self.corpus_store.save(&corpus).await?;
        info!(updated_lines, "Corpus audio paths updated");

        Ok(BatchRun {
            report,
            updated_lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use domain::{Conversation, DialogueLine};

    use super::*;
    use crate::ports::{MockCorpusStore, MockSpeechSynthesisPort};

    /// In-memory audio directory
    #[derive(Debug, Default)]
    struct MemoryAudioStore {
        files: Mutex<HashSet<String>>,
    }

    impl MemoryAudioStore {
        fn with_files(names: &[&str]) -> Self {
            Self {
                files: Mutex::new(names.iter().map(|n| (*n).to_string()).collect()),
            }
        }

        fn contains(&self, name: &str) -> bool {
            self.files.lock().unwrap().contains(name)
        }
    }

    #[async_trait]
    impl AudioStore for MemoryAudioStore {
        async fn exists(&self, file_name: &str) -> Result<bool, ApplicationError> {
            Ok(self.contains(file_name))
        }

        async fn write(&self, file_name: &str, _audio: Vec<u8>) -> Result<(), ApplicationError> {
            self.files.lock().unwrap().insert(file_name.to_string());
            Ok(())
        }
    }

    fn corpus() -> DialogueCorpus {
        DialogueCorpus::new(vec![
            Conversation::new(1_u64, "Chào hỏi")
                .with_line(DialogueLine::new(1_u64, "Xin chào", "vi"))
                .with_line(DialogueLine::new(2_u64, "Bạn khỏe không?", "vi"))
                .with_line(DialogueLine::new(3_u64, "I'm fine", "en")),
            Conversation::new(2_u64, "Phỏng vấn")
                .with_line(DialogueLine::new(1_u64, "Giới thiệu bản thân", "vi")),
        ])
    }

    fn config() -> AudioBatchConfig {
        AudioBatchConfig {
            delay: Duration::ZERO,
            ..AudioBatchConfig::default()
        }
    }

    fn service(
        synth: MockSpeechSynthesisPort,
        store: Arc<MemoryAudioStore>,
        corpus_store: MockCorpusStore,
    ) -> AudioBatchService {
        AudioBatchService::new(Arc::new(synth), store, Arc::new(corpus_store), config())
    }

    #[tokio::test]
    async fn synthesizes_only_missing_lines() {
        let mut synth = MockSpeechSynthesisPort::new();
        synth
            .expect_synthesize()
            .withf(|_, language| language == "vi")
            .times(2)
            .returning(|_, _| Ok(vec![0xFF, 0xFB]));

        let store = Arc::new(MemoryAudioStore::with_files(&[
            "vietnamese_1_1.mp3",
            "vietnamese_2_1.mp3",
        ]));
        let service = service(synth, Arc::clone(&store), MockCorpusStore::new());

        let report = service.generate_missing(&corpus()).await;

        assert_eq!(
            report,
            BatchReport {
                total: 4,
                created: 2,
                skipped: 2,
                failed: 0,
            }
        );
        assert!(store.contains("vietnamese_1_2.mp3"));
        assert!(store.contains("vietnamese_1_3.mp3"));
    }

    #[tokio::test]
    async fn failed_line_does_not_stop_the_batch() {
        let mut synth = MockSpeechSynthesisPort::new();
        synth.expect_synthesize().times(4).returning(|text, _| {
            if text == "Bạn khỏe không?" {
                Err(ApplicationError::RateLimited)
            } else {
                Ok(vec![1])
            }
        });

        let store = Arc::new(MemoryAudioStore::default());
        let service = service(synth, Arc::clone(&store), MockCorpusStore::new());

        let report = service.generate_missing(&corpus()).await;

        assert_eq!(report.created, 3);
        assert_eq!(report.failed, 1);
        assert!(!store.contains("vietnamese_1_2.mp3"));
        assert!(store.contains("vietnamese_2_1.mp3"));
    }

    #[tokio::test]
    async fn update_sets_paths_and_default_audio() {
        let store = Arc::new(MemoryAudioStore::with_files(&[
            "vietnamese_1_1.mp3",
            "vietnamese_1_3.mp3",
        ]));
        let service = service(
            MockSpeechSynthesisPort::new(),
            store,
            MockCorpusStore::new(),
        );

        let mut corpus = corpus();
        corpus.conversations[0].dialogues[2].set_default_audio("/audios/en/fine.mp3");

        let updated = service.update_audio_paths(&mut corpus).await.unwrap();
        assert_eq!(updated, 1);

        let lines = &corpus.conversations[0].dialogues;
        assert_eq!(
            lines[0].audio_paths["vietnamese"],
            "/audios/vietnamese/vietnamese_1_1.mp3"
        );
        assert_eq!(
            lines[0].default_audio(),
            Some("/audios/vietnamese/vietnamese_1_1.mp3")
        );
        // No file on disk: path recorded, default untouched
        assert_eq!(
            lines[1].audio_paths["vietnamese"],
            "/audios/vietnamese/vietnamese_1_2.mp3"
        );
        assert!(!lines[1].has_audio_file());
        // English line keeps its own default
        assert_eq!(lines[2].default_audio(), Some("/audios/en/fine.mp3"));
    }

    #[tokio::test]
    async fn explicit_null_default_counts_as_present() {
        let store = Arc::new(MemoryAudioStore::with_files(&["vietnamese_1_1.mp3"]));
        let service = service(
            MockSpeechSynthesisPort::new(),
            store,
            MockCorpusStore::new(),
        );

        let mut corpus = DialogueCorpus::from_json(
            r#"{"conversations":[{"id":1,"dialogues":[{"id":1,"text":"Hi","language":"en","audioFile":null}]}]}"#,
        )
        .unwrap();

        let updated = service.update_audio_paths(&mut corpus).await.unwrap();
        assert_eq!(updated, 0);

        let json = corpus.to_pretty_json().unwrap();
        assert!(json.contains(r#""audioFile": null"#));
        assert!(json.contains("/audios/vietnamese/vietnamese_1_1.mp3"));
    }

    #[tokio::test]
    async fn update_is_idempotent_across_reload() {
        let store = Arc::new(MemoryAudioStore::with_files(&["vietnamese_1_1.mp3"]));
        let service = service(
            MockSpeechSynthesisPort::new(),
            store,
            MockCorpusStore::new(),
        );

        let mut corpus = corpus();
        corpus.conversations[0].dialogues[0].set_audio_path("vietnamese", "/old/path.mp3");

        service.update_audio_paths(&mut corpus).await.unwrap();
        let first = corpus.to_pretty_json().unwrap();

        let mut reloaded = DialogueCorpus::from_json(&first).unwrap();
        service.update_audio_paths(&mut reloaded).await.unwrap();
        let second = reloaded.to_pretty_json().unwrap();

        assert_eq!(first, second);
        assert_eq!(reloaded.conversations[0].dialogues[0].audio_paths.len(), 1);
    }

    #[tokio::test]
    async fn run_loads_generates_and_saves() {
        let mut synth = MockSpeechSynthesisPort::new();
        synth.expect_synthesize().times(4).returning(|_, _| Ok(vec![1]));

        let mut corpus_store = MockCorpusStore::new();
        corpus_store.expect_load().times(1).returning(|| Ok(corpus()));
        corpus_store
            .expect_save()
            .withf(|saved| {
                saved
                    .lines()
                    .all(|(_, line)| line.audio_paths.contains_key("vietnamese"))
            })
            .times(1)
            .returning(|_| Ok(()));

        let store = Arc::new(MemoryAudioStore::default());
        let service = service(synth, store, corpus_store);

        let run = service.run(false).await.unwrap();
        assert_eq!(run.report.unwrap().created, 4);
        assert_eq!(run.updated_lines, 4);
    }

    #[tokio::test]
    async fn run_can_skip_generation() {
        let mut synth = MockSpeechSynthesisPort::new();
        synth.expect_synthesize().never();

        let mut corpus_store = MockCorpusStore::new();
        corpus_store.expect_load().returning(|| Ok(corpus()));
        corpus_store.expect_save().times(1).returning(|_| Ok(()));

        let service = service(synth, Arc::new(MemoryAudioStore::default()), corpus_store);

        let run = service.run(true).await.unwrap();
        assert!(run.report.is_none());
        assert_eq!(run.updated_lines, 0);
    }

    #[tokio::test]
    async fn run_reports_missing_corpus() {
        let mut corpus_store = MockCorpusStore::new();
        corpus_store
            .expect_load()
            .returning(|| Err(ApplicationError::Storage("corpus.json not found".to_string())));
        corpus_store.expect_save().never();

        let service = service(
            MockSpeechSynthesisPort::new(),
            Arc::new(MemoryAudioStore::default()),
            corpus_store,
        );

        let err = service.run(false).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Storage(_)));
    }

    #[test]
    fn public_path_joins_cleanly() {
        let config = AudioBatchConfig {
            public_prefix: "/audios/vietnamese/".to_string(),
            ..AudioBatchConfig::default()
        };
        assert_eq!(config.public_path("a.mp3"), "/audios/vietnamese/a.mp3");
    }
}
