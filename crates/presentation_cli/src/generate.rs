//! `generate-audio` command

use std::sync::Arc;

use ai_speech::TtsConfig;
use application::{AudioBatchService, BatchRun};
use infrastructure::{BatchAppConfig, FsAudioStore, JsonCorpusStore, TtsAdapter};

/// Generate missing audio, rewrite corpus paths and print the report
pub async fn run(tts: &TtsConfig, batch: &BatchAppConfig, skip_generation: bool) -> anyhow::Result<()> {
    println!("🎤 Generating Vietnamese audio from {}", batch.corpus_path.display());
    println!("   Audio directory: {}", batch.audio_dir.display());

    let service = AudioBatchService::new(
        Arc::new(TtsAdapter::new(tts.clone())?),
        Arc::new(FsAudioStore::new(&batch.audio_dir)),
        Arc::new(JsonCorpusStore::new(&batch.corpus_path)),
        batch.to_batch_config(),
    );

    let run = service.run(skip_generation).await?;
    for line in summary_lines(&run) {
        println!("{line}");
    }
    Ok(())
}

/// Human-readable report lines
fn summary_lines(run: &BatchRun) -> Vec<String> {
    let mut lines = Vec::new();
    match run.report {
        Some(report) => {
            lines.push(format!("📊 Lines: {}", report.total));
            lines.push(format!("   ✅ Created: {}", report.created));
            lines.push(format!("   ⏭️  Skipped (already present): {}", report.skipped));
            if report.failed > 0 {
                lines.push(format!("   ❌ Failed: {}", report.failed));
            }
        },
        None => lines.push("⏭️  Audio generation skipped".to_string()),
    }
    lines.push(format!(
        "✅ Updated corpus audio paths ({} default audio files set)",
        run.updated_lines
    ));
    lines
}

#[cfg(test)]
mod tests {
    use application::BatchReport;

    use super::*;

    #[test]
    fn summary_includes_failures_only_when_present() {
        let run = BatchRun {
            report: Some(BatchReport {
                total: 4,
                created: 2,
                skipped: 2,
                failed: 0,
            }),
            updated_lines: 4,
        };
        let lines = summary_lines(&run);
        assert!(lines[0].contains('4'));
        assert!(!lines.iter().any(|l| l.contains("Failed")));

        let run = BatchRun {
            report: Some(BatchReport {
                failed: 1,
                ..BatchReport::default()
            }),
            updated_lines: 0,
        };
        assert!(summary_lines(&run).iter().any(|l| l.contains("Failed: 1")));
    }

    #[test]
    fn summary_for_skipped_generation() {
        let lines = summary_lines(&BatchRun::default());
        assert!(lines[0].contains("skipped"));
        assert_eq!(lines.len(), 2);
    }
}
