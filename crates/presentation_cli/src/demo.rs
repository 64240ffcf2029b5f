//! Interactive demo menu

use std::path::{Path, PathBuf};

use ai_speech::AudioFormat;
use application::SpeechSynthesisPort;
use dialoguer::{Select, theme::ColorfulTheme};
use domain::LanguageCode;
use infrastructure::{AppConfig, TtsAdapter};

use crate::transcribe;

/// Sentence spoken in the pipeline demo
const SAMPLE_SENTENCE: &str = "Xin chào, tôi đang học tiếng Việt. Hôm nay trời rất đẹp.";

/// File the pipeline demo writes
const DEMO_AUDIO_FILE: &str = "demo_tts_output.mp3";

const MENU: [&str; 4] = [
    "Text-to-speech → speech-to-text pipeline",
    "Transcribe audio files in the current directory",
    "Google Cloud setup instructions",
    "Exit",
];

/// Run the menu until the user exits
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("🎙️ Parley speech demo");

    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Choose an option")
            .items(&MENU)
            .default(0)
            .interact()?;

        let result = match choice {
            0 => pipeline_demo(config).await,
            1 => transcribe_existing(config).await,
            2 => {
                print_setup_instructions();
                Ok(())
            },
            _ => break,
        };

        if let Err(e) = result {
            println!("❌ {e}");
        }
        println!();
    }

    println!("👋 Bye");
    Ok(())
}

/// Synthesize the sample sentence, then transcribe it back
async fn pipeline_demo(config: &AppConfig) -> anyhow::Result<()> {
    println!("🔊 Synthesizing: {SAMPLE_SENTENCE}");
    let tts = TtsAdapter::new(config.speech.tts.clone())?;
    let audio = tts
        .synthesize(SAMPLE_SENTENCE.to_string(), config.speech.tts.language.clone())
        .await?;

    let path = PathBuf::from(DEMO_AUDIO_FILE);
    tokio::fs::write(&path, &audio).await?;
    println!("💾 Wrote {} ({} bytes)", path.display(), audio.len());

    let service = transcribe::service(&config.speech)?;
    let language = LanguageCode::default();
    let transcripts = transcribe::transcribe_with(&service, &path, &language).await?;
    transcribe::print_transcripts(&transcripts);

    match transcripts.average_confidence() {
        Some(avg) => println!("🎯 Round-trip average confidence: {avg:.2}"),
        None => println!("🎯 No confidence reported"),
    }
    Ok(())
}

/// Let the user pick one audio file (or all) from the current directory
async fn transcribe_existing(config: &AppConfig) -> anyhow::Result<()> {
    let files = audio_files_in(Path::new("."))?;
    if files.is_empty() {
        println!("📂 No audio files found in the current directory");
        return Ok(());
    }

    let mut items: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
    items.push("All files".to_string());

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which file?")
        .items(&items)
        .default(0)
        .interact()?;

    let selected: Vec<&PathBuf> = if choice == files.len() {
        files.iter().collect()
    } else {
        files.get(choice).into_iter().collect()
    };

    let service = transcribe::service(&config.speech)?;
    let language = LanguageCode::default();
    for file in selected {
        println!("🎧 {}", file.display());
        match transcribe::transcribe_with(&service, file, &language).await {
            Ok(transcripts) => {
                transcribe::print_transcripts(&transcripts);
                let saved = transcribe::save_transcription(file, &language, &transcripts).await?;
                println!("💾 Saved {}", saved.display());
            },
            Err(e) => println!("❌ {e}"),
        }
    }
    Ok(())
}

/// Audio files directly inside `dir`, sorted by name
fn audio_files_in(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(AudioFormat::from_extension)
                .is_some()
        })
        .collect();
    files.sort();
    Ok(files)
}

fn print_setup_instructions() {
    println!("🔧 Google Cloud Speech setup");
    println!("   1. Create a project at https://console.cloud.google.com/");
    println!("   2. Enable the Cloud Speech-to-Text API");
    println!("   3. Create a service account and download its JSON key");
    println!("   4. export GOOGLE_APPLICATION_CREDENTIALS=/path/to/key.json");
    println!();
    println!("   API key instead of a service account:");
    println!("      export GOOGLE_APPLICATION_CREDENTIALS=USE_API_KEY");
    println!("      export GOOGLE_API_KEY=your-key");
    println!();
    println!("   Gemini transcription:");
    println!("      export GEMINI_API_KEY=your-key");
}
