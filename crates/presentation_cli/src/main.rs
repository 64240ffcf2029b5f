//! Parley CLI
//!
//! Batch audio generation, one-shot transcription, health checks and an
//! interactive demo.

#![allow(clippy::print_stdout)]

mod demo;
mod generate;
mod transcribe;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, LoggingConfig, init_logging};
use tracing::warn;

/// Parley CLI
#[derive(Parser)]
#[command(name = "parley-cli")]
#[command(author, version, about = "Parley speech practice CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate missing dialogue audio and update corpus paths
    ///
    /// Example: parley-cli generate-audio --corpus public/dialogues.json
    GenerateAudio {
        /// Dialogue corpus JSON file
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Directory for generated MP3 files
        #[arg(long)]
        audio_dir: Option<PathBuf>,

        /// URL prefix written into the corpus
        #[arg(long)]
        public_prefix: Option<String>,

        /// Pause after each synthesized line in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Only rewrite corpus paths
        #[arg(long)]
        skip_generation: bool,
    },

    /// Transcribe a local audio file
    Transcribe {
        /// Audio file to transcribe
        file: PathBuf,

        /// Spoken language
        #[arg(short, long, default_value = "vi-VN")]
        language: String,

        /// Service-account JSON file; selects the Cloud Speech SDK backend
        #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
        credentials: Option<PathBuf>,
    },

    /// Check server health
    Health {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:5000")]
        url: String,
    },

    /// Interactive text-to-speech and transcription demo
    Demo,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&LoggingConfig {
        format: config.logging.format,
        filter: log_filter_from_verbosity(cli.verbose).to_string(),
    })?;
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    match cli.command {
        Commands::GenerateAudio {
            corpus,
            audio_dir,
            public_prefix,
            delay_ms,
            skip_generation,
        } => {
            let mut batch = config.batch.clone();
            if let Some(corpus) = corpus {
                batch.corpus_path = corpus;
            }
            if let Some(audio_dir) = audio_dir {
                batch.audio_dir = audio_dir;
            }
            if let Some(public_prefix) = public_prefix {
                batch.public_prefix = public_prefix;
            }
            if let Some(delay_ms) = delay_ms {
                batch.delay_ms = delay_ms;
            }

            if let Err(e) = generate::run(&config.speech.tts, &batch, skip_generation).await {
                println!("❌ {e}");
                std::process::exit(1);
            }
        },

        Commands::Transcribe {
            file,
            language,
            credentials,
        } => {
            let speech = transcribe::speech_config(&config.speech, credentials);
            if let Err(e) = transcribe::transcribe_file(&speech, &file, &language).await {
                println!("❌ {e}");
                std::process::exit(1);
            }
        },

        Commands::Health { url } => {
            let client = reqwest::Client::new();
            match client.get(endpoint_url(&url, "/health")).send().await {
                Ok(resp) if resp.status().is_success() => {
                    let body = resp.json::<serde_json::Value>().await?;
                    println!("✅ Healthy");
                    println!("{}", serde_json::to_string_pretty(&body)?);
                },
                Ok(resp) => {
                    println!("❌ Unhealthy: HTTP {}", resp.status());
                    std::process::exit(1);
                },
                Err(e) => {
                    println!("❌ Unhealthy: {e}");
                    std::process::exit(1);
                },
            }
        },

        Commands::Demo => demo::run(&config).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_verbosity_levels() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
        assert_eq!(log_filter_from_verbosity(1), "info");
        assert_eq!(log_filter_from_verbosity(2), "debug");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn endpoint_url_concatenates_correctly() {
        assert_eq!(
            endpoint_url("http://localhost:5000", "/health"),
            "http://localhost:5000/health"
        );
    }

    #[test]
    fn endpoint_url_handles_trailing_slash() {
        assert_eq!(
            endpoint_url("http://example.com/", "/health"),
            "http://example.com/health"
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
