//! Integration tests for CLI
//!
//! These tests verify CLI functionality without running actual commands,
//! but instead test the command parsing and structure.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

// Mock CLI structure for testing (mirrors main.rs)
#[derive(Parser)]
#[command(name = "parley-cli")]
#[command(author, version, about = "Parley speech practice CLI", long_about = None)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    GenerateAudio {
        #[arg(long)]
        corpus: Option<PathBuf>,
        #[arg(long)]
        audio_dir: Option<PathBuf>,
        #[arg(long)]
        public_prefix: Option<String>,
        #[arg(long)]
        delay_ms: Option<u64>,
        #[arg(long)]
        skip_generation: bool,
    },
    Transcribe {
        file: PathBuf,
        #[arg(short, long, default_value = "vi-VN")]
        language: String,
        #[arg(long)]
        credentials: Option<PathBuf>,
    },
    Health {
        #[arg(short, long, default_value = "http://localhost:5000")]
        url: String,
    },
    Demo,
}

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
    Cli::try_parse_from(os_args)
}

#[test]
fn cli_parses_generate_audio_defaults() {
    let cli = parse_args(&["parley-cli", "generate-audio"]).unwrap();
    if let Commands::GenerateAudio {
        corpus,
        delay_ms,
        skip_generation,
        ..
    } = cli.command
    {
        assert!(corpus.is_none());
        assert!(delay_ms.is_none());
        assert!(!skip_generation);
    } else {
        panic!("Expected GenerateAudio command");
    }
}

#[test]
fn cli_parses_generate_audio_options() {
    let cli = parse_args(&[
        "parley-cli",
        "generate-audio",
        "--corpus",
        "data/dialogues.json",
        "--audio-dir",
        "out/audio",
        "--public-prefix",
        "/static/audio",
        "--delay-ms",
        "250",
        "--skip-generation",
    ])
    .unwrap();

    if let Commands::GenerateAudio {
        corpus,
        audio_dir,
        public_prefix,
        delay_ms,
        skip_generation,
    } = cli.command
    {
        assert_eq!(corpus, Some(PathBuf::from("data/dialogues.json")));
        assert_eq!(audio_dir, Some(PathBuf::from("out/audio")));
        assert_eq!(public_prefix.as_deref(), Some("/static/audio"));
        assert_eq!(delay_ms, Some(250));
        assert!(skip_generation);
    } else {
        panic!("Expected GenerateAudio command");
    }
}

#[test]
fn cli_parses_transcribe_with_defaults() {
    let cli = parse_args(&["parley-cli", "transcribe", "hello.wav"]).unwrap();
    if let Commands::Transcribe {
        file,
        language,
        credentials,
    } = cli.command
    {
        assert_eq!(file, PathBuf::from("hello.wav"));
        assert_eq!(language, "vi-VN");
        assert!(credentials.is_none());
    } else {
        panic!("Expected Transcribe command");
    }
}

#[test]
fn cli_parses_transcribe_with_language_and_credentials() {
    let cli = parse_args(&[
        "parley-cli",
        "transcribe",
        "hello.wav",
        "-l",
        "en-US",
        "--credentials",
        "sa.json",
    ])
    .unwrap();
    if let Commands::Transcribe {
        language,
        credentials,
        ..
    } = cli.command
    {
        assert_eq!(language, "en-US");
        assert_eq!(credentials, Some(PathBuf::from("sa.json")));
    } else {
        panic!("Expected Transcribe command");
    }
}

#[test]
fn cli_transcribe_requires_file() {
    assert!(parse_args(&["parley-cli", "transcribe"]).is_err());
}

#[test]
fn cli_parses_health_with_custom_url() {
    let cli = parse_args(&["parley-cli", "health", "--url", "http://custom:8080"]).unwrap();
    if let Commands::Health { url } = cli.command {
        assert_eq!(url, "http://custom:8080");
    } else {
        panic!("Expected Health command");
    }
}

#[test]
fn cli_parses_demo() {
    let cli = parse_args(&["parley-cli", "demo"]).unwrap();
    assert!(matches!(cli.command, Commands::Demo));
}

#[test]
fn cli_counts_verbosity() {
    let cli = parse_args(&["parley-cli", "-vv", "demo"]).unwrap();
    assert_eq!(cli.verbose, 2);
}

#[test]
fn cli_rejects_unknown_command() {
    assert!(parse_args(&["parley-cli", "backup"]).is_err());
}

#[test]
fn cli_rejects_non_numeric_delay() {
    assert!(parse_args(&["parley-cli", "generate-audio", "--delay-ms", "soon"]).is_err());
}
