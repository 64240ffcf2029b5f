//! Parley HTTP Server
//!
//! Main entry point for the transcription API server.

use std::{sync::Arc, time::Duration};

use application::TranscriptionService;
use infrastructure::{AppConfig, HttpRecommendationAdapter, SpeechAdapter, init_logging};
use presentation_http::{AppState, build_app};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the format setting applies
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config.logging)?;

    info!("🎙️ Parley v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }
    config.validate().map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    info!(
        host = %config.server.host,
        port = %config.server.port,
        mode = %config.speech.mode,
        "Configuration loaded"
    );

    // Speech client never fails to build; it may come up not ready
    let speech = SpeechAdapter::from_config(&config.speech);
    if let Some(reason) = speech.not_ready_reason() {
        warn!(reason = %reason, "Transcription unavailable until speech settings are fixed");
    }

    let mut transcription = TranscriptionService::new(Arc::new(speech));
    if let Some(recommender) = &config.recommender {
        let adapter = HttpRecommendationAdapter::new(recommender)
            .map_err(|e| anyhow::anyhow!("Failed to initialize recommender: {e}"))?;
        info!(url = %adapter.url(), "Recommendation webhook enabled");
        transcription = transcription.with_recommender(Arc::new(adapter));
    }

    let app = build_app(AppState::new(transcription), &config.server);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("👋 Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("⏳ Waiting up to {:?} for connections to close...", timeout);
}
