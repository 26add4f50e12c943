//! Translation Agent Server Entry Point

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use translate_agent_config::{load_settings, Settings};
use translate_agent_llm::{OpenAIBackend, OpenAIConfig};
use translate_agent_pipeline::{
    OpenAISpeaker, OpenAITranscriber, SpeakerConfig, TranscriberConfig,
};
use translate_agent_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from files and environment
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("TRANSLATE_AGENT_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!(
                "Loaded configuration from files (env: {})",
                env.as_deref().unwrap_or("default")
            );
            settings
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!(
        "Starting Translation Agent Server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        environment = ?config.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    // Strict environments reject bad configuration outright
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Configuration validation failed");
        std::process::exit(1);
    }

    let _metrics_handle = init_metrics();
    tracing::info!("Initialized Prometheus metrics at /metrics");

    // Wire the OpenAI-compatible backends
    let llm = OpenAIBackend::new(OpenAIConfig::from_settings(&config))?;
    tracing::info!(model = %config.translation.model, "Chat backend ready");

    let stt = OpenAITranscriber::new(TranscriberConfig::from_settings(&config))?;
    tracing::info!(model = %config.stt.model, "Transcription backend ready");

    let tts = OpenAISpeaker::new(SpeakerConfig::from_settings(&config))?;
    tracing::info!(model = %config.tts.model, voice = %config.tts.voice, "Speech backend ready");

    let state = AppState::new(config.clone(), Arc::new(llm), Arc::new(stt), Arc::new(tts));

    // Reclaims expired sessions in the background until shutdown
    let cleanup_shutdown = state.sessions.start_cleanup_task();

    // Create router
    let app = create_router(state);

    // Bind address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = cleanup_shutdown.send(true);
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Initialize tracing from the environment filter or the configured level
fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("translate_agent={},tower_http=debug", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
