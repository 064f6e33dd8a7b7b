use std::sync::Arc;

use anyhow::Context;
use attune_ai::{Classifier, OnnxEmbedder};
use attune_llm::{CompletionProvider, OpenAiClient};
use attune_server::{AppState, Args, Config};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_args(Args::parse())?;
    info!("attune v{}", env!("CARGO_PKG_VERSION"));

    let embedder = OnnxEmbedder::load(&config.embedding_model_dir)
        .context("loading embedding model")?;
    let classifier = Classifier::load(&config.classifier_path).context("loading classifier")?;
    attune_server::check_dimensions(&embedder, &classifier)?;

    let completions = OpenAiClient::new(
        &config.completion_base_url,
        config.api_key.clone(),
        config.completion_model.clone(),
        config.completion_timeout,
    )
    .context("building completion client")?;
    info!(
        model = %completions.model(),
        base_url = %completions.base_url(),
        "completion provider configured"
    );

    let state = AppState::new(
        Arc::new(embedder),
        Arc::new(classifier),
        Arc::new(completions),
    )
    .with_prompt(config.prompt_template());
    let app = attune_server::router(state, config.allowed_origin.clone());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!(addr = %config.bind, origin = ?config.allowed_origin, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received terminate signal, shutting down"),
    }
}
