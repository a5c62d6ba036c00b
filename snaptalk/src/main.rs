use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snaptalk::api::{create_router, AppState};
use snaptalk::config::Config;
use snaptalk::ocr::{OcrProvider, TextRecognizer};

#[derive(Parser)]
#[command(name = "snaptalk")]
#[command(about = "Self-hostable OCR service: upload or capture an image, get its text back")]
struct Args {
    /// Address to bind (overrides SNAPTALK_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides SNAPTALK_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Tesseract language data directory (overrides OCR_TESSDATA_DIR)
    #[arg(long)]
    tessdata_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snaptalk=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.tessdata_dir {
        config.ocr.tessdata_dir = dir;
    }

    tracing::info!(
        "Initializing OCR provider: language={}, tessdata={}...",
        config.ocr.language,
        config.ocr.tessdata_dir.display()
    );
    let ocr = OcrProvider::new(&config.ocr);
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - extraction requests will fail until Tesseract is installed");
    }
    let recognizer: Arc<dyn TextRecognizer> = Arc::new(ocr);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, recognizer);
    let app = create_router(state);

    tracing::info!("SnapTalk starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/health", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("SnapTalk stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}
