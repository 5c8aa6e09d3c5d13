mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use emotune_api::auth::{AppState, AppStateInner};
use emotune_core::detector::{EmotionDetector, HttpEmotionDetector, NoFaceDetector};
use emotune_core::mood::MoodCatalog;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "emotune=debug,emotune_api=debug,emotune_core=debug,emotune_db=debug,tower_http=debug"
                        .into()
                }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = emotune_db::Database::open(&config.db_path)?;

    let catalog = match &config.mood_table {
        Some(path) => {
            info!("Loading mood table from {}", path.display());
            MoodCatalog::from_json_file(path)?
        }
        None => MoodCatalog::default(),
    };

    let detector: Box<dyn EmotionDetector> = match &config.detector_url {
        Some(url) => {
            info!("Emotion classifier at {}", url);
            Box::new(HttpEmotionDetector::new(url.as_str())?)
        }
        None => {
            info!("No emotion classifier configured; every frame reads as neutral");
            Box::new(NoFaceDetector)
        }
    };

    let state: AppState = Arc::new(AppStateInner {
        db,
        catalog,
        detector,
        session_secret: config.session_secret,
    });

    let app = emotune_api::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Emotune listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sig) => sig,
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
