// Pitch dashboard server entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file)
// 2. Load config
// 3. Load and validate the pitch CSV
// 4. Bind the WebSocket listener
// 5. Serve until Ctrl+C

use std::path::Path;
use std::sync::Arc;

use pitchlab_app::app::Dashboard;
use pitchlab_app::config;
use pitchlab_app::ws_server;
use pitchlab_core::dataset::Dataset;

use anyhow::Context;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Pitch dashboard starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: data={}, server={}:{}",
        config.data.path, config.server.host, config.server.port
    );

    let dataset = Dataset::load(Path::new(&config.data.path))
        .with_context(|| format!("failed to load pitch data from {}", config.data.path))?;
    info!("{} sessions in dataset", dataset.dates().len());

    let dashboard = Dashboard::new(Arc::new(dataset), config.views);
    let listener = ws_server::bind(&config.server.host, config.server.port)
        .await
        .with_context(|| {
            format!(
                "failed to bind WebSocket server on {}:{}",
                config.server.host, config.server.port
            )
        })?;

    tokio::select! {
        result = ws_server::run(listener, dashboard) => {
            if let Err(e) = result {
                error!("WebSocket server error: {}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C");
        }
    }

    info!("Pitch dashboard shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to `logs/pitchlab.log`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("pitchlab.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pitchlab_app=info,pitchlab_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
