use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn, Level};

use birthday_tracker_server::backend::{self, config::AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config_path = std::env::var("BIRTHDAY_TRACKER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yaml"));
    let config = AppConfig::load(&config_path)?;

    info!("Setting up backend");
    let app_state = backend::initialize_backend(&config)?;

    // Periodic notification sweep alongside the HTTP server
    let notification_service = app_state.notification_service.clone();
    let sweep_interval = Duration::from_secs(config.sweep.interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let service = notification_service.clone();
            // The sweep does blocking file and SMTP I/O
            let outcome = tokio::task::spawn_blocking(move || {
                service.run_sweep(Local::now().date_naive())
            })
            .await;
            match outcome {
                Ok(Ok(report)) => {
                    if !report.failures.is_empty() {
                        warn!(
                            "Sweep finished with {} delivery failures",
                            report.failures.len()
                        );
                    }
                }
                Ok(Err(e)) => warn!("Sweep aborted: {}", e),
                Err(e) => warn!("Sweep task panicked: {}", e),
            }
        }
    });

    let app = backend::create_router(app_state);

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
