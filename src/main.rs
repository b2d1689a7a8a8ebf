//! SOS Guardian - a personal-safety daemon
//!
//! This is the main entry point for the sos-guardian application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use sos_guardian::{
    api::create_router,
    config::Config,
    services::DeviceServices,
    state::{AppState, JsonFileStore},
    tasks::{checkin_reminder_task, tracking_timer_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("sos_guardian={},tower_http=info", config.log_level()))
        .init();

    info!("Starting sos-guardian server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, countdown={}s, emergency number={}",
        config.host, config.port, config.countdown, config.emergency_number
    );

    let settings_path = config.settings_path();
    info!("Settings file: {}", settings_path.display());

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.sos_settings(),
        DeviceServices::from_config(&config),
        Arc::new(JsonFileStore::new(settings_path)),
    ));

    // Start the background tasks
    tokio::spawn(tracking_timer_task(Arc::clone(&state)));
    tokio::spawn(checkin_reminder_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /sos/activate       - Confirm and start the SOS countdown");
    info!("  POST /sos/cancel         - Cancel the countdown");
    info!("  POST /sos/skip           - Activate SOS immediately");
    info!("  POST /sos/deactivate     - Confirm and deactivate SOS");
    info!("  POST /sos/quick/:action  - Quick emergency action");
    info!("  GET  /notices            - Recent notices");
    info!("  *    /contacts, /theme, /checkin, /tracking");
    info!("  GET  /status             - Check current status");
    info!("  GET  /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // No countdown or vibration may outlive the process
    state.sos.teardown();
    info!("Server shutdown complete");
    Ok(())
}
