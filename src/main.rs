//! ChenFlow API - Conceptual Data Modeling Platform
//!
//! Build an entity-relationship model interactively over HTTP and derive two
//! artifacts from it on demand:
//! - a relational schema as Oracle-flavored SQL DDL (sequences, tables,
//!   associative tables, foreign-key constraints)
//! - a PlantUML diagram, optionally rendered to an image through an
//!   external rendering service

mod compiler;
mod config;
mod error;
mod model;
mod render;
mod routes;
mod state;
mod store;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting ChenFlow - Conceptual Data Modeling Platform...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");
    info!("🖼️  Diagram renderer: {}", settings.renderer.endpoint);

    let state = Arc::new(AppState::new(&settings)?);

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Model ───");
    info!("   POST /entities                 - Define an entity");
    info!("   GET  /entities                 - List entities");
    info!("   POST /relationships            - Define a relationship");
    info!("   GET  /relationships            - List relationships");
    info!("   GET  /model                    - Whole model with revision");
    info!("");
    info!("   ─── Artifacts ───");
    info!("   GET  /artifacts/sql            - Generate SQL DDL script");
    info!("   GET  /artifacts/diagram        - Generate PlantUML source");
    info!("   POST /artifacts/diagram/render - Render diagram to image");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chenflow_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
