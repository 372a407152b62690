// ABOUTME: Studio Admin dashboard server binary with environment-driven configuration
// ABOUTME: Wires the hosted-backend collaborators, the session store, and the HTTP router
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Studio Admin dashboard server

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use studio_admin::config::environment::ServerConfig;
use studio_admin::constants::service_names;
use studio_admin::logging;
use studio_admin::providers::{
    http_client, FunctionsClient, HostedAuthProvider, HostedDataProvider,
};
use studio_admin::routes::{router, AppState};
use studio_admin::session::SessionStore;
use tracing::info;

#[derive(Parser)]
#[command(
    name = service_names::STUDIO_ADMIN,
    about = "Studio Admin - role-gated dashboard for fitness studio operations",
    version
)]
struct Args {
    /// Override the HTTP port from configuration
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.http_port {
        config.http_port = port;
    }

    logging::init_from_env().context("Failed to initialize logging")?;
    info!("Starting Studio Admin dashboard server");
    info!("Configuration: {}", config.summary());

    http_client::initialize_shared_client(
        config.backend.timeout_secs,
        config.backend.connect_timeout_secs,
    );

    let auth = Arc::new(HostedAuthProvider::new(&config.backend));
    let data = Arc::new(HostedDataProvider::new(&config.backend));
    let functions = Arc::new(FunctionsClient::new(&config.backend));

    let store = SessionStore::new(auth, data.clone());
    store.initialize().await;

    let state = AppState {
        store: store.clone(),
        data,
        functions,
    };
    let app = router(state, &config);

    let bind_address = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {bind_address}"))?;

    info!("HTTP server listening on {bind_address}");
    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  POST /auth/login - Sign in with email and password");
    info!("  POST /auth/logout - Sign out");
    info!("  GET  /auth/session - Current session snapshot");
    info!("  GET  /api/nav - Navigation entries for the signed-in role");
    info!("  GET  /api/overview - Studio overview (admin)");
    info!("  GET  /api/schedule - Class schedule (staff)");
    info!("  GET  /api/members - Member roster (admin)");
    info!("  GET  /api/bookings - Bookings by class or member (staff)");
    info!("  GET  /api/coaches - Coach roster (master admin)");
    info!("  GET  /api/payroll - Payroll entries (master admin)");
    info!("  GET  /api/leave - Leave requests (staff)");
    info!("  POST /api/users - Provision a user account (master admin)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    store.shutdown();
    info!("Studio Admin dashboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
