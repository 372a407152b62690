// ABOUTME: Health check route for liveness probes
// ABOUTME: Reports service name and version, no authentication required
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::constants::service_names;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

/// Health response body
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::handle_health))
    }

    async fn handle_health() -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                service: service_names::STUDIO_ADMIN,
                version: env!("CARGO_PKG_VERSION"),
            }),
        )
    }
}
