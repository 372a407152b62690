// ABOUTME: Navigation route returning the entries visible to the current role
// ABOUTME: Pure projection of the static table; anonymous sessions see nothing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::nav;
use crate::routes::AppState;
use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde::Serialize;

/// Navigation response body
#[derive(Debug, Serialize)]
struct NavResponse {
    entries: Vec<NavEntryView>,
}

/// One visible navigation entry
#[derive(Debug, Serialize)]
struct NavEntryView {
    path: &'static str,
    label: &'static str,
}

/// Navigation routes
pub struct NavRoutes;

impl NavRoutes {
    /// Create the navigation route
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/nav", get(Self::handle_nav))
            .with_state(state)
    }

    /// Visible entries for the current role; an anonymous or role-less
    /// session gets an empty list rather than an error
    async fn handle_nav(State(state): State<AppState>) -> impl IntoResponse {
        let role = state.store.snapshot().role();
        let entries = nav::visible(role)
            .into_iter()
            .map(|e| NavEntryView {
                path: e.path,
                label: e.label,
            })
            .collect();
        (StatusCode::OK, Json(NavResponse { entries }))
    }
}
