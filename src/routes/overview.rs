// ABOUTME: Overview screen route: headline numbers for the studio
// ABOUTME: Gated to master_admin and admin; counts derived client-side from rows
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::errors::AppError;
use crate::guards::require_role;
use crate::models::{ClassSession, StaffRole};
use crate::providers::PageQuery;
use crate::routes::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::Serialize;

const SCREEN: &str = "/overview";
const ALLOWED: &[StaffRole] = &[StaffRole::MasterAdmin, StaffRole::Admin];

/// Overview response body
#[derive(Debug, Serialize)]
struct OverviewResponse {
    active_member_count: usize,
    classes_next_24h: Vec<ClassSession>,
}

/// Overview screen routes
pub struct OverviewRoutes;

impl OverviewRoutes {
    /// Create the overview route
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/overview", get(Self::handle_overview))
            .with_state(state)
    }

    async fn handle_overview(State(state): State<AppState>) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;

        let members = state
            .data
            .list_members(&staff.access_token, PageQuery::default())
            .await?;
        let now = Utc::now();
        let classes = state
            .data
            .list_class_sessions(&staff.access_token, now, now + Duration::hours(24))
            .await?;

        let active_member_count = members
            .iter()
            .filter(|m| m.membership_status == "active")
            .count();

        Ok((
            StatusCode::OK,
            Json(OverviewResponse {
                active_member_count,
                classes_next_24h: classes,
            }),
        )
            .into_response())
    }
}
