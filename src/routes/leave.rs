// ABOUTME: Leave-request screen routes: list, file, and approve/reject
// ABOUTME: Listing and filing open to coaches; decisions restricted to admins
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::errors::AppError;
use crate::guards::require_role;
use crate::models::StaffRole;
use crate::providers::data::NewLeaveRequest;
use crate::providers::PageQuery;
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

const SCREEN: &str = "/leave";
const ALLOWED: &[StaffRole] = &[StaffRole::MasterAdmin, StaffRole::Admin, StaffRole::Coach];
const DECIDERS: &[StaffRole] = &[StaffRole::MasterAdmin, StaffRole::Admin];

/// Decisions a leave request may receive
const LEAVE_DECISIONS: &[&str] = &["approved", "rejected"];

/// Decision request body
#[derive(Debug, Deserialize)]
struct Decision {
    status: String,
}

/// Leave-request screen routes
pub struct LeaveRoutes;

impl LeaveRoutes {
    /// Create all leave routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/leave", get(Self::handle_list))
            .route("/api/leave", post(Self::handle_create))
            .route("/api/leave/:id/status", post(Self::handle_decide))
            .with_state(state)
    }

    async fn handle_list(
        State(state): State<AppState>,
        Query(page): Query<PageQuery>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        let requests = state
            .data
            .list_leave_requests(&staff.access_token, page)
            .await?;
        Ok((StatusCode::OK, Json(requests)).into_response())
    }

    async fn handle_create(
        State(state): State<AppState>,
        Json(new): Json<NewLeaveRequest>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        if new.ends_on < new.starts_on {
            return Err(AppError::invalid_input("Leave must end on or after it starts"));
        }
        let request = state
            .data
            .create_leave_request(&staff.access_token, &new)
            .await?;
        Ok((StatusCode::CREATED, Json(request)).into_response())
    }

    async fn handle_decide(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(decision): Json<Decision>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, DECIDERS, SCREEN)?;
        if !LEAVE_DECISIONS.contains(&decision.status.as_str()) {
            return Err(AppError::invalid_input(format!(
                "Unknown leave decision: {}",
                decision.status
            )));
        }
        let request = state
            .data
            .set_leave_status(&staff.access_token, id, &decision.status)
            .await?;
        Ok((StatusCode::OK, Json(request)).into_response())
    }
}
