// ABOUTME: Coaches screen routes: list and whole-record update
// ABOUTME: Gated to master_admin only
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::errors::AppError;
use crate::guards::require_role;
use crate::models::{Coach, StaffRole};
use crate::providers::PageQuery;
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

const SCREEN: &str = "/coaches";
const ALLOWED: &[StaffRole] = &[StaffRole::MasterAdmin];

/// Coaches screen routes
pub struct CoachRoutes;

impl CoachRoutes {
    /// Create all coach routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/coaches", get(Self::handle_list))
            .route("/api/coaches/:id", put(Self::handle_update))
            .with_state(state)
    }

    async fn handle_list(
        State(state): State<AppState>,
        Query(page): Query<PageQuery>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        let coaches = state.data.list_coaches(&staff.access_token, page).await?;
        Ok((StatusCode::OK, Json(coaches)).into_response())
    }

    async fn handle_update(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(coach): Json<Coach>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        if coach.id != id {
            return Err(AppError::invalid_input("Coach id does not match path"));
        }
        let updated = state.data.update_coach(&staff.access_token, &coach).await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }
}
