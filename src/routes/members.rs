// ABOUTME: Members screen routes: list, detail, create, and whole-record update
// ABOUTME: Gated to master_admin and admin, queries proxied under the caller's token
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::errors::AppError;
use crate::guards::require_role;
use crate::models::{Member, StaffRole};
use crate::providers::data::NewMember;
use crate::providers::PageQuery;
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

const SCREEN: &str = "/members";
const ALLOWED: &[StaffRole] = &[StaffRole::MasterAdmin, StaffRole::Admin];

/// Members screen routes
pub struct MemberRoutes;

impl MemberRoutes {
    /// Create all member routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/members", get(Self::handle_list))
            .route("/api/members", post(Self::handle_create))
            .route("/api/members/:id", get(Self::handle_get))
            .route("/api/members/:id", put(Self::handle_update))
            .with_state(state)
    }

    async fn handle_list(
        State(state): State<AppState>,
        Query(page): Query<PageQuery>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        let members = state.data.list_members(&staff.access_token, page).await?;
        Ok((StatusCode::OK, Json(members)).into_response())
    }

    async fn handle_get(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        let member = state
            .data
            .get_member(&staff.access_token, id)
            .await?
            .ok_or_else(|| AppError::not_found("Member").with_resource_id(id.to_string()))?;
        Ok((StatusCode::OK, Json(member)).into_response())
    }

    async fn handle_create(
        State(state): State<AppState>,
        Json(new): Json<NewMember>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        if new.full_name.trim().is_empty() || new.email.trim().is_empty() {
            return Err(AppError::invalid_input("Name and email are required"));
        }
        let member = state.data.create_member(&staff.access_token, &new).await?;
        Ok((StatusCode::CREATED, Json(member)).into_response())
    }

    async fn handle_update(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(member): Json<Member>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        if member.id != id {
            return Err(AppError::invalid_input("Member id does not match path"));
        }
        let updated = state.data.update_member(&staff.access_token, &member).await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }
}
