// ABOUTME: Schedule screen routes: class list by window, create, and update
// ABOUTME: Gated to master_admin, admin, and coach
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::errors::AppError;
use crate::guards::require_role;
use crate::models::{ClassSession, StaffRole};
use crate::providers::data::NewClassSession;
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

const SCREEN: &str = "/schedule";
const ALLOWED: &[StaffRole] = &[StaffRole::MasterAdmin, StaffRole::Admin, StaffRole::Coach];

/// Time window for the schedule query; defaults to the coming week
#[derive(Debug, Deserialize)]
struct ScheduleWindow {
    #[serde(default)]
    from: Option<DateTime<Utc>>,
    #[serde(default)]
    to: Option<DateTime<Utc>>,
}

/// Schedule screen routes
pub struct ScheduleRoutes;

impl ScheduleRoutes {
    /// Create all schedule routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/schedule", get(Self::handle_list))
            .route("/api/schedule", post(Self::handle_create))
            .route("/api/schedule/:id", put(Self::handle_update))
            .with_state(state)
    }

    async fn handle_list(
        State(state): State<AppState>,
        Query(window): Query<ScheduleWindow>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;

        let from = window.from.unwrap_or_else(Utc::now);
        let to = window.to.unwrap_or_else(|| from + Duration::days(7));
        if to <= from {
            return Err(AppError::invalid_input("Window end must be after start"));
        }

        let classes = state
            .data
            .list_class_sessions(&staff.access_token, from, to)
            .await?;
        Ok((StatusCode::OK, Json(classes)).into_response())
    }

    async fn handle_create(
        State(state): State<AppState>,
        Json(new): Json<NewClassSession>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        if new.ends_at <= new.starts_at {
            return Err(AppError::invalid_input("Class must end after it starts"));
        }
        if new.capacity == 0 {
            return Err(AppError::invalid_input("Capacity must be at least 1"));
        }
        let class = state
            .data
            .create_class_session(&staff.access_token, &new)
            .await?;
        Ok((StatusCode::CREATED, Json(class)).into_response())
    }

    async fn handle_update(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(class): Json<ClassSession>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        if class.id != id {
            return Err(AppError::invalid_input("Class id does not match path"));
        }
        if class.ends_at <= class.starts_at {
            return Err(AppError::invalid_input("Class must end after it starts"));
        }
        let updated = state
            .data
            .update_class_session(&staff.access_token, &class)
            .await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }
}
