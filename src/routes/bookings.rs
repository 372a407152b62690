// ABOUTME: Bookings screen routes: list by class or member, and status changes
// ABOUTME: Gated to master_admin, admin, and coach
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::errors::AppError;
use crate::guards::require_role;
use crate::models::StaffRole;
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

const SCREEN: &str = "/bookings";
const ALLOWED: &[StaffRole] = &[StaffRole::MasterAdmin, StaffRole::Admin, StaffRole::Coach];

/// Statuses a booking may be moved to
const BOOKING_STATUSES: &[&str] = &["booked", "attended", "cancelled", "no_show"];

/// Booking list filter: exactly one of class or member
#[derive(Debug, Deserialize)]
struct BookingFilter {
    #[serde(default)]
    class_id: Option<Uuid>,
    #[serde(default)]
    member_id: Option<Uuid>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    offset: Option<u32>,
}

/// Status change request
#[derive(Debug, Deserialize)]
struct StatusChange {
    status: String,
}

/// Bookings screen routes
pub struct BookingRoutes;

impl BookingRoutes {
    /// Create all booking routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/bookings", get(Self::handle_list))
            .route("/api/bookings/:id/status", post(Self::handle_set_status))
            .with_state(state)
    }

    async fn handle_list(
        State(state): State<AppState>,
        Query(filter): Query<BookingFilter>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;

        let bookings = match (filter.class_id, filter.member_id) {
            (Some(class_id), None) => {
                state
                    .data
                    .list_bookings_for_class(&staff.access_token, class_id)
                    .await?
            }
            (None, Some(member_id)) => {
                let page = PageQuery {
                    limit: filter.limit,
                    offset: filter.offset,
                };
                state
                    .data
                    .list_bookings_for_member(&staff.access_token, member_id, page)
                    .await?
            }
            _ => {
                return Err(AppError::invalid_input(
                    "Exactly one of class_id or member_id is required",
                ))
            }
        };
        Ok((StatusCode::OK, Json(bookings)).into_response())
    }

    async fn handle_set_status(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(change): Json<StatusChange>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        if !BOOKING_STATUSES.contains(&change.status.as_str()) {
            return Err(AppError::invalid_input(format!(
                "Unknown booking status: {}",
                change.status
            )));
        }
        let booking = state
            .data
            .set_booking_status(&staff.access_token, id, &change.status)
            .await?;
        Ok((StatusCode::OK, Json(booking)).into_response())
    }
}
