// ABOUTME: Payroll screen routes: entries for a pay period
// ABOUTME: Gated to master_admin only; totals are simple derivations over returned rows
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::errors::AppError;
use crate::guards::require_role;
use crate::models::{PayrollEntry, StaffRole};
use crate::routes::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const SCREEN: &str = "/payroll";
const ALLOWED: &[StaffRole] = &[StaffRole::MasterAdmin];

/// Pay period query, both bounds required
#[derive(Debug, Deserialize)]
struct PeriodQuery {
    period_start: NaiveDate,
    period_end: NaiveDate,
}

/// Payroll response: rows plus a client-side total
#[derive(Debug, Serialize)]
struct PayrollResponse {
    entries: Vec<PayrollEntry>,
    total_gross_pay_cents: i64,
}

/// Payroll screen routes
pub struct PayrollRoutes;

impl PayrollRoutes {
    /// Create the payroll route
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/payroll", get(Self::handle_list))
            .with_state(state)
    }

    async fn handle_list(
        State(state): State<AppState>,
        Query(period): Query<PeriodQuery>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        if period.period_end < period.period_start {
            return Err(AppError::invalid_input("Period end precedes period start"));
        }

        let entries = state
            .data
            .list_payroll(&staff.access_token, period.period_start, period.period_end)
            .await?;
        let total_gross_pay_cents = entries.iter().map(|e| e.gross_pay_cents).sum();
        Ok((
            StatusCode::OK,
            Json(PayrollResponse {
                entries,
                total_gross_pay_cents,
            }),
        )
            .into_response())
    }
}
