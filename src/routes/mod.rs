// ABOUTME: Route module organization for the dashboard HTTP surface
// ABOUTME: Per-screen routers with thin handlers: guard chain, then a data-provider proxy call
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Route modules for the Studio Admin console.
//!
//! Every screen handler follows the same shape: evaluate the guard chain
//! against the current session snapshot, then issue a parameterized query
//! through the data collaborator with the caller's token. Handlers hold no
//! business logic beyond simple derivations over returned rows.

use crate::config::environment::ServerConfig;
use crate::middleware::setup_cors;
use crate::providers::{DataProvider, FunctionsClient};
use crate::session::SessionStore;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Authentication and session routes
pub mod auth;
/// Booking screen routes
pub mod bookings;
/// Coaches screen routes
pub mod coaches;
/// Health check route
pub mod health;
/// Leave-request screen routes
pub mod leave;
/// Members screen routes
pub mod members;
/// Navigation entries route
pub mod nav;
/// Overview screen route
pub mod overview;
/// Payroll screen routes
pub mod payroll;
/// Schedule screen routes
pub mod schedule;
/// User provisioning routes
pub mod users;

/// Shared state injected into every route handler
#[derive(Clone)]
pub struct AppState {
    /// The process-wide session store
    pub store: Arc<SessionStore>,
    /// Data collaborator for parameterized queries
    pub data: Arc<dyn DataProvider>,
    /// Serverless function invoker for user provisioning
    pub functions: Arc<FunctionsClient>,
}

/// Assemble the full dashboard router
#[must_use]
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes())
        .merge(auth::AuthRoutes::routes(state.clone()))
        .merge(nav::NavRoutes::routes(state.clone()))
        .merge(overview::OverviewRoutes::routes(state.clone()))
        .merge(schedule::ScheduleRoutes::routes(state.clone()))
        .merge(members::MemberRoutes::routes(state.clone()))
        .merge(bookings::BookingRoutes::routes(state.clone()))
        .merge(coaches::CoachRoutes::routes(state.clone()))
        .merge(payroll::PayrollRoutes::routes(state.clone()))
        .merge(leave::LeaveRoutes::routes(state.clone()))
        .merge(users::UserRoutes::routes(state))
        .layer(setup_cors(config))
        .layer(TraceLayer::new_for_http())
}
