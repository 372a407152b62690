// ABOUTME: Authentication route handlers for login, logout, and session inspection
// ABOUTME: Thin wrappers driving the session store; state transitions flow via auth events
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Authentication routes.
//!
//! Login and logout delegate to the session store, which delegates to the
//! auth collaborator. Neither handler writes session state: the change
//! notification emitted by the collaborator is the single authority for
//! transitions, so the session view returned here may still be `loading`.

use crate::errors::AppError;
use crate::providers::ProviderError;
use crate::routes::AppState;
use crate::session::SessionSnapshot;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Staff login email
    pub email: String,
    /// Password
    pub password: String,
}

/// Session state as reported to the frontend
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// Whether a session is present
    pub authenticated: bool,
    /// Whether initialization or profile resolution is in flight
    pub loading: bool,
    /// Resolved role, if any
    pub role: Option<String>,
    /// Signed-in email, if a profile is loaded
    pub email: Option<String>,
    /// Display name, if a profile is loaded
    pub display_name: Option<String>,
}

impl From<SessionSnapshot> for SessionView {
    fn from(snapshot: SessionSnapshot) -> Self {
        let role = snapshot.role().map(|r| r.as_str().to_owned());
        let (email, display_name) = snapshot
            .profile
            .map(|p| (Some(p.email), p.display_name))
            .unwrap_or_default();
        Self {
            authenticated: snapshot.session.is_some(),
            loading: snapshot.loading,
            role,
            email,
            display_name,
        }
    }
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/auth/login", post(Self::handle_login))
            .route("/auth/logout", post(Self::handle_logout))
            .route("/auth/refresh", post(Self::handle_refresh))
            .route("/auth/session", get(Self::handle_session))
            .with_state(state)
    }

    /// Verify credentials; failures surface to the login form
    async fn handle_login(
        State(state): State<AppState>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        if request.email.is_empty() || request.password.is_empty() {
            return Err(AppError::invalid_input("Email and password are required"));
        }

        state
            .store
            .sign_in(&request.email, &request.password)
            .await
            .map_err(|e| match e {
                ProviderError::AuthFailed(reason) => AppError::auth_invalid(reason),
                other => AppError::from(other),
            })?;

        Ok((
            StatusCode::OK,
            Json(SessionView::from(state.store.snapshot())),
        )
            .into_response())
    }

    /// End the session; the local state clears even when the backend call
    /// fails, so the failure is surfaced but the caller may ignore it
    async fn handle_logout(State(state): State<AppState>) -> Result<Response, AppError> {
        state.store.sign_out().await.map_err(AppError::from)?;
        Ok((
            StatusCode::OK,
            Json(SessionView::from(state.store.snapshot())),
        )
            .into_response())
    }

    /// Re-fetch the session and re-resolve the profile
    async fn handle_refresh(State(state): State<AppState>) -> Result<Response, AppError> {
        state.store.refresh_user().await.map_err(AppError::from)?;
        Ok((
            StatusCode::OK,
            Json(SessionView::from(state.store.snapshot())),
        )
            .into_response())
    }

    /// Report current session state
    async fn handle_session(State(state): State<AppState>) -> Response {
        (
            StatusCode::OK,
            Json(SessionView::from(state.store.snapshot())),
        )
            .into_response()
    }
}
