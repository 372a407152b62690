// ABOUTME: User provisioning routes calling the hosted serverless functions
// ABOUTME: Gated to master_admin; the functions enforce their own checks server-side
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::errors::AppError;
use crate::guards::require_role;
use crate::models::StaffRole;
use crate::providers::functions::CreateUserRequest;
use crate::routes::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

const SCREEN: &str = "/users";
const ALLOWED: &[StaffRole] = &[StaffRole::MasterAdmin];

/// User provisioning routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create the user provisioning route
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/users", post(Self::handle_create))
            .with_state(state)
    }

    /// Create an account through the role-appropriate serverless function.
    /// The console gate here is UI-level; the function re-checks the caller's
    /// privileges with the forwarded token.
    async fn handle_create(
        State(state): State<AppState>,
        Json(request): Json<CreateUserRequest>,
    ) -> Result<Response, AppError> {
        let staff = require_role(&state.store, ALLOWED, SCREEN)?;
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::invalid_input("Email and password are required"));
        }

        let created = state
            .functions
            .create_user(&staff.access_token, &request)
            .await?;
        tracing::info!(
            "User {} created as {} by {}",
            created.email,
            request.role,
            staff.profile.email
        );
        Ok((StatusCode::CREATED, Json(created)).into_response())
    }
}
