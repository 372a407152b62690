// ABOUTME: Client for the hosted backend's serverless user-creation functions
// ABOUTME: Invokes create-staff-user and create-member-user with the caller's token
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Serverless function invoker.
//!
//! Privileged account creation happens inside the hosted backend's two
//! serverless functions, which hold the service-role key this console never
//! sees. The console only calls them with the signed-in caller's token; the
//! functions enforce their own authorization server-side.

use crate::config::environment::BackendConfig;
use crate::constants::function_names;
use crate::models::StaffRole;
use crate::providers::errors::ProviderError;
use crate::providers::http_client;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Request body accepted by both user-creation functions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Login email for the new account
    pub email: String,
    /// Initial password
    pub password: String,
    /// Role to record on the new profile
    pub role: StaffRole,
    /// Display name, optional
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Response returned by the user-creation functions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedUser {
    /// Auth user id of the new account
    pub id: Uuid,
    /// Login email of the new account
    pub email: String,
}

/// Client for the two user-creation functions
pub struct FunctionsClient {
    http: reqwest::Client,
    base_url: Url,
    publishable_key: String,
}

impl FunctionsClient {
    /// Create a client from backend configuration
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: http_client::shared_client().clone(),
            base_url: config.base_url.clone(),
            publishable_key: config.publishable_key.clone(),
        }
    }

    /// Pick the function for the requested role: staff accounts and member
    /// accounts are provisioned by different functions
    const fn function_for_role(role: StaffRole) -> &'static str {
        match role {
            StaffRole::Member => function_names::CREATE_MEMBER_USER,
            StaffRole::MasterAdmin | StaffRole::Admin | StaffRole::Coach => {
                function_names::CREATE_STAFF_USER
            }
        }
    }

    /// Invoke the appropriate user-creation function.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and non-success responses; a 401/403
    /// from the function means the caller's token did not carry the
    /// privileges the function requires.
    pub async fn create_user(
        &self,
        token: &str,
        request: &CreateUserRequest,
    ) -> Result<CreatedUser, ProviderError> {
        let name = Self::function_for_role(request.role);
        let url = self
            .base_url
            .join(&format!("functions/v1/{name}"))
            .map_err(|e| ProviderError::Decode(format!("invalid function endpoint {name}: {e}")))?;

        tracing::info!("Invoking {name} for {} ({})", request.email, request.role);

        let response = self
            .http
            .post(url)
            .header("apikey", &self.publishable_key)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body: body.chars().take(256).collect(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_routes_to_the_right_function() {
        assert_eq!(
            FunctionsClient::function_for_role(StaffRole::Member),
            function_names::CREATE_MEMBER_USER
        );
        for staff in [StaffRole::MasterAdmin, StaffRole::Admin, StaffRole::Coach] {
            assert_eq!(
                FunctionsClient::function_for_role(staff),
                function_names::CREATE_STAFF_USER
            );
        }
    }
}
