// ABOUTME: Authentication collaborator interface and hosted implementation
// ABOUTME: Password sign-in, sign-out, session recovery, and auth-change notifications
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Authentication collaborator.
//!
//! The session store consumes [`AuthProvider`]; [`HostedAuthProvider`] talks
//! to the hosted platform's token endpoints. The provider is the single
//! emitter of [`AuthChange`] notifications: sign-in and sign-out report their
//! outcome to the caller, and state transitions flow only through the change
//! stream. A subscriber joining while a session exists receives an
//! initial-session notification; token-refreshed and user-updated events are
//! part of the consumed vocabulary and handled like any session-bearing
//! change.

use crate::config::environment::BackendConfig;
use crate::models::{AuthChange, AuthEvent, Session};
use crate::providers::errors::ProviderError;
use crate::providers::http_client;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::RwLock;
use tokio::sync::broadcast;
use url::Url;
use uuid::Uuid;

/// Capacity of the auth-change broadcast channel; laggards drop oldest
const AUTH_EVENT_CHANNEL_CAPACITY: usize = 16;

/// Interface to the external authentication collaborator
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Return the current session, if any.
    ///
    /// # Errors
    ///
    /// Propagates backend failures; callers treat an unreadable session as
    /// absent.
    async fn current_session(&self) -> Result<Option<Session>, ProviderError>;

    /// Subscribe to auth-state change notifications.
    ///
    /// Events arrive in emission order. Implementations report a session
    /// already established at subscribe time with an initial-session
    /// notification. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;

    /// Verify credentials and establish a session.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::AuthFailed`] on rejected credentials; the
    /// caller surfaces it, state changes arrive via the change stream.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError>;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Propagates backend failures; the local session clears and a sign-out
    /// notification is emitted regardless, so downstream state degrades to
    /// anonymous either way.
    async fn sign_out(&self) -> Result<(), ProviderError>;
}

/// Claims we read out of the access token payload segment.
///
/// The token is verified by the hosted backend on every query; this service
/// holds no verification keys and only decodes the payload for the user id
/// and expiry.
#[derive(Debug, Deserialize)]
struct AccessClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Decode the payload segment of a JWT-shaped access token without
/// verification. Tolerant: malformed tokens yield an empty claim set.
fn decode_access_claims(token: &str) -> (Option<Uuid>, Option<DateTime<Utc>>) {
    let Some(payload) = token.split('.').nth(1) else {
        return (None, None);
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload) else {
        return (None, None);
    };
    let Ok(claims) = serde_json::from_slice::<AccessClaims>(&bytes) else {
        return (None, None);
    };
    let user_id = claims.sub.as_deref().and_then(|s| Uuid::parse_str(s).ok());
    let expires_at = claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0));
    (user_id, expires_at)
}

/// Successful password-grant response from the hosted token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Error body returned by the hosted token endpoint
#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

/// Auth collaborator implementation over the hosted platform's REST API
pub struct HostedAuthProvider {
    http: reqwest::Client,
    base_url: Url,
    publishable_key: String,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthChange>,
}

impl HostedAuthProvider {
    /// Create a provider from backend configuration
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let (events, _) = broadcast::channel(AUTH_EVENT_CHANNEL_CAPACITY);
        Self {
            http: http_client::shared_client().clone(),
            base_url: config.base_url.clone(),
            publishable_key: config.publishable_key.clone(),
            session: RwLock::new(None),
            events,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::Decode(format!("invalid auth endpoint {path}: {e}")))
    }

    fn emit(&self, event: AuthEvent, session: Option<Session>) {
        // Send fails only when nobody is subscribed, which is fine.
        let _ = self.events.send(AuthChange { event, session });
    }

    fn session_from_token(access_token: String) -> Session {
        let (user_id, expires_at) = decode_access_claims(&access_token);
        Session {
            access_token,
            user_id,
            expires_at,
        }
    }

    fn lock_session(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.session
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_session_mut(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.session
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl AuthProvider for HostedAuthProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.lock_session().clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        let rx = self.events.subscribe();
        // A subscriber joining while a session already exists learns about
        // it the same way it learns about later transitions. The receiver
        // is created first so the notification cannot be missed.
        let existing = self.lock_session().clone();
        if let Some(session) = existing {
            self.emit(AuthEvent::InitialSession, Some(session));
        }
        rx
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .http
            .post(url)
            .header("apikey", &self.publishable_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::UNAUTHORIZED
        {
            let body: TokenErrorBody = response.json().await.unwrap_or(TokenErrorBody {
                error_description: None,
                msg: None,
            });
            let reason = body
                .error_description
                .or(body.msg)
                .unwrap_or_else(|| "invalid login credentials".into());
            tracing::warn!("Sign-in rejected for {email}: {reason}");
            return Err(ProviderError::AuthFailed(reason));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body: body.chars().take(256).collect(),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        let session = Self::session_from_token(token.access_token);

        *self.lock_session_mut() = Some(session.clone());
        match session.user_id {
            Some(id) => tracing::info!("Sign-in succeeded for {email} (user: {id})"),
            None => tracing::warn!("Sign-in succeeded for {email} but token carries no user id"),
        }
        self.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let previous = self.lock_session_mut().take();

        let result = if let Some(session) = &previous {
            let url = self.endpoint("auth/v1/logout")?;
            match self
                .http
                .post(url)
                .header("apikey", &self.publishable_key)
                .bearer_auth(&session.access_token)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => Ok(()),
                Ok(response) => Err(ProviderError::Http {
                    status: response.status().as_u16(),
                    body: response.text().await.unwrap_or_default(),
                }),
                Err(e) => Err(ProviderError::Network(e)),
            }
        } else {
            Ok(())
        };

        // The local session clears even when the backend call failed; the
        // change stream is the single authority for downstream state.
        self.emit(AuthEvent::SignedOut, None);
        if let Err(e) = &result {
            tracing::warn!("Sign-out call to hosted backend failed: {e}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn encode_segment(value: &serde_json::Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    #[test]
    fn decodes_user_id_and_expiry_from_token_payload() {
        let user_id = Uuid::new_v4();
        let header = encode_segment(&serde_json::json!({ "alg": "HS256" }));
        let payload = encode_segment(&serde_json::json!({
            "sub": user_id.to_string(),
            "exp": 1_900_000_000_i64
        }));
        let token = format!("{header}.{payload}.sig");

        let (decoded_id, decoded_exp) = decode_access_claims(&token);
        assert_eq!(decoded_id, Some(user_id));
        assert_eq!(decoded_exp.unwrap().timestamp(), 1_900_000_000);
    }

    #[test]
    fn malformed_token_decodes_to_empty_claims() {
        assert_eq!(decode_access_claims("not-a-jwt"), (None, None));
        assert_eq!(decode_access_claims("a.!!!.c"), (None, None));
    }

    fn test_backend_config() -> BackendConfig {
        BackendConfig {
            base_url: Url::parse("http://localhost:54321/").unwrap(),
            publishable_key: "pk-test".into(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
        }
    }

    #[test]
    fn subscribe_reports_an_existing_session() {
        let provider = HostedAuthProvider::new(&test_backend_config());
        let session = Session {
            access_token: "recovered-token".into(),
            user_id: Some(Uuid::new_v4()),
            expires_at: None,
        };
        *provider.lock_session_mut() = Some(session.clone());

        let mut rx = provider.subscribe();
        let change = rx.try_recv().unwrap();
        assert_eq!(change.event, AuthEvent::InitialSession);
        assert_eq!(change.session, Some(session));
    }

    #[test]
    fn subscribe_is_silent_without_a_session() {
        let provider = HostedAuthProvider::new(&test_backend_config());
        let mut rx = provider.subscribe();
        assert!(rx.try_recv().is_err());
    }
}
