// ABOUTME: Route gating: auth guard, role guard, and top-down guard chains
// ABOUTME: Pure verdict functions over session snapshots plus an HTTP require_role helper
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Route guards.
//!
//! Guards are pure functions from the current [`SessionSnapshot`] to a
//! verdict; they never mutate session state. A guarded subtree lists its
//! guards in order and the chain short-circuits on the first non-allow
//! verdict.
//!
//! Verdict semantics:
//! - **Wait**: initialization or a profile fetch is still in flight; render
//!   nothing yet, and in particular do not redirect (avoids flickering to
//!   the login screen before startup settles).
//! - **Redirect to login**: not authenticated, or authenticated with no
//!   resolvable role. Carries the originally requested path so login can
//!   return there.
//! - **Denied**: authenticated and role resolved, but the role is not in
//!   the allowed set. No redirect.

use crate::constants::defaults;
use crate::errors::{AppError, ErrorCode};
use crate::models::{StaffProfile, StaffRole};
use crate::session::{SessionSnapshot, SessionStore};

/// Verdict of a guard evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Render the guarded subtree
    Allow,
    /// Session state still settling; render a neutral waiting state
    Wait,
    /// Send the user to the login entry point, preserving the requested path
    RedirectToLogin {
        /// The path to return to after a successful login
        return_to: String,
    },
    /// Authenticated but not authorized; render access denied, do not redirect
    Denied {
        /// The role that was rejected
        role: StaffRole,
    },
}

/// A single gate in a guard chain
#[derive(Debug, Clone, Copy)]
pub enum Guard {
    /// Require an authenticated session
    RequireAuth,
    /// Require the resolved role to be in the given set
    RequireRole(&'static [StaffRole]),
}

/// Auth guard: gate a subtree on "is there an authenticated session".
#[must_use]
pub fn evaluate_auth(snapshot: &SessionSnapshot, requested_path: &str) -> GuardVerdict {
    if snapshot.loading {
        return GuardVerdict::Wait;
    }
    if snapshot.session.is_none() {
        return GuardVerdict::RedirectToLogin {
            return_to: requested_path.to_owned(),
        };
    }
    GuardVerdict::Allow
}

/// Role guard: gate a subtree on "is the resolved role in the allowed set".
///
/// A missing role is not distinguished from anonymous at this boundary: both
/// redirect to login. A present role outside the allowed set is denied
/// without redirect.
#[must_use]
pub fn evaluate_role(
    snapshot: &SessionSnapshot,
    allowed: &[StaffRole],
    requested_path: &str,
) -> GuardVerdict {
    if snapshot.loading {
        return GuardVerdict::Wait;
    }
    match snapshot.role() {
        None => GuardVerdict::RedirectToLogin {
            return_to: requested_path.to_owned(),
        },
        Some(role) if allowed.contains(&role) => GuardVerdict::Allow,
        Some(role) => GuardVerdict::Denied { role },
    }
}

/// Evaluate a guard chain top-down, short-circuiting on the first verdict
/// that is not [`GuardVerdict::Allow`].
#[must_use]
pub fn evaluate_chain(
    guards: &[Guard],
    snapshot: &SessionSnapshot,
    requested_path: &str,
) -> GuardVerdict {
    for guard in guards {
        let verdict = match guard {
            Guard::RequireAuth => evaluate_auth(snapshot, requested_path),
            Guard::RequireRole(allowed) => evaluate_role(snapshot, allowed, requested_path),
        };
        if verdict != GuardVerdict::Allow {
            return verdict;
        }
    }
    GuardVerdict::Allow
}

/// Map a non-allow verdict to its HTTP projection
fn verdict_error(verdict: GuardVerdict) -> AppError {
    match verdict {
        GuardVerdict::Allow => AppError::internal("allow verdict is not an error"),
        GuardVerdict::Wait => AppError::new(
            ErrorCode::ResourceUnavailable,
            "Session state is still initializing",
        ),
        GuardVerdict::RedirectToLogin { return_to } => {
            AppError::auth_required().with_details(serde_json::json!({
                "login": defaults::LOGIN_PATH,
                "return_to": return_to,
            }))
        }
        GuardVerdict::Denied { role } => {
            AppError::permission_denied(format!("Role {role} is not permitted on this screen"))
        }
    }
}

/// An authorized caller: the resolved profile plus the access token handlers
/// forward to the hosted backend so row-level security applies to them
#[derive(Debug, Clone)]
pub struct AuthorizedStaff {
    /// Resolved staff profile
    pub profile: StaffProfile,
    /// Access token of the caller's session
    pub access_token: String,
}

/// Require an authenticated session with a role in `allowed`.
///
/// # Errors
///
/// 503 while session state settles, 401 when unauthenticated or the role is
/// unresolved, 403 when the role is outside the allowed set.
pub fn require_role(
    store: &SessionStore,
    allowed: &'static [StaffRole],
    requested_path: &str,
) -> Result<AuthorizedStaff, AppError> {
    let snapshot = store.snapshot();
    let chain = [Guard::RequireAuth, Guard::RequireRole(allowed)];
    match evaluate_chain(&chain, &snapshot, requested_path) {
        GuardVerdict::Allow => {
            let access_token = snapshot
                .session
                .map(|s| s.access_token)
                .ok_or_else(|| AppError::internal("allowed snapshot missing session"))?;
            let profile = snapshot
                .profile
                .ok_or_else(|| AppError::internal("allowed snapshot missing profile"))?;
            Ok(AuthorizedStaff {
                profile,
                access_token,
            })
        }
        verdict => {
            tracing::debug!("Guard rejected {requested_path}: {verdict:?}");
            Err(verdict_error(verdict))
        }
    }
}

/// Require only an authenticated session; returns its access token.
///
/// # Errors
///
/// 503 while session state settles, 401 when unauthenticated.
pub fn require_auth(store: &SessionStore, requested_path: &str) -> Result<String, AppError> {
    let snapshot = store.snapshot();
    match evaluate_auth(&snapshot, requested_path) {
        GuardVerdict::Allow => snapshot
            .session
            .map(|s| s.access_token)
            .ok_or_else(|| AppError::internal("allowed snapshot missing session")),
        verdict => Err(verdict_error(verdict)),
    }
}
