// ABOUTME: Session store state machine with ordered event handling and role resolution
// ABOUTME: Generation-guarded profile fetches, fail-closed role, idempotent teardown
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! # Session Store
//!
//! Single source of truth for "who is signed in and in what role". Lifecycle:
//! `uninitialized → loading → {authenticated-with-role, authenticated-no-role,
//! anonymous}`.
//!
//! The store is the only mutator of session state. Sign-in and sign-out
//! delegate to the auth collaborator and never write state directly; the
//! collaborator's change notifications, handled in delivery order, are the
//! single authority for transitions.
//!
//! Profile resolution is asynchronous and may race a superseding event. Each
//! accepted event bumps a generation counter; a resolution carries the
//! generation it started under and its result is discarded if the store has
//! moved on or been torn down.

use crate::models::{AuthChange, AuthEvent, Session, StaffProfile, StaffRole};
use crate::providers::{AuthProvider, DataProvider, ProviderError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Where the store currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// A session exists (or may exist) and the profile fetch is in flight
    Loading,
    /// No authenticated session
    Anonymous,
    /// Session present, profile resolved, role known
    AuthenticatedWithRole,
    /// Session present but no role could be resolved; treated as unprivileged
    AuthenticatedNoRole,
}

/// Immutable view of session state published to guards and the nav filter
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// The current session, if authenticated
    pub session: Option<Session>,
    /// The resolved staff profile, if any
    pub profile: Option<StaffProfile>,
    /// Whether initialization or a profile fetch is still in flight
    pub loading: bool,
}

impl SessionSnapshot {
    /// The effective role. `None` unless a profile with a known role is
    /// loaded; any resolution failure forces this back to `None`.
    #[must_use]
    pub fn role(&self) -> Option<StaffRole> {
        self.profile.as_ref().and_then(|p| p.role)
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Loading
        } else if self.session.is_none() {
            SessionPhase::Anonymous
        } else if self.role().is_some() {
            SessionPhase::AuthenticatedWithRole
        } else {
            SessionPhase::AuthenticatedNoRole
        }
    }
}

/// Mutable state guarded by the store's lock.
///
/// `generation` advances on every accepted transition; in-flight profile
/// resolutions compare their captured generation against it before applying.
struct StoreState {
    generation: u64,
    session: Option<Session>,
    profile: Option<StaffProfile>,
    loading: bool,
}

/// Process-wide session store
pub struct SessionStore {
    auth: Arc<dyn AuthProvider>,
    data: Arc<dyn DataProvider>,
    state: Mutex<StoreState>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    alive: AtomicBool,
    event_task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    /// Create a store in the uninitialized state (`loading = true`)
    #[must_use]
    pub fn new(auth: Arc<dyn AuthProvider>, data: Arc<dyn DataProvider>) -> Arc<Self> {
        let initial = SessionSnapshot {
            session: None,
            profile: None,
            loading: true,
        };
        let (snapshot_tx, _) = watch::channel(initial);
        Arc::new(Self {
            auth,
            data,
            state: Mutex::new(StoreState {
                generation: 0,
                session: None,
                profile: None,
                loading: true,
            }),
            snapshot_tx,
            alive: AtomicBool::new(true),
            event_task: Mutex::new(None),
        })
    }

    /// Subscribe to the change stream, then request the current session and
    /// either resolve its profile or settle to anonymous.
    ///
    /// Subscription happens before the session fetch so no notification can
    /// fall between the two. Calling `initialize` more than once is a no-op.
    pub async fn initialize(self: &Arc<Self>) {
        {
            let mut task_slot = self.lock_event_task();
            if task_slot.is_some() {
                return;
            }
            let rx = self.auth.subscribe();
            let store = Arc::clone(self);
            *task_slot = Some(tokio::spawn(store.run_event_loop(rx)));
        }

        match self.auth.current_session().await {
            Ok(Some(session)) => {
                tracing::debug!("Recovered existing session at startup");
                self.accept_session(session);
            }
            Ok(None) => {
                tracing::debug!("No session at startup, settling anonymous");
                self.clear_to_anonymous();
            }
            Err(e) => {
                // Fail-closed: an unreadable session grants nothing.
                tracing::warn!("Could not read current session at startup: {e}");
                self.clear_to_anonymous();
            }
        }
    }

    /// Process change notifications in delivery order until torn down
    async fn run_event_loop(self: Arc<Self>, mut rx: broadcast::Receiver<AuthChange>) {
        loop {
            match rx.recv().await {
                Ok(change) => self.apply_change(change),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Dropped notifications mean our view may be stale; the
                    // next event or refresh_user() re-synchronizes.
                    tracing::warn!("Auth change stream lagged, missed {missed} events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Handle one change notification. Idempotent under duplicate delivery
    /// and ignored after teardown.
    fn apply_change(self: &Arc<Self>, change: AuthChange) {
        if !self.alive.load(Ordering::SeqCst) {
            tracing::debug!("Ignoring auth event {:?} after teardown", change.event);
            return;
        }

        let signed_out = matches!(change.event, AuthEvent::SignedOut);
        match change.session {
            Some(session) if !signed_out && session.user_id.is_some() => {
                tracing::debug!("Auth event {:?}, resolving profile", change.event);
                self.accept_session(session);
            }
            _ => {
                tracing::debug!("Auth event {:?}, settling anonymous", change.event);
                self.clear_to_anonymous();
            }
        }
    }

    /// Store a session, enter loading, and start profile resolution under a
    /// fresh generation
    fn accept_session(self: &Arc<Self>, session: Session) {
        let Some(user_id) = session.user_id else {
            // A session without a user identity cannot resolve a profile.
            self.clear_to_anonymous();
            return;
        };
        let token = session.access_token.clone();

        let generation = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.session = Some(session);
            state.loading = true;
            self.publish(&state);
            state.generation
        };

        let store = Arc::clone(self);
        tokio::spawn(async move {
            store.resolve_profile(user_id, token, generation).await;
        });
    }

    /// Fetch the profile and apply the result unless superseded.
    ///
    /// Success with a known role → authenticated-with-role. Success with an
    /// absent record, an unknown role, or any query failure → no role
    /// (fail-closed), no automatic retry.
    async fn resolve_profile(&self, user_id: uuid::Uuid, token: String, generation: u64) {
        let result = self.data.fetch_profile_by_id(&token, user_id).await;

        if !self.alive.load(Ordering::SeqCst) {
            tracing::debug!("Discarding profile resolution after teardown");
            return;
        }

        let mut state = self.lock_state();
        if state.generation != generation {
            tracing::debug!(
                "Discarding stale profile resolution (generation {generation} superseded by {})",
                state.generation
            );
            return;
        }

        state.profile = match result {
            Ok(Some(profile)) => {
                match profile.role {
                    Some(role) => tracing::info!("Resolved profile for {user_id}: role {role}"),
                    None => tracing::warn!("Profile for {user_id} carries no recognized role"),
                }
                Some(profile)
            }
            Ok(None) => {
                tracing::warn!("No profile record for authenticated user {user_id}");
                None
            }
            Err(e) => {
                tracing::warn!("Profile fetch failed for {user_id}: {e}");
                None
            }
        };
        state.loading = false;
        self.publish(&state);
    }

    /// Drop session and profile, settle to anonymous
    fn clear_to_anonymous(&self) {
        let mut state = self.lock_state();
        state.generation += 1;
        state.session = None;
        state.profile = None;
        state.loading = false;
        self.publish(&state);
    }

    /// Delegate credential verification to the auth collaborator.
    ///
    /// # Errors
    ///
    /// Propagates the collaborator's failure to the caller (the login form
    /// surfaces it). State is not mutated here; the subsequent change
    /// notification drives the transition.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        self.auth.sign_in_with_password(email, password).await?;
        Ok(())
    }

    /// Delegate sign-out to the auth collaborator.
    ///
    /// # Errors
    ///
    /// Propagates the collaborator's failure; local state still settles to
    /// anonymous through the change notification the collaborator emits.
    pub async fn sign_out(&self) -> Result<(), ProviderError> {
        self.auth.sign_out().await
    }

    /// Re-fetch the current session and re-resolve the profile; used after
    /// actions that mutate the signed-in user's own record server-side.
    ///
    /// # Errors
    ///
    /// Propagates a failure to read the current session.
    pub async fn refresh_user(self: &Arc<Self>) -> Result<(), ProviderError> {
        match self.auth.current_session().await? {
            Some(session) => self.accept_session(session),
            None => self.clear_to_anonymous(),
        }
        Ok(())
    }

    /// Current state snapshot
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Watch for snapshot changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Tear the store down: stop handling notifications and make outstanding
    /// resolutions no-ops. Safe to call multiple times.
    pub fn shutdown(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            tracing::debug!("Session store shutting down");
        }
        if let Some(task) = self.lock_event_task().take() {
            task.abort();
        }
    }

    fn publish(&self, state: &StoreState) {
        self.snapshot_tx.send_replace(SessionSnapshot {
            session: state.session.clone(),
            profile: state.profile.clone(),
            loading: state.loading,
        });
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // A poisoned lock means a panic mid-transition; continuing with the
        // inner state keeps the store usable and the next transition rewrites
        // the fields wholesale anyway.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_event_task(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.event_task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}
