// ABOUTME: Shared test fixtures: scripted auth and data collaborators
// ABOUTME: Mocks drive the session store through the same traits production uses
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::new_without_default,
    dead_code
)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use studio_admin::models::{
    AuthChange, AuthEvent, Booking, ClassSession, Coach, LeaveRequest, Member, PayrollEntry,
    Session, StaffProfile, StaffRole,
};
use studio_admin::providers::data::{NewClassSession, NewLeaveRequest, NewMember};
use studio_admin::providers::{AuthProvider, DataProvider, PageQuery, ProviderError};
use tokio::sync::broadcast;
use uuid::Uuid;

/// A session whose token encodes nothing; the mocks trust `user_id` directly
pub fn session_for(user_id: Uuid) -> Session {
    Session {
        access_token: format!("token-{user_id}"),
        user_id: Some(user_id),
        expires_at: None,
    }
}

pub fn profile_with_role(id: Uuid, role: Option<StaffRole>) -> StaffProfile {
    StaffProfile {
        id,
        email: format!("{id}@studio.example"),
        display_name: Some("Test Staff".into()),
        role,
    }
}

pub fn sample_member() -> Member {
    Member {
        id: Uuid::new_v4(),
        full_name: "Jamie Rivera".into(),
        email: "jamie@studio.example".into(),
        phone: None,
        membership_status: "active".into(),
        joined_on: Utc::now().date_naive(),
    }
}

/// Auth collaborator with a settable session and a scripted login outcome
pub struct MockAuthProvider {
    session: Mutex<Option<Session>>,
    login: Mutex<Option<Session>>,
    events: broadcast::Sender<AuthChange>,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            session: Mutex::new(None),
            login: Mutex::new(None),
            events,
        }
    }

    pub fn with_session(session: Session) -> Self {
        let provider = Self::new();
        *provider.session.lock().unwrap() = Some(session);
        provider
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session;
    }

    /// Make the next `sign_in_with_password` succeed with this session
    pub fn script_login(&self, session: Session) {
        *self.login.lock().unwrap() = Some(session);
    }

    pub fn emit(&self, event: AuthEvent, session: Option<Session>) {
        let _ = self.events.send(AuthChange { event, session });
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.session.lock().unwrap().clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<Session, ProviderError> {
        let scripted = self.login.lock().unwrap().clone();
        match scripted {
            Some(session) => {
                *self.session.lock().unwrap() = Some(session.clone());
                self.emit(AuthEvent::SignedIn, Some(session.clone()));
                Ok(session)
            }
            None => Err(ProviderError::AuthFailed("invalid login credentials".into())),
        }
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.session.lock().unwrap().take();
        self.emit(AuthEvent::SignedOut, None);
        Ok(())
    }
}

/// Data collaborator backed by in-memory tables, with a configurable delay
/// and failure switch on the profile fetch
pub struct MockDataProvider {
    pub profiles: Mutex<HashMap<Uuid, StaffProfile>>,
    pub profile_delay: Mutex<Option<Duration>>,
    pub fail_profile_fetch: AtomicBool,
    pub members: Mutex<Vec<Member>>,
    pub coaches: Mutex<Vec<Coach>>,
    pub classes: Mutex<Vec<ClassSession>>,
    pub bookings: Mutex<Vec<Booking>>,
    pub payroll: Mutex<Vec<PayrollEntry>>,
    pub leave: Mutex<Vec<LeaveRequest>>,
    /// Token presented on the most recent call, for RLS-forwarding assertions
    pub last_token: Mutex<Option<String>>,
}

impl MockDataProvider {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
            profile_delay: Mutex::new(None),
            fail_profile_fetch: AtomicBool::new(false),
            members: Mutex::new(Vec::new()),
            coaches: Mutex::new(Vec::new()),
            classes: Mutex::new(Vec::new()),
            bookings: Mutex::new(Vec::new()),
            payroll: Mutex::new(Vec::new()),
            leave: Mutex::new(Vec::new()),
            last_token: Mutex::new(None),
        }
    }

    pub fn insert_profile(&self, profile: StaffProfile) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }

    pub fn set_profile_delay(&self, delay: Option<Duration>) {
        *self.profile_delay.lock().unwrap() = delay;
    }

    fn record_token(&self, token: &str) {
        *self.last_token.lock().unwrap() = Some(token.to_owned());
    }
}

#[async_trait]
impl DataProvider for MockDataProvider {
    async fn fetch_profile_by_id(
        &self,
        token: &str,
        user_id: Uuid,
    ) -> Result<Option<StaffProfile>, ProviderError> {
        self.record_token(token);
        let delay = *self.profile_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_profile_fetch.load(Ordering::SeqCst) {
            return Err(ProviderError::Http {
                status: 500,
                body: "scripted failure".into(),
            });
        }
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn list_members(
        &self,
        token: &str,
        _page: PageQuery,
    ) -> Result<Vec<Member>, ProviderError> {
        self.record_token(token);
        Ok(self.members.lock().unwrap().clone())
    }

    async fn get_member(&self, token: &str, id: Uuid) -> Result<Option<Member>, ProviderError> {
        self.record_token(token);
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn create_member(&self, token: &str, new: &NewMember) -> Result<Member, ProviderError> {
        self.record_token(token);
        let member = Member {
            id: Uuid::new_v4(),
            full_name: new.full_name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            membership_status: "active".into(),
            joined_on: Utc::now().date_naive(),
        };
        self.members.lock().unwrap().push(member.clone());
        Ok(member)
    }

    async fn update_member(&self, token: &str, member: &Member) -> Result<Member, ProviderError> {
        self.record_token(token);
        let mut members = self.members.lock().unwrap();
        match members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => {
                *existing = member.clone();
                Ok(member.clone())
            }
            None => Err(ProviderError::NotFound),
        }
    }

    async fn list_coaches(
        &self,
        token: &str,
        _page: PageQuery,
    ) -> Result<Vec<Coach>, ProviderError> {
        self.record_token(token);
        Ok(self.coaches.lock().unwrap().clone())
    }

    async fn update_coach(&self, token: &str, coach: &Coach) -> Result<Coach, ProviderError> {
        self.record_token(token);
        let mut coaches = self.coaches.lock().unwrap();
        match coaches.iter_mut().find(|c| c.id == coach.id) {
            Some(existing) => {
                *existing = coach.clone();
                Ok(coach.clone())
            }
            None => Err(ProviderError::NotFound),
        }
    }

    async fn list_class_sessions(
        &self,
        token: &str,
        from: chrono::DateTime<Utc>,
        to: chrono::DateTime<Utc>,
    ) -> Result<Vec<ClassSession>, ProviderError> {
        self.record_token(token);
        Ok(self
            .classes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_at >= from && c.starts_at < to)
            .cloned()
            .collect())
    }

    async fn create_class_session(
        &self,
        token: &str,
        new: &NewClassSession,
    ) -> Result<ClassSession, ProviderError> {
        self.record_token(token);
        let class = ClassSession {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            coach_id: new.coach_id,
            starts_at: new.starts_at,
            ends_at: new.ends_at,
            capacity: new.capacity,
        };
        self.classes.lock().unwrap().push(class.clone());
        Ok(class)
    }

    async fn update_class_session(
        &self,
        token: &str,
        class: &ClassSession,
    ) -> Result<ClassSession, ProviderError> {
        self.record_token(token);
        let mut classes = self.classes.lock().unwrap();
        match classes.iter_mut().find(|c| c.id == class.id) {
            Some(existing) => {
                *existing = class.clone();
                Ok(class.clone())
            }
            None => Err(ProviderError::NotFound),
        }
    }

    async fn list_bookings_for_class(
        &self,
        token: &str,
        class_id: Uuid,
    ) -> Result<Vec<Booking>, ProviderError> {
        self.record_token(token);
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.class_id == class_id)
            .cloned()
            .collect())
    }

    async fn list_bookings_for_member(
        &self,
        token: &str,
        member_id: Uuid,
        _page: PageQuery,
    ) -> Result<Vec<Booking>, ProviderError> {
        self.record_token(token);
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn set_booking_status(
        &self,
        token: &str,
        booking_id: Uuid,
        status: &str,
    ) -> Result<Booking, ProviderError> {
        self.record_token(token);
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.iter_mut().find(|b| b.id == booking_id) {
            Some(booking) => {
                booking.status = status.to_owned();
                Ok(booking.clone())
            }
            None => Err(ProviderError::NotFound),
        }
    }

    async fn list_payroll(
        &self,
        token: &str,
        _period_start: chrono::NaiveDate,
        _period_end: chrono::NaiveDate,
    ) -> Result<Vec<PayrollEntry>, ProviderError> {
        self.record_token(token);
        Ok(self.payroll.lock().unwrap().clone())
    }

    async fn list_leave_requests(
        &self,
        token: &str,
        _page: PageQuery,
    ) -> Result<Vec<LeaveRequest>, ProviderError> {
        self.record_token(token);
        Ok(self.leave.lock().unwrap().clone())
    }

    async fn create_leave_request(
        &self,
        token: &str,
        new: &NewLeaveRequest,
    ) -> Result<LeaveRequest, ProviderError> {
        self.record_token(token);
        let request = LeaveRequest {
            id: Uuid::new_v4(),
            coach_id: new.coach_id,
            starts_on: new.starts_on,
            ends_on: new.ends_on,
            reason: new.reason.clone(),
            status: "pending".into(),
        };
        self.leave.lock().unwrap().push(request.clone());
        Ok(request)
    }

    async fn set_leave_status(
        &self,
        token: &str,
        id: Uuid,
        status: &str,
    ) -> Result<LeaveRequest, ProviderError> {
        self.record_token(token);
        let mut leave = self.leave.lock().unwrap();
        match leave.iter_mut().find(|l| l.id == id) {
            Some(request) => {
                request.status = status.to_owned();
                Ok(request.clone())
            }
            None => Err(ProviderError::NotFound),
        }
    }
}
