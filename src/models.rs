// ABOUTME: Common data models for sessions, staff profiles, and studio records
// ABOUTME: Defines the closed role set and the row types proxied from the hosted backend
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Data models shared across the session store, guards, and routes.
//!
//! The role set is closed: anything outside it parses to "no role" so an
//! unexpected value from the hosted backend can never grant access.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Closed set of authorization roles recognized by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Full access to every screen, including payroll and user provisioning
    MasterAdmin,
    /// Day-to-day studio administration
    Admin,
    /// Coaching staff: schedule, bookings, leave
    Coach,
    /// Studio member, no console access beyond their own records
    Member,
}

impl StaffRole {
    /// Parse a role string from the hosted `users` table.
    ///
    /// Returns `None` for empty or unrecognized values; an unknown role must
    /// never be treated as any known one.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "master_admin" => Some(Self::MasterAdmin),
            "admin" => Some(Self::Admin),
            "coach" => Some(Self::Coach),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    /// Wire representation of the role
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MasterAdmin => "master_admin",
            Self::Admin => "admin",
            Self::Coach => "coach",
            Self::Member => "member",
        }
    }

    /// Whether this role carries admin privileges (`admin` or `master_admin`)
    #[must_use]
    pub const fn is_admin_or_higher(&self) -> bool {
        matches!(self, Self::MasterAdmin | Self::Admin)
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserialize a role column fail-closed: absent, empty, or unknown → `None`
fn role_fail_closed<'de, D>(deserializer: D) -> Result<Option<StaffRole>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(StaffRole::parse))
}

/// Authenticated session issued by the hosted auth collaborator.
///
/// Replaced wholesale on every auth-state change, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque access token presented to the hosted backend on every query
    pub access_token: String,
    /// Identifier of the authenticated user, when the token carries one
    pub user_id: Option<Uuid>,
    /// Token expiry, when known
    pub expires_at: Option<DateTime<Utc>>,
}

/// Auth-state change notification emitted by the auth collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    /// Session recovered at subscription time
    InitialSession,
    /// Credentials accepted, new session issued
    SignedIn,
    /// Existing session refreshed with a new token
    TokenRefreshed,
    /// Session ended
    SignedOut,
    /// The signed-in user's own record changed server-side
    UserUpdated,
}

/// A change notification: the event and the session that now applies
#[derive(Debug, Clone)]
pub struct AuthChange {
    /// What happened
    pub event: AuthEvent,
    /// The session after the change; `None` on sign-out
    pub session: Option<Session>,
}

/// Staff profile fetched from the hosted `users` table once a session exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
    /// Record identifier, matches the auth user id
    pub id: Uuid,
    /// Login email
    pub email: String,
    /// Display name shown in the console header
    #[serde(default)]
    pub display_name: Option<String>,
    /// Authorization role; `None` when the stored value is empty or unknown
    #[serde(default, deserialize_with = "role_fail_closed")]
    pub role: Option<StaffRole>,
}

/// Studio member record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Record identifier
    pub id: Uuid,
    /// Member full name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone, optional
    #[serde(default)]
    pub phone: Option<String>,
    /// Membership status (`active`, `paused`, `cancelled`)
    pub membership_status: String,
    /// Date the member joined
    pub joined_on: NaiveDate,
}

/// Coach record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    /// Record identifier, matches the coach's auth user id
    pub id: Uuid,
    /// Coach full name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Discipline the coach teaches
    #[serde(default)]
    pub specialty: Option<String>,
    /// Hourly rate used by payroll
    pub hourly_rate_cents: i64,
    /// Whether the coach currently appears on the schedule
    pub active: bool,
}

/// A scheduled class on the studio calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSession {
    /// Record identifier
    pub id: Uuid,
    /// Class title shown on the schedule
    pub title: String,
    /// Coach running the class
    pub coach_id: Uuid,
    /// Class start
    pub starts_at: DateTime<Utc>,
    /// Class end
    pub ends_at: DateTime<Utc>,
    /// Maximum attendees
    pub capacity: u32,
}

/// A member's booking on a class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Record identifier
    pub id: Uuid,
    /// Booking member
    pub member_id: Uuid,
    /// Booked class
    pub class_id: Uuid,
    /// Booking status (`booked`, `attended`, `cancelled`, `no_show`)
    pub status: String,
    /// When the booking was made
    pub booked_at: DateTime<Utc>,
}

/// A coach's payroll line for a pay period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollEntry {
    /// Record identifier
    pub id: Uuid,
    /// Coach the entry belongs to
    pub coach_id: Uuid,
    /// First day of the pay period
    pub period_start: NaiveDate,
    /// Last day of the pay period
    pub period_end: NaiveDate,
    /// Hours worked in the period
    pub hours: f64,
    /// Gross pay computed server-side
    pub gross_pay_cents: i64,
}

/// A leave request filed by a coach
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Record identifier
    pub id: Uuid,
    /// Requesting coach
    pub coach_id: Uuid,
    /// First day of leave
    pub starts_on: NaiveDate,
    /// Last day of leave
    pub ends_on: NaiveDate,
    /// Free-form reason
    #[serde(default)]
    pub reason: Option<String>,
    /// Request status (`pending`, `approved`, `rejected`)
    pub status: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn role_parse_round_trip() {
        for role in [
            StaffRole::MasterAdmin,
            StaffRole::Admin,
            StaffRole::Coach,
            StaffRole::Member,
        ] {
            assert_eq!(StaffRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_role_parses_to_none() {
        assert_eq!(StaffRole::parse(""), None);
        assert_eq!(StaffRole::parse("superuser"), None);
        assert_eq!(StaffRole::parse("ADMIN"), None);
    }

    #[test]
    fn profile_with_unknown_role_deserializes_fail_closed() {
        let profile: StaffProfile = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "email": "front.desk@studio.example",
            "role": "receptionist"
        }))
        .unwrap();
        assert_eq!(profile.role, None);
    }

    #[test]
    fn profile_with_known_role_deserializes() {
        let profile: StaffProfile = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "email": "owner@studio.example",
            "display_name": "Studio Owner",
            "role": "master_admin"
        }))
        .unwrap();
        assert_eq!(profile.role, Some(StaffRole::MasterAdmin));
    }
}
