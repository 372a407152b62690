// ABOUTME: Data collaborator interface and hosted implementation
// ABOUTME: Typed per-table operations issued as parameterized REST queries under RLS
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Data collaborator.
//!
//! Every operation takes the caller's access token and forwards it as a
//! bearer credential so the hosted backend's row-level security evaluates
//! against the signed-in staff member, not a service identity. Queries are
//! parameterized through URL query pairs; no SQL is assembled here.

use crate::constants::limits;
use crate::models::{
    Booking, ClassSession, Coach, LeaveRequest, Member, PayrollEntry, StaffProfile,
};
use crate::providers::errors::ProviderError;
use crate::providers::http_client;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Pagination window for list queries
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// Rows to return; clamped to the configured maximum
    #[serde(default)]
    pub limit: Option<u32>,
    /// Rows to skip
    #[serde(default)]
    pub offset: Option<u32>,
}

impl PageQuery {
    /// Effective (limit, offset) after clamping
    #[must_use]
    pub fn window(&self) -> (u32, u32) {
        let limit = self
            .limit
            .unwrap_or(limits::DEFAULT_PAGE_SIZE)
            .min(limits::MAX_PAGE_SIZE);
        (limit, self.offset.unwrap_or(0))
    }
}

/// Fields required to create a member record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    /// Member full name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone, optional
    #[serde(default)]
    pub phone: Option<String>,
}

/// Fields required to schedule a class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClassSession {
    /// Class title
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

/// Fields required to file a leave request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLeaveRequest {
    /// Requesting coach
    pub coach_id: Uuid,
    /// First day of leave
    pub starts_on: NaiveDate,
    /// Last day of leave
    pub ends_on: NaiveDate,
    /// Free-form reason
    #[serde(default)]
    pub reason: Option<String>,
}

/// Interface to the external data collaborator.
///
/// # Errors
///
/// Every operation propagates [`ProviderError`]: transport failures,
/// non-success responses (including row-level-security rejections), and
/// decode failures.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch a staff profile by auth user id; `Ok(None)` when the record
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures; callers fail closed on error.
    async fn fetch_profile_by_id(
        &self,
        token: &str,
        user_id: Uuid,
    ) -> Result<Option<StaffProfile>, ProviderError>;

    /// List members ordered by name.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn list_members(&self, token: &str, page: PageQuery)
        -> Result<Vec<Member>, ProviderError>;

    /// Fetch one member by id.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn get_member(&self, token: &str, id: Uuid) -> Result<Option<Member>, ProviderError>;

    /// Create a member record.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn create_member(&self, token: &str, new: &NewMember) -> Result<Member, ProviderError>;

    /// Replace a member record wholesale.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures; [`ProviderError::NotFound`] when
    /// no row matched.
    async fn update_member(&self, token: &str, member: &Member) -> Result<Member, ProviderError>;

    /// List coaches ordered by name.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn list_coaches(&self, token: &str, page: PageQuery) -> Result<Vec<Coach>, ProviderError>;

    /// Replace a coach record wholesale.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures; [`ProviderError::NotFound`] when
    /// no row matched.
    async fn update_coach(&self, token: &str, coach: &Coach) -> Result<Coach, ProviderError>;

    /// List classes scheduled inside a time window.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn list_class_sessions(
        &self,
        token: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClassSession>, ProviderError>;

    /// Schedule a class.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn create_class_session(
        &self,
        token: &str,
        new: &NewClassSession,
    ) -> Result<ClassSession, ProviderError>;

    /// Replace a scheduled class wholesale.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures; [`ProviderError::NotFound`] when
    /// no row matched.
    async fn update_class_session(
        &self,
        token: &str,
        class: &ClassSession,
    ) -> Result<ClassSession, ProviderError>;

    /// List bookings for one class.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn list_bookings_for_class(
        &self,
        token: &str,
        class_id: Uuid,
    ) -> Result<Vec<Booking>, ProviderError>;

    /// List bookings made by one member.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn list_bookings_for_member(
        &self,
        token: &str,
        member_id: Uuid,
        page: PageQuery,
    ) -> Result<Vec<Booking>, ProviderError>;

    /// Set a booking's status.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures; [`ProviderError::NotFound`] when
    /// no row matched.
    async fn set_booking_status(
        &self,
        token: &str,
        booking_id: Uuid,
        status: &str,
    ) -> Result<Booking, ProviderError>;

    /// List payroll entries overlapping a period.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn list_payroll(
        &self,
        token: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Vec<PayrollEntry>, ProviderError>;

    /// List leave requests, newest first.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn list_leave_requests(
        &self,
        token: &str,
        page: PageQuery,
    ) -> Result<Vec<LeaveRequest>, ProviderError>;

    /// File a leave request.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures.
    async fn create_leave_request(
        &self,
        token: &str,
        new: &NewLeaveRequest,
    ) -> Result<LeaveRequest, ProviderError>;

    /// Approve or reject a leave request.
    ///
    /// # Errors
    ///
    /// Propagates hosted-backend failures; [`ProviderError::NotFound`] when
    /// no row matched.
    async fn set_leave_status(
        &self,
        token: &str,
        id: Uuid,
        status: &str,
    ) -> Result<LeaveRequest, ProviderError>;
}

/// Data collaborator implementation over the hosted platform's REST API
pub struct HostedDataProvider {
    http: reqwest::Client,
    base_url: Url,
    publishable_key: String,
}

impl HostedDataProvider {
    /// Create a provider from backend configuration
    #[must_use]
    pub fn new(config: &crate::config::environment::BackendConfig) -> Self {
        Self {
            http: http_client::shared_client().clone(),
            base_url: config.base_url.clone(),
            publishable_key: config.publishable_key.clone(),
        }
    }

    fn table(&self, name: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(&format!("rest/v1/{name}"))
            .map_err(|e| ProviderError::Decode(format!("invalid table endpoint {name}: {e}")))
    }

    async fn rows<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, ProviderError> {
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

    async fn select<T: DeserializeOwned>(
        &self,
        token: &str,
        url: Url,
    ) -> Result<Vec<T>, ProviderError> {
        let response = self
            .http
            .get(url)
            .header("apikey", &self.publishable_key)
            .bearer_auth(token)
            .send()
            .await?;
        Self::rows(response).await
    }

    /// Insert one row and return the stored representation
    async fn insert_one<T, B>(&self, token: &str, url: Url, body: &B) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let response = self
            .http
            .post(url)
            .header("apikey", &self.publishable_key)
            .header("Prefer", "return=representation")
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::rows::<T>(response)
            .await?
            .into_iter()
            .next()
            .ok_or(ProviderError::NotFound)
    }

    /// Patch the row matched by the url's filter and return it
    async fn patch_one<T, B>(&self, token: &str, url: Url, body: &B) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let response = self
            .http
            .patch(url)
            .header("apikey", &self.publishable_key)
            .header("Prefer", "return=representation")
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::rows::<T>(response)
            .await?
            .into_iter()
            .next()
            .ok_or(ProviderError::NotFound)
    }
}

#[async_trait]
impl DataProvider for HostedDataProvider {
    async fn fetch_profile_by_id(
        &self,
        token: &str,
        user_id: Uuid,
    ) -> Result<Option<StaffProfile>, ProviderError> {
        let mut url = self.table("users")?;
        url.query_pairs_mut()
            .append_pair("select", "id,email,display_name,role")
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("limit", "1");
        Ok(self
            .select::<StaffProfile>(token, url)
            .await?
            .into_iter()
            .next())
    }

    async fn list_members(
        &self,
        token: &str,
        page: PageQuery,
    ) -> Result<Vec<Member>, ProviderError> {
        let (limit, offset) = page.window();
        let mut url = self.table("members")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "full_name.asc")
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        self.select(token, url).await
    }

    async fn get_member(&self, token: &str, id: Uuid) -> Result<Option<Member>, ProviderError> {
        let mut url = self.table("members")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("limit", "1");
        Ok(self.select::<Member>(token, url).await?.into_iter().next())
    }

    async fn create_member(&self, token: &str, new: &NewMember) -> Result<Member, ProviderError> {
        let url = self.table("members")?;
        let body = serde_json::json!({
            "full_name": new.full_name,
            "email": new.email,
            "phone": new.phone,
            "membership_status": "active",
            "joined_on": Utc::now().date_naive(),
        });
        self.insert_one(token, url, &body).await
    }

    async fn update_member(&self, token: &str, member: &Member) -> Result<Member, ProviderError> {
        let mut url = self.table("members")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", member.id));
        self.patch_one(token, url, member).await
    }

    async fn list_coaches(
        &self,
        token: &str,
        page: PageQuery,
    ) -> Result<Vec<Coach>, ProviderError> {
        let (limit, offset) = page.window();
        let mut url = self.table("coaches")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "full_name.asc")
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        self.select(token, url).await
    }

    async fn update_coach(&self, token: &str, coach: &Coach) -> Result<Coach, ProviderError> {
        let mut url = self.table("coaches")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", coach.id));
        self.patch_one(token, url, coach).await
    }

    async fn list_class_sessions(
        &self,
        token: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClassSession>, ProviderError> {
        let mut url = self.table("class_sessions")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("starts_at", &format!("gte.{}", from.to_rfc3339()))
            .append_pair("starts_at", &format!("lt.{}", to.to_rfc3339()))
            .append_pair("order", "starts_at.asc");
        self.select(token, url).await
    }

    async fn create_class_session(
        &self,
        token: &str,
        new: &NewClassSession,
    ) -> Result<ClassSession, ProviderError> {
        let url = self.table("class_sessions")?;
        self.insert_one(token, url, new).await
    }

    async fn update_class_session(
        &self,
        token: &str,
        class: &ClassSession,
    ) -> Result<ClassSession, ProviderError> {
        let mut url = self.table("class_sessions")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", class.id));
        self.patch_one(token, url, class).await
    }

    async fn list_bookings_for_class(
        &self,
        token: &str,
        class_id: Uuid,
    ) -> Result<Vec<Booking>, ProviderError> {
        let mut url = self.table("bookings")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("class_id", &format!("eq.{class_id}"))
            .append_pair("order", "booked_at.asc");
        self.select(token, url).await
    }

    async fn list_bookings_for_member(
        &self,
        token: &str,
        member_id: Uuid,
        page: PageQuery,
    ) -> Result<Vec<Booking>, ProviderError> {
        let (limit, offset) = page.window();
        let mut url = self.table("bookings")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("member_id", &format!("eq.{member_id}"))
            .append_pair("order", "booked_at.desc")
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        self.select(token, url).await
    }

    async fn set_booking_status(
        &self,
        token: &str,
        booking_id: Uuid,
        status: &str,
    ) -> Result<Booking, ProviderError> {
        let mut url = self.table("bookings")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{booking_id}"));
        self.patch_one(token, url, &serde_json::json!({ "status": status }))
            .await
    }

    async fn list_payroll(
        &self,
        token: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Vec<PayrollEntry>, ProviderError> {
        let mut url = self.table("payroll_entries")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("period_end", &format!("gte.{period_start}"))
            .append_pair("period_start", &format!("lte.{period_end}"))
            .append_pair("order", "period_start.asc");
        self.select(token, url).await
    }

    async fn list_leave_requests(
        &self,
        token: &str,
        page: PageQuery,
    ) -> Result<Vec<LeaveRequest>, ProviderError> {
        let (limit, offset) = page.window();
        let mut url = self.table("leave_requests")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "starts_on.desc")
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        self.select(token, url).await
    }

    async fn create_leave_request(
        &self,
        token: &str,
        new: &NewLeaveRequest,
    ) -> Result<LeaveRequest, ProviderError> {
        let url = self.table("leave_requests")?;
        let body = serde_json::json!({
            "coach_id": new.coach_id,
            "starts_on": new.starts_on,
            "ends_on": new.ends_on,
            "reason": new.reason,
            "status": "pending",
        });
        self.insert_one(token, url, &body).await
    }

    async fn set_leave_status(
        &self,
        token: &str,
        id: Uuid,
        status: &str,
    ) -> Result<LeaveRequest, ProviderError> {
        let mut url = self.table("leave_requests")?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        self.patch_one(token, url, &serde_json::json!({ "status": status }))
            .await
    }
}
